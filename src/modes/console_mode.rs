use crossterm::{
    cursor::{self, Hide, Show},
    event::{poll, read, Event, KeyCode, KeyModifiers},
    queue,
    style::{Color, Print, Stylize},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use fps_clock::FpsClock;

use std::{
    io::{stdout, Stdout, Write},
    time::Duration,
};

use crate::{
    data::{
        log::LogSink,
        task::{CancelHandle, RenderTask},
        Program,
    },
    error::Result,
    graphics::{
        blend::{grayb, Argb},
        Pixel,
    },
    modes::Mode,
};

const ERROR: u8 = 6;
const CHARSET_OPAC_EXP: &[u8] = b" `.-':_,^=;><+!rc*/z?sLTv)J7(|Fi{C}fI31tlu[neoZ\
    5Yxjya]2ESwqkP6h9d4VpOGbUAKXHm8RD#$Bg0MNWQ%&@";
const BRAILLE_THRESHOLD: u8 = 36;

struct ColoredString {
    pub string: String,
    pub fg: Argb,
    pub bg: Option<Argb>,
}

fn close_enough(a: Argb, b: Argb) -> bool {
    let [_, r, g, b_] = a.decompose();
    let [_, nr, ng, nb] = b.decompose();

    r.abs_diff(nr) <= ERROR && g.abs_diff(ng) <= ERROR && b_.abs_diff(nb) <= ERROR
}

fn term_color(c: Argb) -> Color {
    let [_, r, g, b] = c.decompose();
    Color::Rgb { r, g, b }
}

/// Compress similar pixels into one string with the same
/// color. Hopefully this reduces IO performance cost.
#[derive(Default)]
struct StyledLine(Vec<ColoredString>);

impl StyledLine {
    fn clear_line(&mut self) {
        self.0.clear();
    }

    fn push_pixel(&mut self, ch: char, fg: Argb, bg: Option<Argb>) {
        if let Some(last) = self.0.last_mut() {
            let mergable_bg = match (last.bg, bg) {
                (Some(a), Some(b)) => close_enough(a, b),
                (None, None) => true,
                _ => false,
            };

            if mergable_bg && close_enough(last.fg, fg) {
                last.string.push(ch);
                return;
            }
        }

        self.0.push(ColoredString {
            string: ch.to_string(),
            fg,
            bg,
        });
    }

    fn queue_print(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        for ColoredString { string, fg, bg } in &self.0 {
            let styled = string.as_str().with(term_color(*fg));

            match bg {
                Some(bg) => queue!(stdout, Print(styled.on(term_color(*bg))))?,
                None => queue!(stdout, Print(styled))?,
            }
        }
        Ok(())
    }
}

fn to_ascii_art(table: &[u8], x: usize) -> char {
    table[(x * table.len()) >> 8] as char
}

/// Canvas pixel as seen on a black terminal.
fn shade(prog: &Program, i: usize) -> Argb {
    Argb::black().mix(prog.pix.pixel(i))
}

fn max_rgb(a: Argb, b: Argb) -> Argb {
    let [_, r, g, b_] = a.decompose();
    let [_, nr, ng, nb] = b.decompose();
    Argb::compose([0xFF, r.max(nr), g.max(ng), b_.max(nb)])
}

pub fn print_ascii(prog: &Program, stdout: &mut Stdout) -> std::io::Result<()> {
    let w = prog.pix.width();
    let mut line = StyledLine::default();

    for y in (0..prog.pix.height()).step_by(2) {
        queue!(stdout, cursor::MoveTo(0, (y / 2) as u16))?;

        for x in 0..w {
            let base = w * y + x;
            let c = max_rgb(shade(prog, base), shade(prog, base + w));

            let [_, r, g, b] = c.decompose();
            let ch = to_ascii_art(CHARSET_OPAC_EXP, grayb(r, g, b) as usize);

            line.push_pixel(ch, c, None);
        }

        line.queue_print(stdout)?;
        line.clear_line();
    }

    Ok(())
}

pub fn print_block(prog: &Program, stdout: &mut Stdout) -> std::io::Result<()> {
    let w = prog.pix.width();
    let mut line = StyledLine::default();

    for y in (0..prog.pix.height()).step_by(2) {
        queue!(stdout, cursor::MoveTo(0, (y / 2) as u16))?;

        for x in 0..w {
            let base = w * y + x;
            let top = shade(prog, base);
            let bottom = shade(prog, base + w);

            line.push_pixel('▀', top, Some(bottom));
        }

        line.queue_print(stdout)?;
        line.clear_line();
    }

    Ok(())
}

pub fn print_brail(prog: &Program, stdout: &mut Stdout) -> std::io::Result<()> {
    let w = prog.pix.width();
    let mut line = StyledLine::default();

    for y_base in (0..prog.pix.height()).step_by(4) {
        queue!(stdout, cursor::MoveTo(0, (y_base / 4) as u16))?;

        for x_base in (0..w).step_by(2) {
            let idx_base = y_base * w + x_base;
            let mut color = Argb::black();

            let bx = '⠀' as u32 + // first char of braille
                (0..8).fold(0u8, |acc, i| {
                    let idx = idx_base
                        + if i < 6 {
                            (i / 3) + (i % 3) * w
                        } else {
                            (i & 1) + 3 * w
                        };

                    let c = shade(prog, idx);
                    color = max_rgb(color, c);

                    let [_, r, g, b] = c.decompose();

                    // All braille patterns fit into a u8.
                    acc | (((grayb(r, g, b) > BRAILLE_THRESHOLD) as u8) << i)
                }) as u32;

            line.push_pixel(char::from_u32(bx).unwrap_or(' '), color, None);
        }

        line.queue_print(stdout)?;
        line.clear_line();
    }

    Ok(())
}

/// Terminal cells to canvas pixels for `mode`.
pub fn cells_to_pixels(mode: Mode, cols: u16, rows: u16) -> (u32, u32) {
    let (cw, ch) = mode.cell_size();
    (cols as u32 * cw, rows as u32 * ch)
}

fn print_con(prog: &Program, stdout: &mut Stdout) -> std::io::Result<()> {
    match prog.mode() {
        Mode::ConAscii => print_ascii(prog, stdout),
        Mode::ConBrail => print_brail(prog, stdout),
        _ => print_block(prog, stdout),
    }
}

fn control_key_events_con(prog: &mut Program, cancel: &CancelHandle) -> Result<()> {
    while poll(Duration::ZERO)? {
        match read()? {
            Event::Key(event) => match event.code {
                KeyCode::Char('q') | KeyCode::Esc => cancel.cancel(),

                KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                    cancel.cancel()
                }

                _ => {}
            },

            Event::Resize(w, h) => {
                prog.update_size(cells_to_pixels(prog.mode(), w, h));
                queue!(stdout(), Clear(ClearType::All))?;
            }

            _ => {}
        }
    }

    Ok(())
}

fn run(prog: &mut Program, stdout: &mut Stdout) -> Result<()> {
    let (cols, rows) = size()?;
    prog.init(cells_to_pixels(prog.mode(), cols, rows));

    let mut task = RenderTask::new(prog.frame_limit());
    task.start();
    let cancel = task.handle();

    let mut clock = FpsClock::new(prog.fps());

    loop {
        control_key_events_con(prog, &cancel)?;

        let rearm = task.run_frame(prog);

        print_con(prog, stdout)?;
        stdout.flush()?;

        if !rearm {
            break;
        }

        clock.tick();
    }

    log::info!("Rendered {} frames.", task.frames());

    Ok(())
}

/// Runs `body` between `enter` and `leave`. `leave` runs whenever `enter`
/// was attempted, so a half-finished setup still gets undone.
fn guarded<T>(
    enter: impl FnOnce() -> Result<()>,
    body: impl FnOnce() -> Result<T>,
    leave: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = enter().and_then(|_| body());
    let left = leave();

    let value = result?;
    left?;
    Ok(value)
}

fn enter_terminal() -> Result<()> {
    enable_raw_mode()?;

    let mut stdout = stdout();
    queue!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
    stdout.flush()?;

    Ok(())
}

fn leave_terminal() -> Result<()> {
    let mut stdout = stdout();
    let left = queue!(stdout, LeaveAlternateScreen, Show).and_then(|_| stdout.flush());

    disable_raw_mode()?;
    left?;

    Ok(())
}

pub fn con_main(mut prog: Program, log_sink: LogSink) -> Result<()> {
    prog.print_startup_info();

    // Anything logged on the alternate screen would land on top of the frame.
    log_sink.hold();

    let result = guarded(
        enter_terminal,
        || run(&mut prog, &mut stdout()),
        leave_terminal,
    );

    prog.teardown();
    log_sink.release()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_error() -> crate::error::Error {
        std::io::Error::new(std::io::ErrorKind::Other, "no tty").into()
    }

    #[test]
    fn failed_setup_still_restores() {
        let left = std::cell::Cell::new(false);
        let ran = std::cell::Cell::new(false);

        let result = guarded(
            || Err(io_error()),
            || {
                ran.set(true);
                Ok(())
            },
            || {
                left.set(true);
                Ok(())
            },
        );

        assert!(result.is_err());
        assert!(!ran.get());
        assert!(left.get());
    }

    #[test]
    fn failed_session_still_restores() {
        let left = std::cell::Cell::new(false);

        let result: Result<()> = guarded(
            || Ok(()),
            || Err(io_error()),
            || {
                left.set(true);
                Ok(())
            },
        );

        assert!(matches!(result, Err(crate::error::Error::Io(_))));
        assert!(left.get());
    }

    #[test]
    fn restore_error_is_reported() {
        let result = guarded(|| Ok(()), || Ok(7), || Err(io_error()));
        assert!(result.is_err());

        let result = guarded(|| Ok(()), || Ok(7), || Ok(()));
        assert_eq!(result.ok(), Some(7));
    }

    #[test]
    fn cell_mapping() {
        assert_eq!(cells_to_pixels(Mode::ConBrail, 80, 24), (160, 96));
        assert_eq!(cells_to_pixels(Mode::ConBlock, 80, 24), (80, 48));
        assert_eq!(cells_to_pixels(Mode::ConAscii, 1, 1), (1, 2));
    }

    #[test]
    fn similar_pixels_merge() {
        let mut line = StyledLine::default();
        line.push_pixel('a', 0xFF_10_10_10, None);
        line.push_pixel('b', 0xFF_12_10_0E, None);
        line.push_pixel('c', 0xFF_80_10_10, None);
        line.push_pixel('d', 0xFF_80_10_10, Some(0xFF_00_00_00));

        assert_eq!(line.0.len(), 3);
        assert_eq!(line.0[0].string, "ab");
    }

    #[test]
    fn ascii_ramp_ends() {
        assert_eq!(to_ascii_art(CHARSET_OPAC_EXP, 0), ' ');
        assert_eq!(to_ascii_art(CHARSET_OPAC_EXP, 255), '@');
    }
}

use clap::Parser;

use crate::{
    error::{Error, Result},
    graphics::{Argb, DEFAULT_BACKGROUND},
    modes::Mode,
    scene::{Style, DEFAULT_BUBBLES},
};

pub const DEFAULT_SIZE_WIN: (u32, u32) = (1280, 720);
pub const DEFAULT_WIN_SCALE: u8 = 1;
pub const MAX_SCALE_FACTOR: u8 = 8;
pub const DEFAULT_CON_FPS: u32 = 30;

#[derive(Parser, Debug)]
#[command(
    name = "bubblebg",
    author,
    version,
    about = "Animated bubble background, rendered on the CPU"
)]
pub struct Args {
    /// Initial window size (e.g. `1280x720`).
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        value_parser = |s: &str| parse_size(s).map_err(|e| e.to_string()),
        default_value = "1280x720"
    )]
    pub size: (u32, u32),

    /// Draw at 1/N of the window resolution and upscale.
    #[arg(
        long,
        default_value_t = DEFAULT_WIN_SCALE,
        value_parser = clap::value_parser!(u8).range(1..=MAX_SCALE_FACTOR as i64)
    )]
    pub scale: u8,

    /// Number of bubbles.
    #[arg(long, default_value_t = DEFAULT_BUBBLES)]
    pub bubbles: usize,

    /// Bubble rendering style.
    #[arg(long, value_enum, default_value_t = Style::Smoke)]
    pub style: Style,

    /// Seed for reproducible animations.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after rendering this many frames.
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,

    /// Background color as hex (e.g. `101018`).
    #[arg(
        long,
        value_name = "RRGGBB",
        value_parser = |s: &str| parse_color(s).map_err(|e| e.to_string()),
        default_value = "101018"
    )]
    pub background: Argb,

    /// Frame rate of the terminal renderer.
    #[arg(
        long,
        default_value_t = DEFAULT_CON_FPS,
        value_parser = clap::value_parser!(u32).range(1..=240)
    )]
    pub fps: u32,

    /// Render into the terminal with ascii characters.
    #[arg(long, group = "console", hide = cfg!(not(feature = "terminal")))]
    pub ascii: bool,

    /// Render into the terminal with half blocks.
    #[arg(long, group = "console", hide = cfg!(not(feature = "terminal")))]
    pub block: bool,

    /// Render into the terminal with braille dots.
    #[arg(long, group = "console", hide = cfg!(not(feature = "terminal")))]
    pub braille: bool,
}

/// Validated startup settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub size: (u32, u32),
    pub scale: u8,
    pub bubbles: usize,
    pub style: Style,
    pub seed: Option<u64>,
    pub frames: Option<u64>,
    pub background: Argb,
    pub fps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            size: DEFAULT_SIZE_WIN,
            scale: DEFAULT_WIN_SCALE,
            bubbles: DEFAULT_BUBBLES,
            style: Style::default(),
            seed: None,
            frames: None,
            background: DEFAULT_BACKGROUND,
            fps: DEFAULT_CON_FPS,
        }
    }
}

impl Args {
    fn mode(&self) -> Mode {
        let requested = if self.ascii {
            Mode::ConAscii
        } else if self.block {
            Mode::ConBlock
        } else if self.braille {
            Mode::ConBrail
        } else {
            Mode::Win
        };

        if requested.is_con() && cfg!(not(feature = "terminal")) {
            log::warn!(
                "Built without terminal support, ignoring --{}.",
                requested.get_name()
            );
            return Mode::Win;
        }

        requested
    }

    pub fn into_config(self) -> Config {
        Config {
            mode: self.mode(),
            size: self.size,
            scale: self.scale,
            bubbles: self.bubbles,
            style: self.style,
            seed: self.seed,
            frames: self.frames,
            background: self.background,
            fps: self.fps,
        }
    }
}

pub fn parse() -> Config {
    Args::parse().into_config()
}

pub fn parse_size(s: &str) -> Result<(u32, u32)> {
    let invalid = || Error::InvalidSize(s.to_string());

    let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let w = w.parse::<u32>().map_err(|_| invalid())?;
    let h = h.parse::<u32>().map_err(|_| invalid())?;

    if w == 0 || h == 0 {
        return Err(invalid());
    }

    Ok((w, h))
}

pub fn parse_color(s: &str) -> Result<Argb> {
    let hex = s.trim().trim_start_matches('#');

    if hex.len() != 6 {
        return Err(Error::InvalidColor(s.to_string()));
    }

    let rgb = u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidColor(s.to_string()))?;

    Ok(0xFF_00_00_00 | rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(parse_size("800x600").unwrap(), (800, 600));
        assert_eq!(parse_size(" 64X32 ").unwrap(), (64, 32));
        assert!(matches!(parse_size("800"), Err(Error::InvalidSize(_))));
        assert!(parse_size("0x600").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn colors() {
        assert_eq!(parse_color("101018").unwrap(), 0xFF_10_10_18);
        assert_eq!(parse_color("#ff00Aa").unwrap(), 0xFF_FF_00_AA);
        assert!(matches!(parse_color("fff"), Err(Error::InvalidColor(_))));
        assert!(parse_color("zzzzzz").is_err());
    }

    #[test]
    fn defaults_match_cli() {
        let config = Args::parse_from(["bubblebg"]).into_config();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn cli_overrides() {
        let config = Args::parse_from([
            "bubblebg",
            "--size",
            "800x600",
            "--scale",
            "2",
            "--style",
            "flat",
            "--seed",
            "12",
            "--frames",
            "100",
            "--bubbles",
            "10",
        ])
        .into_config();

        assert_eq!(config.size, (800, 600));
        assert_eq!(config.scale, 2);
        assert_eq!(config.style, Style::Flat);
        assert_eq!(config.seed, Some(12));
        assert_eq!(config.frames, Some(100));
        assert_eq!(config.bubbles, 10);
        assert_eq!(config.mode, Mode::Win);
    }

    #[test]
    fn rejects_bad_scale() {
        assert!(Args::try_parse_from(["bubblebg", "--scale", "0"]).is_err());
        assert!(Args::try_parse_from(["bubblebg", "--scale", "9"]).is_err());
    }
}

use softbuffer::{Context, Surface};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Icon, Theme, Window, WindowId},
};

use std::{num::NonZeroU32, rc::Rc};

use crate::{
    data::{
        task::{RenderTask, TaskState},
        Program,
    },
    error::{Error, Result},
    graphics::Canvas,
    math::{rng, Cplx},
    scene::{bubble::PALETTE, Bubble, Style},
};

type WindowSurface = Surface<Rc<Window>, Rc<Window>>;

const ICON_SIZE: u32 = 64;

struct WindowState {
    prog: Program,
    task: RenderTask,
    window: Option<Rc<Window>>,
    surface: Option<WindowSurface>,
    final_buffer_size: PhysicalSize<u32>,
    error: Option<Error>,
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Only the first resume sets things up. Later ones keep
        // the existing window and scene.
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.create_surface(event_loop) {
            log::error!("Bubble background surface not found: {err}");
            self.error = Some(Error::SurfaceMissing(err.to_string()));
            self.task.stop();
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.task.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                let Some(surface) = self.surface.as_mut() else {
                    log::warn!("Resize received before the surface exists.");
                    return;
                };

                if let Err(err) = Self::resize_surface(surface, size.width, size.height) {
                    log::warn!("Unable to resize the buffer: {err}");
                }

                self.final_buffer_size = size;
                self.prog.update_size((size.width, size.height));
            }

            WindowEvent::RedrawRequested => {
                let Some(window) = self.window.clone() else {
                    return;
                };

                let rearm = self.task.run_frame(&mut self.prog);

                self.present(&window);

                if rearm {
                    window.request_redraw();
                } else if self.task.state() == TaskState::Stopped {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _: &ActiveEventLoop) {
        self.task.stop();
        self.prog.teardown();
        log::info!("Rendered {} frames.", self.task.frames());
    }
}

impl WindowState {
    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = self.prog.window_size();

        let window_attributes = Window::default_attributes()
            .with_title("bubblebg")
            .with_inner_size(PhysicalSize::new(w, h))
            .with_resizable(true)
            .with_theme(Some(Theme::Dark))
            .with_window_icon(render_icon());

        let window = Rc::new(event_loop.create_window(window_attributes)?);

        let context = Context::new(window.clone())?;
        let mut surface = Surface::new(&context, window.clone())?;

        let size = window.inner_size();
        Self::resize_surface(&mut surface, size.width, size.height)?;
        self.final_buffer_size = size;

        self.prog.init((size.width, size.height));
        self.task.start();

        window.request_redraw();

        self.window = Some(window);
        self.surface = Some(surface);

        Ok(())
    }

    fn resize_surface(surface: &mut WindowSurface, w: u32, h: u32) -> Result<()> {
        // Minimised windows report a zero size, keep the old buffer.
        let (Some(w), Some(h)) = (NonZeroU32::new(w), NonZeroU32::new(h)) else {
            return Ok(());
        };

        surface.resize(w, h)?;
        Ok(())
    }

    fn present(&mut self, window: &Window) {
        let PhysicalSize { width, height } = self.final_buffer_size;

        if width == 0 || height == 0 {
            return;
        }

        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let mut buffer = match surface.buffer_mut() {
            Ok(buffer) => buffer,
            Err(err) => {
                log::warn!("Unable to get a frame buffer: {err}");
                return;
            }
        };

        self.prog
            .pix
            .scale_to(self.prog.scale() as usize, &mut buffer, Some(width as usize));

        window.pre_present_notify();
        if let Err(err) = buffer.present() {
            log::warn!("Failing to present buffers to the window: {err}");
        }
    }
}

fn render_icon() -> Option<Icon> {
    let mut canvas = Canvas::new(ICON_SIZE as usize, ICON_SIZE as usize);

    let c = ICON_SIZE as f32 / 2.0;
    let bubble = Bubble::new(
        Cplx::new(c - 2.0, c - 2.0),
        Cplx::zero(),
        c * 0.75,
        PALETTE[2],
        rng::source(Some(0)),
    );
    bubble.draw(&mut canvas, Style::Smoke);

    Icon::from_rgba(canvas.to_rgba(), ICON_SIZE, ICON_SIZE)
        .inspect_err(|err| log::warn!("Failed to create window icon: {err}"))
        .ok()
}

pub fn winit_main(prog: Program) -> Result<()> {
    let event_loop = EventLoop::new()?;

    let mut state = WindowState {
        task: RenderTask::new(prog.frame_limit()),
        prog,
        window: None,
        surface: None,
        final_buffer_size: PhysicalSize::<u32>::new(0, 0),
        error: None,
    };

    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut state)?;

    state.error.take().map_or(Ok(()), Err)
}

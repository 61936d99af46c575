pub mod config;
pub mod log;
pub mod task;

use crate::{
    graphics::Canvas,
    modes::Mode,
    scene::{Scene, Style, Viewport},
};

use config::Config;

/// Main program struct
///
/// Owns the canvas and, once the host reports it is ready, the scene.
/// Host sizes are in physical pixels; the canvas and the viewport are
/// the host size divided by `scale`.
pub struct Program {
    pub pix: Canvas,

    scene: Option<Scene>,

    mode: Mode,
    scale: u8,
    window_size: (u32, u32),

    bubbles: usize,
    style: Style,
    seed: Option<u64>,
    frames: Option<u64>,
    fps: u32,
}

impl Program {
    pub fn new(config: Config) -> Self {
        let mut pix = Canvas::new(0, 0);
        pix.set_background(config.background);

        Self {
            pix,
            scene: None,

            mode: config.mode,
            // Terminal cells already map to several canvas pixels.
            scale: if config.mode.is_con() { 1 } else { config.scale.max(1) },
            window_size: config.size,

            bubbles: config.bubbles,
            style: config.style,
            seed: config.seed,
            frames: config.frames,
            fps: config.fps,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    pub fn frame_limit(&self) -> Option<u64> {
        self.frames
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    #[cfg(test)]
    pub(crate) fn is_initialized(&self) -> bool {
        self.scene.is_some()
    }

    #[cfg(test)]
    pub(crate) fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.pix.width() as u32, self.pix.height() as u32)
    }

    fn apply_size(&mut self, (w, h): (u32, u32)) -> Viewport {
        self.window_size = (w, h);

        let scale = self.scale as u32;
        self.pix.resize((w / scale) as usize, (h / scale) as usize);

        self.viewport()
    }

    /// Called once the host can hand out a drawing surface.
    pub fn init(&mut self, size: (u32, u32)) {
        if self.scene.is_some() {
            return;
        }

        let viewport = self.apply_size(size);

        self.scene = Some(Scene::new(viewport, self.bubbles, self.style, self.seed));

        ::log::debug!(
            "Scene ready: {} bubbles in {}x{}.",
            self.bubbles,
            viewport.width,
            viewport.height
        );
    }

    pub fn update_size(&mut self, size: (u32, u32)) {
        let viewport = self.apply_size(size);

        ::log::debug!("Resized to {}x{}.", viewport.width, viewport.height);

        if let Some(scene) = self.scene.as_mut() {
            scene.resize(viewport);
        }
    }

    pub fn render(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.frame(&mut self.pix);
        }
    }

    pub fn teardown(&mut self) {
        if self.scene.take().is_some() {
            ::log::info!("Animation stopped.");
        }
    }

    pub fn print_startup_info(&self) {
        ::log::info!("Starting bubblebg.");

        ::log::info!(
            "Bubbles: {}, style: {}, seed: {}",
            self.bubbles,
            self.style.get_name(),
            self.seed
                .map_or_else(|| "random".to_string(), |s| s.to_string())
        );

        match self.mode {
            Mode::Win => ::log::info!(
                "Running with: Winit, {}x{} at scale {}",
                self.window_size.0,
                self.window_size.1,
                self.scale
            ),

            _ => ::log::info!(
                "Running in a terminal: {} rendering at {}fps",
                self.mode.get_name(),
                self.fps
            ),
        }

        if let Some(frames) = self.frames {
            ::log::info!("Will stop after {} frames.", frames);
        }
    }
}

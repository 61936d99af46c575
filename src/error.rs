use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("drawing surface is unavailable: {0}")]
    SurfaceMissing(String),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("softbuffer error: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("terminal i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid size `{0}`, expected WIDTHxHEIGHT")]
    InvalidSize(String),

    #[error("invalid color `{0}`, expected RRGGBB")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, Error>;

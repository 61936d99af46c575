#[cfg(feature = "terminal")]
pub mod console_mode;

pub mod windowed_mode;

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Mode {
    #[default]
    Win,
    ConAscii,
    ConBlock,
    ConBrail,
}

impl Mode {
    pub fn get_name(&self) -> &'static str {
        match self {
            Mode::Win => "window",
            Mode::ConBrail => "braille",
            Mode::ConAscii => "ascii",
            Mode::ConBlock => "block",
        }
    }

    pub fn is_con(&self) -> bool {
        matches!(self, Mode::ConAscii | Mode::ConBlock | Mode::ConBrail)
    }

    /// Canvas pixels covered by one terminal cell.
    #[cfg(feature = "terminal")]
    pub fn cell_size(&self) -> (u32, u32) {
        match self {
            Mode::ConBrail => (2, 4),
            Mode::ConAscii | Mode::ConBlock => (1, 2),
            Mode::Win => (1, 1),
        }
    }
}

pub mod blend;
pub mod draw;
pub mod gradient;

pub use blend::Argb;
pub use draw::{DrawContext, Paint, Shadow};

#[cfg(test)]
use crate::math::Vec2;

#[cfg(test)]
pub(crate) type P2 = Vec2<i32>;

pub(crate) trait Pixel: Copy + Clone + Sized + std::fmt::Debug {
    fn black() -> Self;
    fn trans() -> Self;

    fn mix(self, other: Self) -> Self;

    fn set_alpha(self, alpha: u8) -> Self;

    fn alpha(self) -> u8;

    fn decompose(self) -> [u8; 4];
    fn compose(array: [u8; 4]) -> Self;
}

pub const DEFAULT_BACKGROUND: Argb = 0xFF_10_10_18;

/// Software drawing surface. Pixels are straight alpha ARGB and are
/// composited onto `background` only when handed to a host.
pub struct Canvas {
    buffer: Vec<Argb>,
    width: usize,
    height: usize,

    background: Argb,

    state: draw::DrawState,
    saved: Vec<draw::DrawState>,
    path: Vec<draw::Circle>,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            buffer: vec![Argb::trans(); w * h],
            width: w,
            height: h,

            background: DEFAULT_BACKGROUND,

            state: draw::DrawState::default(),
            saved: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn set_background(&mut self, bg: Argb) {
        self.background = bg.set_alpha(0xFF);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[cfg(test)]
    pub(crate) fn size(&self) -> P2 {
        P2::new(self.width as i32, self.height as i32)
    }

    #[cfg(test)]
    pub(crate) fn sizel(&self) -> usize {
        self.buffer.len()
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.buffer.clear();
        self.buffer.resize(w * h, Argb::trans());
        self.width = w;
        self.height = h;
    }

    #[cfg(any(test, feature = "terminal"))]
    pub fn pixel(&self, i: usize) -> Argb {
        self.buffer.get(i).copied().unwrap_or(Argb::trans())
    }

    #[cfg(test)]
    pub(crate) fn pixel_xy(&self, p: P2) -> Argb {
        if !self.is_in_bound(p) {
            return Argb::trans();
        }
        self.pixel(p.y as usize * self.width + p.x as usize)
    }

    #[cfg(test)]
    pub(crate) fn is_in_bound(&self, p: P2) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[Argb] {
        &self.buffer
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Argb] {
        &mut self.buffer
    }

    /// Straight RGBA bytes, row major.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.buffer
            .iter()
            .flat_map(|p| {
                let [a, r, g, b] = p.decompose();
                [r, g, b, a]
            })
            .collect()
    }

    // On Winit Wayland, resize increments hasn't been implemented,
    // So the width parameter is there to ensure that the horizontal
    // lines are aligned.
    pub fn scale_to(&self, scale: usize, dest: &mut [Argb], width: Option<usize>) {
        if self.width == 0 || scale == 0 {
            return;
        }

        let dst_width = width.unwrap_or(self.width * scale);

        if dst_width != self.width * scale || dest.len() != dst_width * self.height * scale {
            dest.fill(self.background & 0x00_FF_FF_FF);
        }

        self.buffer
            .chunks_exact(self.width) // source lines
            .zip(dest.chunks_exact_mut(dst_width * scale)) // with blocks of destination lines
            .for_each(|(src_row, dst_block)| {
                for dst_row in dst_block.chunks_exact_mut(dst_width) {
                    for (src_pixel, dst_chunk) in src_row.iter().zip(dst_row.chunks_exact_mut(scale))
                    {
                        dst_chunk.fill(self.background.mix(*src_pixel) & 0x00_FF_FF_FF);
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Argb = 0xFF_FF_FF_FF;

    #[test]
    fn resize_reallocates_and_clears() {
        let mut canvas = Canvas::new(4, 4);
        canvas.as_mut_slice().fill(WHITE);
        canvas.resize(6, 2);
        assert_eq!(canvas.sizel(), 12);
        assert_eq!(canvas.size(), P2::new(6, 2));
        assert!(canvas.as_slice().iter().all(|&p| p == Argb::trans()));
    }

    #[test]
    fn scale_to_duplicates_pixels() {
        let mut canvas = Canvas::new(2, 1);
        canvas.set_background(Argb::black());
        canvas.as_mut_slice()[1] = 0xFF_11_22_33;

        let mut dest = vec![0xDEAD; 8];
        canvas.scale_to(2, &mut dest, None);

        assert_eq!(
            dest,
            vec![0, 0, 0x11_22_33, 0x11_22_33, 0, 0, 0x11_22_33, 0x11_22_33]
        );
    }

    #[test]
    fn scale_to_pads_wider_destination() {
        let mut canvas = Canvas::new(1, 1);
        canvas.set_background(0xFF_01_02_03);
        canvas.as_mut_slice()[0] = WHITE;

        let mut dest = vec![0; 3];
        canvas.scale_to(1, &mut dest, Some(3));

        assert_eq!(dest, vec![0xFF_FF_FF, 0x01_02_03, 0x01_02_03]);
    }

    #[test]
    fn out_of_bound_reads_are_transparent() {
        let canvas = Canvas::new(3, 3);
        assert_eq!(canvas.pixel_xy(P2::new(-1, 0)), Argb::trans());
        assert_eq!(canvas.pixel_xy(P2::new(3, 1)), Argb::trans());
        assert_eq!(canvas.pixel(100), Argb::trans());
    }

    #[test]
    fn rgba_export_reorders_channels() {
        let mut canvas = Canvas::new(1, 1);
        canvas.as_mut_slice()[0] = 0x80_10_20_30;
        assert_eq!(canvas.to_rgba(), vec![0x10, 0x20, 0x30, 0x80]);
    }
}

pub type Argb = u32;

use super::Pixel;

#[cfg_attr(not(feature = "terminal"), allow(dead_code))]
pub fn grayb(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 + g as u16 + 2 * b as u16) / 4) as u8
}

/// Source-over of `c2` onto `c1`, straight alpha.
pub fn composite_u32(c1: Argb, c2: Argb) -> Argb {
    let [a1, r1, g1, b1] = c1.decompose();
    let [a2, r2, g2, b2] = c2.decompose();

    if a2 == 255 {
        return c2;
    }

    if a2 == 0 {
        return c1;
    }

    let (a, a3) = {
        let a1 = a1 as u16;
        let a2 = a2 as u16;

        let a3 = (a1 * (255 - a2)) / 255;

        (a2 + a3, a3)
    };

    if a == 0 {
        return Argb::compose([0, 0, 0, 0]);
    }

    let composite_channel = |c1: u8, c2: u8| -> u8 {
        let c1 = c1 as u16;
        let c2 = c2 as u16;
        let a2 = a2 as u16;

        ((c2 * a2 + c1 * a3) / a) as u8
    };

    Argb::compose([
        a as u8,
        composite_channel(r1, r2),
        composite_channel(g1, g2),
        composite_channel(b1, b2),
    ])
}

/// Per channel interpolation, `t` in `[0, 1]`.
pub fn lerp(c1: Argb, c2: Argb, t: f32) -> Argb {
    let t = t.clamp(0.0, 1.0);
    let a = c1.decompose();
    let b = c2.decompose();

    let mut out = [0u8; 4];
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = (*x as f32 + (*y as f32 - *x as f32) * t).round() as u8;
    }

    Argb::compose(out)
}

/// Alpha from a `[0, 1]` opacity.
pub fn alpha_of(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Pixel for Argb {
    fn black() -> Argb {
        0xFF_00_00_00
    }

    fn trans() -> Argb {
        0x0
    }

    fn mix(self, other: Argb) -> Argb {
        composite_u32(self, other)
    }

    fn set_alpha(self, alpha: u8) -> Argb {
        (self & 0x00_FF_FF_FF) | (alpha as Argb) << 24
    }

    fn alpha(self) -> u8 {
        self.decompose()[0]
    }

    fn decompose(self) -> [u8; 4] {
        self.to_be_bytes()
    }

    fn compose(array: [u8; 4]) -> Argb {
        Argb::from_be_bytes(array)
    }
}

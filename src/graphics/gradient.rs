use crate::math::Cplx;

use super::blend::{self, Argb};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Argb,
}

/// Radial gradient around a single focus. Stop offsets are fractions
/// of `radius` and must be added in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Cplx,
    pub radius: f32,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Cplx, radius: f32) -> Self {
        Self {
            center,
            radius,
            stops: Vec::with_capacity(2),
        }
    }

    pub fn add_color_stop(mut self, offset: f32, color: Argb) -> Self {
        self.stops.push(ColorStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        });
        self
    }

    #[cfg(test)]
    pub(crate) fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn color_at(&self, p: Cplx) -> Argb {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return 0;
        };

        let t = if self.radius > 0.0 {
            p.dist(self.center) / self.radius
        } else {
            1.0
        };

        if t <= first.offset {
            return first.color;
        }

        if t >= last.offset {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);

            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.color;
                }
                return blend::lerp(a.color, b.color, (t - a.offset) / span);
            }
        }

        last.color
    }
}

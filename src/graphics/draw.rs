use crate::math::Cplx;

use super::{gradient::RadialGradient, Argb, Canvas, Pixel};

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Argb),
    Radial(RadialGradient),
}

impl Paint {
    pub fn color_at(&self, p: Cplx) -> Argb {
        match self {
            Paint::Solid(c) => *c,
            Paint::Radial(g) => g.color_at(p),
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Argb::black())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Argb,
    pub blur: f32,
    pub offset: Cplx,
}

impl Shadow {
    pub const NONE: Shadow = Shadow {
        color: 0,
        blur: 0.0,
        offset: Cplx::zero(),
    };

    pub fn is_visible(&self) -> bool {
        self.color.alpha() > 0 && (self.blur > 0.0 || self.offset != Cplx::zero())
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Shadow::NONE
    }
}

/// Immediate mode 2D drawing, modelled after an HTML canvas context.
/// Paths only hold full circles.
pub trait DrawContext {
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn begin_path(&mut self);
    fn arc(&mut self, center: Cplx, radius: f32);
    fn close_path(&mut self);

    fn set_fill(&mut self, paint: Paint);
    fn fill(&mut self);

    fn set_shadow(&mut self, shadow: Shadow);

    fn save(&mut self);
    fn restore(&mut self);
}

#[derive(Debug, Clone, Default)]
pub(super) struct DrawState {
    fill: Paint,
    shadow: Shadow,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Circle {
    center: Cplx,
    radius: f32,
}

impl Canvas {
    /// Coverage falls off linearly across `feather` pixels centered on the edge.
    fn draw_circle_by(&mut self, center: Cplx, radius: f32, feather: f32, paint: &Paint) {
        let (w, h) = (self.width(), self.height());
        let reach = radius + feather;

        let span = |lo: f32, hi: f32, max: usize| {
            let s = lo.floor().max(0.0) as usize;
            let e = (hi.ceil().max(0.0) as usize).min(max);
            s..e
        };

        let xs = span(center.x - reach, center.x + reach, w);
        let ys = span(center.y - reach, center.y + reach, h);

        for y in ys {
            let line = &mut self.as_mut_slice()[y * w..(y + 1) * w];

            for x in xs.clone() {
                let p = Cplx::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = ((radius - p.dist(center)) / feather + 0.5).clamp(0.0, 1.0);

                if coverage <= 0.0 {
                    continue;
                }

                let c = paint.color_at(p);
                let a = (c.alpha() as f32 * coverage).round() as u8;

                line[x] = line[x].mix(c.set_alpha(a));
            }
        }
    }
}

impl DrawContext for Canvas {
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let width = self.width();
        let height = self.height();

        let xs = (x.max(0.0) as usize).min(width);
        let xe = ((x + w).max(0.0) as usize).min(width);
        let ys = (y.max(0.0) as usize).min(height);
        let ye = ((y + h).max(0.0) as usize).min(height);

        if xs >= xe {
            return;
        }

        for line in self
            .as_mut_slice()
            .chunks_exact_mut(width)
            .skip(ys)
            .take(ye.saturating_sub(ys))
        {
            line[xs..xe].fill(Argb::trans());
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn arc(&mut self, center: Cplx, radius: f32) {
        self.path.push(Circle { center, radius });
    }

    fn close_path(&mut self) {}

    fn set_fill(&mut self, paint: Paint) {
        self.state.fill = paint;
    }

    fn fill(&mut self) {
        let path = std::mem::take(&mut self.path);
        let DrawState { fill, shadow } = self.state.clone();

        if shadow.is_visible() {
            let paint = Paint::Solid(shadow.color);
            for c in &path {
                self.draw_circle_by(c.center + shadow.offset, c.radius, shadow.blur.max(1.0), &paint);
            }
        }

        for c in &path {
            self.draw_circle_by(c.center, c.radius, 1.0, &fill);
        }

        self.path = path;
    }

    fn set_shadow(&mut self, shadow: Shadow) {
        self.state.shadow = shadow;
    }

    fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }
}

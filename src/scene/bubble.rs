use rand::{rngs::StdRng, Rng};

use super::{smoke::SmokeParticle, Style, Viewport};
use crate::{
    graphics::{gradient::RadialGradient, Argb, DrawContext, Paint, Shadow},
    math::{
        rng::{fork, signed_unit},
        Cplx,
    },
};

pub const PALETTE: [Argb; 8] = [
    0xFF_3B_1E_5A,
    0xFF_1A_1C_6A,
    0xFF_0C_7B_8A,
    0xFF_65_C7_44,
    0xFF_F5_F1_42,
    0xFF_F7_92_1E,
    0xFF_D1_32_5E,
    0xFF_5B_1A_36,
];

pub const RADIUS_MIN: f32 = 5.0;
pub const RADIUS_MAX: f32 = 20.0;

pub const EMIT_INTERVAL: u32 = 5;
pub const MAX_SMOKE: usize = 30;

const SMOKE_ANCHOR: f32 = 0.8;
const HIGHLIGHT_SHIFT: f32 = 0.3;
const HIGHLIGHT: Argb = 0xCC_FF_FF_FF;
const HIGHLIGHT_FALLOFF: f32 = 0.7;

const BODY_SHADOW: Shadow = Shadow {
    color: 0x4D_00_00_00,
    blur: 10.0,
    offset: Cplx::new(3.0, 3.0),
};

#[derive(Debug, Clone)]
pub struct Bubble {
    pub pos: Cplx,
    pub vel: Cplx,
    pub radius: f32,
    pub color: Argb,

    smoke: Vec<SmokeParticle>,
    emit_counter: u32,
    rng: StdRng,
}

impl Bubble {
    pub fn new(pos: Cplx, vel: Cplx, radius: f32, color: Argb, rng: StdRng) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
            smoke: Vec::with_capacity(MAX_SMOKE),
            emit_counter: 0,
            rng,
        }
    }

    pub fn spawn<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        let pos = viewport.random_point(rng);
        let radius = rng.gen_range(RADIUS_MIN..RADIUS_MAX);
        let color = PALETTE[rng.gen_range(0..PALETTE.len())];
        let vel = Cplx::new(signed_unit(rng), signed_unit(rng));

        Self::new(pos, vel, radius, color, fork(rng))
    }

    #[cfg(test)]
    pub(crate) fn smoke(&self) -> &[SmokeParticle] {
        &self.smoke
    }

    #[cfg(test)]
    pub(crate) fn push_smoke(&mut self, particle: SmokeParticle) {
        self.smoke.push(particle);
    }

    pub fn update(&mut self, viewport: Viewport, style: Style) {
        self.pos += self.vel;

        let (w, h) = viewport.sizef();
        self.pos.x = bounce(self.pos.x, &mut self.vel.x, self.radius, w);
        self.pos.y = bounce(self.pos.y, &mut self.vel.y, self.radius, h);

        if style == Style::Smoke {
            self.update_smoke();
        }
    }

    fn update_smoke(&mut self) {
        self.emit_counter += 1;

        if self.emit_counter >= EMIT_INTERVAL {
            if self.smoke.len() < MAX_SMOKE {
                self.emit_smoke();
            }
            self.emit_counter = 0;
        }

        self.smoke.iter_mut().for_each(SmokeParticle::update);
        self.smoke.retain(SmokeParticle::is_alive);
    }

    fn emit_smoke(&mut self) {
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let anchor = self.pos + Cplx::from_angle(angle) * (self.radius * SMOKE_ANCHOR);

        let particle = SmokeParticle::spawn(anchor, self.radius, &mut self.rng);
        self.smoke.push(particle);
    }

    /// Jump to a random spot inside `viewport`, keeping everything else.
    pub fn relocate<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        self.pos = viewport.random_point(rng);
    }

    pub fn draw<D: DrawContext>(&self, ctx: &mut D, style: Style) {
        match style {
            Style::Flat => {
                ctx.begin_path();
                ctx.arc(self.pos, self.radius);
                ctx.set_fill(Paint::Solid(self.color));
                ctx.fill();
                ctx.close_path();
            }

            Style::Smoke => {
                for particle in &self.smoke {
                    particle.draw(ctx);
                }

                let focus = self.pos - Cplx::new(self.radius, self.radius) * HIGHLIGHT_SHIFT;
                let gradient = RadialGradient::new(focus, self.radius)
                    .add_color_stop(0.0, HIGHLIGHT)
                    .add_color_stop(HIGHLIGHT_FALLOFF, self.color);

                ctx.save();
                ctx.set_shadow(BODY_SHADOW);
                ctx.begin_path();
                ctx.arc(self.pos, self.radius);
                ctx.set_fill(Paint::Radial(gradient));
                ctx.fill();
                ctx.close_path();
                ctx.restore();
            }
        }
    }
}

/// Reflect off either wall and pin the edge to it.
fn bounce(pos: f32, vel: &mut f32, radius: f32, extent: f32) -> f32 {
    if pos + radius > extent || pos - radius < 0.0 {
        *vel = -*vel;
        return radius.max((extent - radius).min(pos));
    }

    pos
}

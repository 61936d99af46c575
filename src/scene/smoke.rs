use rand::Rng;

use crate::{
    graphics::{blend, Argb, DrawContext, Paint, Pixel},
    math::{rng::signed_unit, Cplx},
};

pub const SMOKE_COLOR: Argb = 0xFF_DC_DC_E6;
pub const MAX_OPACITY: f32 = 0.3;
const GROWTH: f32 = 0.5;

const LIFE_MIN: i32 = 60;
const LIFE_MAX: i32 = 120;

/// A fading puff that drifts upward from its owning bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeParticle {
    pub pos: Cplx,
    pub vel: Cplx,
    pub radius: f32,
    initial_radius: f32,
    life: i32,
    initial_life: i32,
    opacity: f32,
}

impl SmokeParticle {
    pub fn new(pos: Cplx, vel: Cplx, radius: f32, life: i32) -> Self {
        let life = life.max(1);

        Self {
            pos,
            vel,
            radius,
            initial_radius: radius,
            life,
            initial_life: life,
            opacity: MAX_OPACITY,
        }
    }

    /// Random puff for a bubble of `owner_radius`, placed at `pos`.
    pub fn spawn<R: Rng + ?Sized>(pos: Cplx, owner_radius: f32, rng: &mut R) -> Self {
        let radius = owner_radius * rng.gen_range(0.3..0.6);
        let life = rng.gen_range(LIFE_MIN..LIFE_MAX);
        let vel = Cplx::new(signed_unit(rng) * 0.3, rng.gen_range(-0.8..-0.3));

        Self::new(pos, vel, radius, life)
    }

    #[cfg(test)]
    pub(crate) fn life(&self) -> i32 {
        self.life
    }

    #[cfg(test)]
    pub(crate) fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    pub fn life_ratio(&self) -> f32 {
        (self.life as f32 / self.initial_life as f32).max(0.0)
    }

    pub fn update(&mut self) {
        self.life -= 1;
        self.pos += self.vel;

        let ratio = self.life_ratio();
        self.radius = self.initial_radius * (1.0 + (1.0 - ratio) * GROWTH);
        self.opacity = ratio * MAX_OPACITY;
    }

    pub fn draw<D: DrawContext>(&self, ctx: &mut D) {
        if !self.is_alive() {
            return;
        }

        ctx.begin_path();
        ctx.arc(self.pos, self.radius);
        ctx.set_fill(Paint::Solid(
            SMOKE_COLOR.set_alpha(blend::alpha_of(self.opacity)),
        ));
        ctx.fill();
        ctx.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rng;

    #[test]
    fn opacity_never_increases() {
        let mut p = SmokeParticle::new(Cplx::new(50.0, 50.0), Cplx::new(0.1, -0.5), 4.0, 90);
        let mut last = p.opacity();

        while p.is_alive() {
            p.update();
            assert!(p.opacity() <= last);
            last = p.opacity();
        }
    }

    #[test]
    fn opacity_is_zero_only_when_dead() {
        let mut p = SmokeParticle::new(Cplx::zero(), Cplx::zero(), 4.0, 40);

        for _ in 0..60 {
            p.update();
            assert_eq!(p.opacity() == 0.0, p.life() <= 0);
        }
    }

    #[test]
    fn radius_grows_with_age() {
        let mut p = SmokeParticle::new(Cplx::zero(), Cplx::zero(), 4.0, 10);

        for _ in 0..5 {
            p.update();
        }
        assert!((p.radius - 5.0).abs() < 1e-5);

        for _ in 0..5 {
            p.update();
        }
        assert!((p.radius - 6.0).abs() < 1e-5);
    }

    #[test]
    fn lifetime_of_one_hundred_frames() {
        let mut p = SmokeParticle::new(Cplx::zero(), Cplx::new(0.0, -1.0), 3.0, 100);

        for _ in 0..99 {
            p.update();
        }
        assert!(p.is_alive());

        p.update();
        assert!(p.life() <= 0);
        assert_eq!(p.pos, Cplx::new(0.0, -100.0));
    }

    #[test]
    fn spawned_puffs_drift_up() {
        let mut rng = rng::source(Some(5));

        for _ in 0..200 {
            let p = SmokeParticle::spawn(Cplx::zero(), 10.0, &mut rng);
            assert!(p.vel.y < 0.0);
            assert!(p.vel.x.abs() <= 0.3);
            assert!((3.0..6.0).contains(&p.radius));
            assert!((LIFE_MIN..LIFE_MAX).contains(&p.life()));
        }
    }
}

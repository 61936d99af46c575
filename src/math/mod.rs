pub mod rng;
mod vec2;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

pub type Cplx = Vec2<f32>;

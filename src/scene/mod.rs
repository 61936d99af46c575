pub mod bubble;
pub mod smoke;

use rand::{rngs::StdRng, Rng};

use crate::{
    graphics::DrawContext,
    math::{rng, Cplx},
};

pub use bubble::Bubble;

pub const DEFAULT_BUBBLES: usize = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn sizef(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// Uniform over `[0, width) x [0, height)`.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Cplx {
        let (w, h) = self.sizef();
        Cplx::new(rng.gen::<f32>() * w, rng.gen::<f32>() * h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Style {
    /// Solid circles.
    Flat,
    /// Shaded circles that trail smoke.
    #[default]
    Smoke,
}

impl Style {
    pub fn get_name(&self) -> &'static str {
        match self {
            Style::Flat => "flat",
            Style::Smoke => "smoke",
        }
    }
}

/// Owns every bubble and the viewport they live in.
pub struct Scene {
    viewport: Viewport,
    bubbles: Vec<Bubble>,
    style: Style,
    rng: StdRng,
}

impl Scene {
    pub fn new(viewport: Viewport, count: usize, style: Style, seed: Option<u64>) -> Self {
        let mut rng = rng::source(seed);

        let bubbles = (0..count)
            .map(|_| Bubble::spawn(viewport, &mut rng))
            .collect();

        Self {
            viewport,
            bubbles,
            style,
            rng,
        }
    }

    #[cfg(test)]
    pub(crate) fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[cfg(test)]
    pub(crate) fn style(&self) -> Style {
        self.style
    }

    #[cfg(test)]
    pub(crate) fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    #[cfg(test)]
    pub(crate) fn bubbles_mut(&mut self) -> &mut [Bubble] {
        &mut self.bubbles
    }

    /// Clear, then advance and draw each bubble in insertion order.
    pub fn frame<D: DrawContext>(&mut self, ctx: &mut D) {
        let (w, h) = self.viewport.sizef();
        ctx.clear_rect(0.0, 0.0, w, h);

        for bubble in self.bubbles.iter_mut() {
            bubble.update(self.viewport, self.style);
            bubble.draw(ctx, self.style);
        }
    }

    /// Advance without drawing.
    #[cfg(test)]
    pub(crate) fn step(&mut self) {
        for bubble in self.bubbles.iter_mut() {
            bubble.update(self.viewport, self.style);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;

        for bubble in self.bubbles.iter_mut() {
            bubble.relocate(viewport, &mut self.rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{Argb, Canvas, Paint, Shadow};

    fn in_bounds(scene: &Scene) -> bool {
        let (w, h) = scene.viewport().sizef();
        scene.bubbles().iter().all(|b| {
            b.pos.x >= b.radius
                && b.pos.x <= w - b.radius
                && b.pos.y >= b.radius
                && b.pos.y <= h - b.radius
        })
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Begin,
        Arc(Cplx, f32),
        Close,
        Fill(Paint),
        Shadow(Shadow),
        Draw,
        Save,
        Restore,
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl DrawContext for Recorder {
        fn clear_rect(&mut self, _: f32, _: f32, _: f32, _: f32) {
            self.ops.push(Op::Clear);
        }
        fn begin_path(&mut self) {
            self.ops.push(Op::Begin);
        }
        fn arc(&mut self, center: Cplx, radius: f32) {
            self.ops.push(Op::Arc(center, radius));
        }
        fn close_path(&mut self) {
            self.ops.push(Op::Close);
        }
        fn set_fill(&mut self, paint: Paint) {
            self.ops.push(Op::Fill(paint));
        }
        fn fill(&mut self) {
            self.ops.push(Op::Draw);
        }
        fn set_shadow(&mut self, shadow: Shadow) {
            self.ops.push(Op::Shadow(shadow));
        }
        fn save(&mut self) {
            self.ops.push(Op::Save);
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }
    }

    #[test]
    fn spawns_requested_count() {
        let scene = Scene::new(Viewport::new(800, 600), DEFAULT_BUBBLES, Style::Smoke, Some(1));
        assert_eq!(scene.bubbles().len(), 75);
        assert_eq!(scene.style(), Style::Smoke);
    }

    #[test]
    fn thousand_frames_stay_in_bounds() {
        for style in [Style::Flat, Style::Smoke] {
            let mut scene = Scene::new(Viewport::new(800, 600), DEFAULT_BUBBLES, style, Some(42));

            for _ in 0..1000 {
                scene.step();
                assert!(in_bounds(&scene));
            }

            assert_eq!(scene.bubbles().len(), DEFAULT_BUBBLES);
        }
    }

    #[test]
    fn rendered_frames_stay_in_bounds() {
        let mut scene = Scene::new(Viewport::new(160, 120), 12, Style::Smoke, Some(8));
        let mut canvas = Canvas::new(160, 120);

        for _ in 0..60 {
            scene.frame(&mut canvas);
            assert!(in_bounds(&scene));
        }

        assert!(canvas.as_slice().iter().any(|p| *p != 0));
    }

    #[test]
    fn same_seed_same_scene() {
        let mut a = Scene::new(Viewport::new(640, 480), 20, Style::Smoke, Some(7));
        let mut b = Scene::new(Viewport::new(640, 480), 20, Style::Smoke, Some(7));

        for _ in 0..120 {
            a.step();
            b.step();
        }

        for (x, y) in a.bubbles().iter().zip(b.bubbles()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.smoke(), y.smoke());
        }
    }

    #[test]
    fn repeated_resize_only_moves_bubbles() {
        let mut scene = Scene::new(Viewport::new(800, 600), DEFAULT_BUBBLES, Style::Smoke, Some(3));
        for _ in 0..30 {
            scene.step();
        }

        let before: Vec<_> = scene
            .bubbles()
            .iter()
            .map(|b| (b.vel, b.radius, b.color, b.smoke().to_vec()))
            .collect();

        let view = Viewport::new(320, 200);
        scene.resize(view);
        scene.resize(view);

        assert_eq!(scene.viewport(), view);

        for (b, (vel, radius, color, smoke)) in scene.bubbles().iter().zip(before) {
            assert_eq!(b.vel, vel);
            assert_eq!(b.radius, radius);
            assert_eq!(b.color, color);
            assert_eq!(b.smoke(), &smoke[..]);
            assert!((0.0..320.0).contains(&b.pos.x));
            assert!((0.0..200.0).contains(&b.pos.y));
        }

        for _ in 0..10 {
            scene.step();
        }
        assert!(in_bounds(&scene));
    }

    #[test]
    fn smoke_is_drawn_under_a_shadowed_body() {
        let mut scene = Scene::new(Viewport::new(800, 600), 1, Style::Smoke, Some(9));
        scene.bubbles_mut()[0].pos = Cplx::new(400.0, 300.0);

        let mut rec = Recorder::default();
        for _ in 0..10 {
            rec.ops.clear();
            scene.frame(&mut rec);
        }

        let ops = &rec.ops;
        assert_eq!(ops[0], Op::Clear);

        let save = ops.iter().position(|op| *op == Op::Save).unwrap();
        let restore = ops.iter().position(|op| *op == Op::Restore).unwrap();
        let shadow = ops
            .iter()
            .position(|op| matches!(op, Op::Shadow(_)))
            .unwrap();
        let smoke_fills = ops[..save]
            .iter()
            .filter(|op| matches!(op, Op::Fill(Paint::Solid(_))))
            .count();

        assert_eq!(smoke_fills, scene.bubbles()[0].smoke().len());
        assert!(smoke_fills > 0);
        assert!(save < shadow && shadow < restore);
        assert!(ops[save..restore]
            .iter()
            .any(|op| matches!(op, Op::Fill(Paint::Radial(_)))));
        assert_eq!(*ops.last().unwrap(), Op::Restore);
    }

    #[test]
    fn flat_style_is_one_solid_fill_per_bubble() {
        let mut scene = Scene::new(Viewport::new(200, 200), 4, Style::Flat, Some(4));
        let mut rec = Recorder::default();
        scene.frame(&mut rec);

        let fills: Vec<Argb> = rec
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill(Paint::Solid(c)) => Some(*c),
                _ => None,
            })
            .collect();

        let colors: Vec<Argb> = scene.bubbles().iter().map(|b| b.color).collect();
        assert_eq!(fills, colors);
        assert!(!rec.ops.contains(&Op::Save));
    }

    #[test]
    fn gradient_highlight_sits_upper_left() {
        let mut scene = Scene::new(Viewport::new(800, 600), 1, Style::Smoke, Some(5));
        let mut rec = Recorder::default();
        scene.frame(&mut rec);

        let b = &scene.bubbles()[0];
        let gradient = rec
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Fill(Paint::Radial(g)) => Some(g.clone()),
                _ => None,
            })
            .unwrap();

        let expected = b.pos - Cplx::new(b.radius, b.radius) * 0.3;
        assert!(gradient.center.dist(expected) < 1e-4);
        assert_eq!(gradient.stops().last().map(|s| s.color), Some(b.color));
    }
}

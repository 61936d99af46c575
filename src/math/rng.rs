use rand::{rngs::StdRng, Rng, SeedableRng};

/// Seeded generator, or one drawn from OS entropy when no seed is given.
pub fn source(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Derive an independent generator for a single entity.
pub fn fork<R: Rng + ?Sized>(parent: &mut R) -> StdRng {
    StdRng::seed_from_u64(parent.gen())
}

/// Uniform in `[-1, 1)`.
pub fn signed_unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0
}

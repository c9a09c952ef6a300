//! Random number sources for map initialization and sample picking.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random numbers as consumed by the trainer.
///
/// A source is constructed by the caller and handed to each training run,
/// so two runs only share a stream when the caller wants them to.
pub trait RandomSource {
    /// Returns a uniform float in `[0, 1)`.
    fn sample(&mut self) -> f32;

    /// Returns a uniform index in `[0, max)`. `max` must be at least 1.
    fn sample_index(&mut self, max: usize) -> usize;
}

/// ChaCha8-backed random source.
#[derive(Debug, Clone)]
pub struct ChaChaSource {
    rng: ChaCha8Rng,
}

impl ChaChaSource {
    /// Creates a deterministic source from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, from entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for ChaChaSource {
    #[inline]
    fn sample(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    #[inline]
    fn sample_index(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..max)
    }
}

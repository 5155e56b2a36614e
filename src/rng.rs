//! Where shuffle indices come from.
//!
//! The shuffler only asks for "an index up to n", so games draw from a
//! `SmallRng` while tests script the exact sequence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Something that hands out shuffle indices.
pub trait IndexSource {
    /// A value in `[0, max]`, both ends inclusive.
    fn index_up_to(&mut self, max: usize) -> usize;
}

/// Random index source used by live puzzles.
pub struct WasmRng {
    inner: SmallRng,
}

impl WasmRng {
    /// Seeded from `getrandom`, which is `crypto.getRandomValues` in a browser.
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Same seed, same shuffles.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    #[inline(always)]
    pub fn gen_inclusive(&mut self, max: usize) -> usize {
        self.inner.random_range(0..=max)
    }
}

impl Default for WasmRng {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexSource for WasmRng {
    fn index_up_to(&mut self, max: usize) -> usize {
        self.gen_inclusive(max)
    }
}

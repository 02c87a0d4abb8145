// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, Rng, SeedableRng};

/// A uniform `[0, 1)` generator.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

pub struct SeededSource {
    mt: StdRng,
}

impl SeededSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            mt: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os() -> Self {
        Self {
            mt: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.mt.random::<f64>()
    }
}

/// Integer in `[low, high)`.
pub fn uniform_int<R: RandomSource + ?Sized>(rng: &mut R, low: i64, high: i64) -> i64 {
    (low as f64 + rng.next_unit() * (high - low) as f64).floor() as i64
}

/// Continuous value in `[low, high)`.
pub fn uniform_float<R: RandomSource + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + rng.next_unit() * (high - low)
}

//! Entropy source: a seeded PCG stream keyed from the block hash.
//!
//! Every random choice a render makes is drawn from one `EntropySource`,
//! constructed fresh per render. The composer consumes draws in a fixed
//! order, so [`EntropySource::draws`] doubles as a cursor that tests pin
//! per layer.

use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64;
use tracing::trace;

use crate::error::RenderError;

/// Number of leading hash digits that make up the seed.
const SEED_DIGITS: usize = 16;

/// Derives the 64-bit seed from the first 16 hex digits of a block hash.
/// A `0x` prefix is skipped; shorter hashes use every digit they have.
pub fn seed_from_hash(hash: &str) -> Result<u64, RenderError> {
    let digits = hash
        .strip_prefix("0x")
        .or_else(|| hash.strip_prefix("0X"))
        .unwrap_or(hash);
    let head: String = digits.chars().take(SEED_DIGITS).collect();
    if head.is_empty() {
        return Err(RenderError::InvalidBlockData(format!(
            "block hash {hash:?} has no hex digits"
        )));
    }
    u64::from_str_radix(&head, 16).map_err(|err| {
        RenderError::InvalidBlockData(format!("block hash {hash:?} is not hex: {err}"))
    })
}

/// Per-render pseudo-random stream.
pub struct EntropySource {
    rng: Pcg64,
    seed: u64,
    draws: u64,
}

impl EntropySource {
    /// Seeds the stream and burns the first output.
    pub fn new(seed: u64) -> Self {
        let mut source = Self {
            rng: Pcg64::seed_from_u64(seed),
            seed,
            draws: 0,
        };
        // The first output after seeding sits too close to the same value
        // across nearby seeds.
        source.next();
        source
    }

    pub fn from_block_hash(hash: &str) -> Result<Self, RenderError> {
        seed_from_hash(hash).map(Self::new)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws taken so far, including the burned one.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Uniform float in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen::<f64>()
    }

    /// Uniform integer in `[0, bound)`. A zero bound yields zero without drawing.
    pub fn next_int(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        let scaled = (self.next() * bound as f64) as usize;
        scaled.min(bound - 1)
    }

    /// Uniform float between `lo` and `hi`; the bounds may come in either order.
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next()
    }

    /// Normal sample. A zero or invalid deviation collapses to `mean`, still
    /// taking one draw so the stream stays aligned.
    pub fn next_gaussian(&mut self, mean: f64, stdev: f64) -> f64 {
        self.draws += 1;
        match Normal::new(mean, stdev) {
            Ok(normal) if stdev > 0.0 => normal.sample(&mut self.rng),
            _ => {
                let _ = self.rng.gen::<f64>();
                mean
            }
        }
    }

    /// Fisher–Yates: walk `i` from `n - 1` down to 1 and swap with `next_int(i + 1)`.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_int(i + 1);
            items.swap(i, j);
        }
        trace!(len = items.len(), draws = self.draws, "shuffled");
    }
}

/// Smooth 1-D noise in `[0, 1)`, seeded from the block seed. Takes no draws.
pub struct CoherentNoise {
    perlin: Perlin,
}

impl CoherentNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            perlin: Perlin::new(seed as u32),
        }
    }

    pub fn sample(&self, x: f64) -> f64 {
        let raw = self.perlin.get([x, 0.5]);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0 - f64::EPSILON)
    }
}

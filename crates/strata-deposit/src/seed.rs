//! Deterministic seeded randomness for placement attempts.
//!
//! Every placement attempt owns one [`DepositRandom`] seeded from the world
//! seed, the attempt origin, and a per-deposit salt, so the same inputs always
//! reproduce the same voxel writes. Trigonometry goes through `libm` so that
//! geometry is bit-identical across platforms.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_voxel::VoxelPos;

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Derive a u64 seed for one placement attempt.
///
/// Uses SipHash (via std's `DefaultHasher`) to combine the world seed, the
/// attempt origin, and `salt` into a well-distributed u64.
pub fn derive_attempt_seed(world_seed: u64, origin: VoxelPos, salt: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    origin.x.hash(&mut hasher);
    origin.y.hash(&mut hasher);
    origin.z.hash(&mut hasher);
    salt.hash(&mut hasher);
    hasher.finish()
}

/// Stable salt for a deposit name, used to decorrelate deposits attempted at the same origin.
pub fn deposit_salt(name: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}

// ---------------------------------------------------------------------------
// Random source
// ---------------------------------------------------------------------------

/// Seeded pseudo-random source producing uniform integers, floats and doubles.
#[derive(Clone, Debug)]
pub struct DepositRandom {
    rng: ChaCha8Rng,
}

impl DepositRandom {
    /// Create a random source from a raw seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create the random source for one attempt at `origin`.
    pub fn for_attempt(world_seed: u64, origin: VoxelPos, salt: u64) -> Self {
        Self::new(derive_attempt_seed(world_seed, origin, salt))
    }

    /// Uniform integer in `[0, bound)`. Returns 0 when `bound <= 0`.
    pub fn next_int(&mut self, bound: i32) -> i32 {
        if bound <= 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }

    /// Uniform integer in `[lo, hi]`. Returns `lo` when the range is empty.
    pub fn int_between(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_float(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform double in `[0, 1)`.
    pub fn next_double(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Raw 32 random bits.
    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }
}

// ---------------------------------------------------------------------------
// Deterministic math (libm)
// ---------------------------------------------------------------------------

/// Deterministic sine using libm (not platform libc).
#[inline]
pub fn det_sin(x: f64) -> f64 {
    libm::sin(x)
}

/// Deterministic cosine using libm.
#[inline]
pub fn det_cos(x: f64) -> f64 {
    libm::cos(x)
}

/// Deterministic sqrt using libm.
#[inline]
pub fn det_sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

/// `1 / sqrt(x)`.
#[inline]
pub fn inv_sqrt(x: f64) -> f64 {
    1.0 / libm::sqrt(x)
}

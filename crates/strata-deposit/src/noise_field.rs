//! Coherent 3D noise used to perturb dike bands and geode shells.
//!
//! One field is built per deposit feature from the worldgen random source and
//! is read-only afterwards, so it can be shared by every attempt of that
//! deposit.

use noise::{NoiseFn, Simplex};

use crate::seed::DepositRandom;

/// Shape parameters for a [`CoherentNoise`] field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseSettings {
    /// Base frequency. Higher values give smaller features.
    pub frequency: f64,
    /// Number of fBm octaves. Default: 1.
    pub octaves: u32,
    /// Frequency multiplier per octave. Default: 2.0.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave. Default: 0.5.
    pub persistence: f64,
}

impl NoiseSettings {
    /// Band noise for dikes: a single broad octave.
    pub const DIKE: Self = Self {
        frequency: 0.1,
        octaves: 1,
        lacunarity: 2.0,
        persistence: 0.5,
    };

    /// Shell perturbation for geodes.
    pub const GEODE: Self = Self {
        frequency: 1.0 / 16.0,
        octaves: 2,
        lacunarity: 2.0,
        persistence: 0.5,
    };
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self::DIKE
    }
}

/// Multi-octave simplex noise sampler.
pub struct CoherentNoise {
    noise: Simplex,
    settings: NoiseSettings,
}

impl CoherentNoise {
    /// Build a field, drawing its seed from `rng`.
    pub fn new(rng: &mut DepositRandom, settings: NoiseSettings) -> Self {
        Self {
            noise: Simplex::new(rng.next_u32()),
            settings,
        }
    }

    /// Returns the settings this field was built with.
    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Sample the field at a voxel coordinate. Returns a value roughly in `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.settings.frequency;
        let mut amplitude = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..self.settings.octaves.max(1) {
            total += self.noise.get([x * frequency, y * frequency, z * frequency]) * amplitude;
            max_amplitude += amplitude;
            frequency *= self.settings.lacunarity;
            amplitude *= self.settings.persistence;
        }

        total / max_amplitude
    }
}

impl std::fmt::Debug for CoherentNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoherentNoise")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

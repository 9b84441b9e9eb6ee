//! Stratum tables: which filler belongs to which stratum, and which ore or
//! sample voxel a material becomes in each stratum.

use hashbrown::HashMap;
use strata_voxel::VoxelTypeId;

/// Read-only stratum lookups injected into every placement attempt.
pub trait StrataLookup {
    /// The stratum a filler voxel belongs to, if any.
    fn stratum_of(&self, filler: VoxelTypeId) -> Option<&str>;

    /// The ore voxel for `material` embedded in `stratum`.
    fn ore(&self, stratum: &str, material: &str) -> Option<VoxelTypeId>;

    /// The surface sample voxel for `material` from `stratum`.
    fn sample(&self, stratum: &str, material: &str) -> Option<VoxelTypeId>;
}

/// In-memory [`StrataLookup`] built by the host's registry layer.
#[derive(Clone, Debug, Default)]
pub struct StrataTable {
    fillers: HashMap<VoxelTypeId, String>,
    ores: HashMap<String, HashMap<String, VoxelTypeId>>,
    samples: HashMap<String, HashMap<String, VoxelTypeId>>,
}

impl StrataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `filler` as the host voxel of `stratum`. A filler belongs to one stratum.
    pub fn register_filler(&mut self, filler: VoxelTypeId, stratum: &str) {
        self.fillers.insert(filler, stratum.to_string());
    }

    pub fn register_ore(&mut self, stratum: &str, material: &str, ore: VoxelTypeId) {
        self.ores
            .entry(stratum.to_string())
            .or_default()
            .insert(material.to_string(), ore);
    }

    pub fn register_sample(&mut self, stratum: &str, material: &str, sample: VoxelTypeId) {
        self.samples
            .entry(stratum.to_string())
            .or_default()
            .insert(material.to_string(), sample);
    }

    /// Number of registered fillers.
    pub fn filler_count(&self) -> usize {
        self.fillers.len()
    }
}

impl StrataLookup for StrataTable {
    fn stratum_of(&self, filler: VoxelTypeId) -> Option<&str> {
        self.fillers.get(&filler).map(String::as_str)
    }

    fn ore(&self, stratum: &str, material: &str) -> Option<VoxelTypeId> {
        self.ores.get(stratum)?.get(material).copied()
    }

    fn sample(&self, stratum: &str, material: &str) -> Option<VoxelTypeId> {
        self.samples.get(stratum)?.get(material).copied()
    }
}

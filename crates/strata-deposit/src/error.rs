//! Deposit error types.

use strata_voxel::VoxelTypeId;

/// Configuration problems detected when a deposit feature is built.
#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    /// A fixed block names a voxel type that is not registered.
    #[error("deposit '{deposit}': unknown voxel '{name}'")]
    UnknownVoxel { deposit: String, name: String },

    /// A tag reference names a tag that was never defined.
    #[error("deposit '{deposit}': unknown tag '{tag}'")]
    UnknownTag { deposit: String, tag: String },

    /// The main block list is empty.
    #[error("deposit '{0}' has no blocks")]
    NoBlocks(String),

    /// A block or sample alternative has weight zero.
    #[error("deposit '{deposit}': entry {index} has zero weight")]
    ZeroWeight { deposit: String, index: usize },

    /// The weights of one list add up to more than [`MAX_TOTAL_WEIGHT`](crate::weighted::MAX_TOTAL_WEIGHT).
    #[error("deposit '{deposit}': total weight {total} is too large")]
    WeightOverflow { deposit: String, total: u64 },

    /// `min_y` is above `max_y`, or a per-block range is inverted.
    #[error("deposit '{deposit}': inverted Y range {min}..={max}")]
    InvertedRange { deposit: String, min: i32, max: i32 },

    /// `chance` is above 100.
    #[error("deposit '{deposit}': sample chance {chance} exceeds 100")]
    ChanceOutOfRange { deposit: String, chance: u8 },

    /// A size, radius, or probability is outside its valid range.
    #[error("deposit '{deposit}': invalid {field} {value}")]
    InvalidParameter {
        deposit: String,
        field: &'static str,
        value: f64,
    },
}

/// A lookup table returned content that does not exist in the voxel registry.
///
/// This only happens when a host-supplied table is corrupted; placement logs
/// it and skips the voxel.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("{table} table returned unregistered voxel id {id:?} for '{key}'")]
    UnregisteredContent {
        table: &'static str,
        key: String,
        id: VoxelTypeId,
    },
}

//! Voxel ids, type registry, tags, and the accessor boundary that deposit placement mutates.

pub mod accessor;
pub mod grid;
pub mod pos;
pub mod registry;
pub mod tags;

pub use accessor::{BLOCK_UPDATE, HeightmapKind, NOTIFY_CLIENTS, UpdateFlags, VoxelAccessor};
pub use grid::VoxelGrid;
pub use pos::{Direction, VoxelPos};
pub use registry::{RegistryError, VoxelKind, VoxelTypeDef, VoxelTypeId, VoxelTypeRegistry};
pub use tags::TagRegistry;

//! The voxel accessor boundary: everything deposit placement reads from or
//! writes to the host world goes through [`VoxelAccessor`].

use crate::pos::VoxelPos;
use crate::registry::VoxelTypeId;

/// Bitfield passed along with every write.
pub type UpdateFlags = u8;

/// Update flag bit: neighbouring voxels should react to the change.
pub const BLOCK_UPDATE: UpdateFlags = 0b0000_0001;
/// Update flag bit: connected clients should be told about the change.
pub const NOTIFY_CLIENTS: UpdateFlags = 0b0000_0010;

/// Column height metric used by [`VoxelAccessor::surface_height`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeightmapKind {
    /// One above the topmost non-air voxel.
    WorldSurface,
    /// One above the topmost voxel that blocks motion (fluids are skipped).
    OceanFloor,
}

/// Read/write access to the terrain being decorated.
///
/// The host guarantees exclusive ownership of the accessor for the duration
/// of one placement attempt, so implementations need no internal locking.
pub trait VoxelAccessor {
    /// Returns the content at `pos`. Positions the accessor does not cover read as air.
    fn get(&self, pos: VoxelPos) -> VoxelTypeId;

    /// Writes `voxel` at `pos`.
    fn set(&mut self, pos: VoxelPos, voxel: VoxelTypeId, flags: UpdateFlags);

    /// Returns the height metric for column `(x, z)`.
    fn surface_height(&self, x: i32, z: i32, kind: HeightmapKind) -> i32;

    /// Lowest valid Y (inclusive).
    fn min_build_height(&self) -> i32;

    /// Returns `true` if `y` lies outside the buildable range.
    fn is_outside_build_height(&self, y: i32) -> bool;

    /// Requests a fluid update at `pos` on the next tick.
    fn schedule_fluid_tick(&mut self, pos: VoxelPos);
}

//! Dense in-memory voxel volume implementing [`VoxelAccessor`].
//!
//! A [`VoxelGrid`] covers an axis-aligned box of world space. Reads outside
//! the box return Air, and writes outside the box are ignored with a warning
//! log. Heightmaps are computed exactly by scanning the column, which is fine
//! for the small volumes used in tests and demos.

use std::sync::Arc;

use crate::accessor::{HeightmapKind, UpdateFlags, VoxelAccessor};
use crate::pos::VoxelPos;
use crate::registry::{VoxelKind, VoxelTypeId, VoxelTypeRegistry};

/// A bounded, dense voxel volume.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    registry: Arc<VoxelTypeRegistry>,
    /// Minimum corner (inclusive).
    min: VoxelPos,
    /// Extent along each axis.
    size: [usize; 3],
    /// Voxels in x-major, then z, then y order.
    cells: Vec<VoxelTypeId>,
    /// Positions passed to [`VoxelAccessor::schedule_fluid_tick`], in call order.
    fluid_ticks: Vec<VoxelPos>,
    /// Number of accepted writes.
    writes: u64,
}

impl VoxelGrid {
    /// Creates an all-air grid spanning `min..min + size`.
    ///
    /// The Y extent doubles as the build height range.
    pub fn new(registry: Arc<VoxelTypeRegistry>, min: VoxelPos, size: [usize; 3]) -> Self {
        let volume = size[0] * size[1] * size[2];
        Self {
            registry,
            min,
            size,
            cells: vec![VoxelTypeId::AIR; volume],
            fluid_ticks: Vec::new(),
            writes: 0,
        }
    }

    /// The registry this grid classifies voxels with.
    pub fn registry(&self) -> &VoxelTypeRegistry {
        &self.registry
    }

    /// Minimum corner (inclusive).
    pub fn min(&self) -> VoxelPos {
        self.min
    }

    /// Maximum corner (inclusive).
    pub fn max(&self) -> VoxelPos {
        self.min.offset(
            self.size[0] as i32 - 1,
            self.size[1] as i32 - 1,
            self.size[2] as i32 - 1,
        )
    }

    /// Returns `true` if `pos` lies inside the grid.
    pub fn contains(&self, pos: VoxelPos) -> bool {
        self.index(pos).is_some()
    }

    fn index(&self, pos: VoxelPos) -> Option<usize> {
        let lx = usize::try_from(pos.x - self.min.x).ok()?;
        let ly = usize::try_from(pos.y - self.min.y).ok()?;
        let lz = usize::try_from(pos.z - self.min.z).ok()?;
        if lx >= self.size[0] || ly >= self.size[1] || lz >= self.size[2] {
            return None;
        }
        Some(lx + lz * self.size[0] + ly * self.size[0] * self.size[2])
    }

    /// Fills every voxel with `y` in `y_min..=y_max` (clamped to the grid).
    ///
    /// Does not count as placement writes.
    pub fn fill_layers(&mut self, y_min: i32, y_max: i32, voxel: VoxelTypeId) {
        let max = self.max();
        for y in y_min.max(self.min.y)..=y_max.min(max.y) {
            for z in self.min.z..=max.z {
                for x in self.min.x..=max.x {
                    if let Some(i) = self.index(VoxelPos::new(x, y, z)) {
                        self.cells[i] = voxel;
                    }
                }
            }
        }
    }

    /// Fills the inclusive box `a..=b` (clamped to the grid). Does not count as placement writes.
    pub fn fill_box(&mut self, a: VoxelPos, b: VoxelPos, voxel: VoxelTypeId) {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            for z in a.z.min(b.z)..=a.z.max(b.z) {
                for x in a.x.min(b.x)..=a.x.max(b.x) {
                    if let Some(i) = self.index(VoxelPos::new(x, y, z)) {
                        self.cells[i] = voxel;
                    }
                }
            }
        }
    }

    /// Raw voxel contents, for whole-grid comparisons.
    pub fn snapshot(&self) -> &[VoxelTypeId] {
        &self.cells
    }

    /// Every position whose content differs from `other`.
    ///
    /// Both grids must share bounds; positions are returned in storage order.
    pub fn diff(&self, other: &Self) -> Vec<VoxelPos> {
        debug_assert_eq!(self.min, other.min);
        debug_assert_eq!(self.size, other.size);
        self.positions()
            .filter(|p| self.get(*p) != other.get(*p))
            .collect()
    }

    /// Every position holding `voxel`.
    pub fn positions_of(&self, voxel: VoxelTypeId) -> Vec<VoxelPos> {
        self.positions().filter(|p| self.get(*p) == voxel).collect()
    }

    /// Number of voxels holding `voxel`.
    pub fn count(&self, voxel: VoxelTypeId) -> usize {
        self.cells.iter().filter(|v| **v == voxel).count()
    }

    /// Fluid tick requests received so far.
    pub fn fluid_ticks(&self) -> &[VoxelPos] {
        &self.fluid_ticks
    }

    /// Number of accepted writes since creation.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    fn positions(&self) -> impl Iterator<Item = VoxelPos> + '_ {
        let (min, [sx, sy, sz]) = (self.min, self.size);
        (0..sy).flat_map(move |y| {
            (0..sz).flat_map(move |z| {
                (0..sx).map(move |x| min.offset(x as i32, y as i32, z as i32))
            })
        })
    }
}

impl VoxelAccessor for VoxelGrid {
    fn get(&self, pos: VoxelPos) -> VoxelTypeId {
        self.index(pos).map_or(VoxelTypeId::AIR, |i| self.cells[i])
    }

    fn set(&mut self, pos: VoxelPos, voxel: VoxelTypeId, _flags: UpdateFlags) {
        let Some(i) = self.index(pos) else {
            tracing::warn!("VoxelGrid::set out of bounds: {}", pos);
            return;
        };
        self.cells[i] = voxel;
        self.writes += 1;
    }

    fn surface_height(&self, x: i32, z: i32, kind: HeightmapKind) -> i32 {
        let max = self.max();
        for y in (self.min.y..=max.y).rev() {
            let voxel_kind = self.registry.kind(self.get(VoxelPos::new(x, y, z)));
            let hit = match kind {
                HeightmapKind::WorldSurface => voxel_kind != VoxelKind::Air,
                HeightmapKind::OceanFloor => voxel_kind.blocks_motion(),
            };
            if hit {
                return y + 1;
            }
        }
        self.min.y
    }

    fn min_build_height(&self) -> i32 {
        self.min.y
    }

    fn is_outside_build_height(&self, y: i32) -> bool {
        y < self.min.y || y > self.max().y
    }

    fn schedule_fluid_tick(&mut self, pos: VoxelPos) {
        self.fluid_ticks.push(pos);
    }
}

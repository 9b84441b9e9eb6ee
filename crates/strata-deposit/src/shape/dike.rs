//! Noise-banded vertical slab spanning the deposit's whole Y range.
//!
//! The band is sampled at offsets from the dike centre, so every dike of a
//! feature carries the same band pattern around its own centre.

use strata_voxel::{VoxelAccessor, VoxelPos};

use crate::attempt::Attempt;
use crate::feature::DepositFeature;
use crate::resolver::OreEntry;
use crate::weighted::WeightedList;

/// Noise values at or above this are inside the band.
pub const BAND_THRESHOLD: f64 = 0.5;

pub(crate) fn place<A: VoxelAccessor + ?Sized>(
    feature: &DepositFeature,
    attempt: &mut Attempt<'_, A>,
) -> bool {
    let model = feature.model();
    let size = model.size;
    let (column_x, column_z) = attempt.origin.column_origin();
    let center_x = column_x + attempt.rng.next_int(16);
    let center_z = column_z + attempt.rng.next_int(16);

    let mut layer = LayerBlocks::default();
    let mut written = 0usize;

    for y in model.min_y..=model.max_y {
        if attempt.world.is_outside_build_height(y) {
            continue;
        }
        let blocks = layer.at(feature.blocks(), y);
        if blocks.is_empty() {
            continue;
        }
        let dy = y - attempt.origin.y;
        for dx in -size..=size {
            for dz in -size..=size {
                if dx * dx + dz * dz > size {
                    continue;
                }
                let value = feature
                    .noise()
                    .sample(f64::from(dx), f64::from(dy), f64::from(dz));
                if value < BAND_THRESHOLD {
                    continue;
                }
                let pos = VoxelPos::new(center_x + dx, y, center_z + dz);
                if attempt.place_from(pos, blocks, feature.target()) {
                    written += 1;
                }
            }
        }
    }

    written > 0
}

/// The block list filtered to one Y level, rebuilt only when the set of
/// allowed entries changes between levels.
#[derive(Default)]
struct LayerBlocks {
    mask: Vec<bool>,
    list: WeightedList<OreEntry>,
}

impl LayerBlocks {
    fn at(&mut self, blocks: &WeightedList<OreEntry>, y: i32) -> &WeightedList<OreEntry> {
        let mask: Vec<bool> = blocks.entries().map(|(e, _)| e.allows_y(y)).collect();
        if mask != self.mask {
            self.list = blocks.filtered(|e| e.allows_y(y));
            self.mask = mask;
        }
        &self.list
    }
}

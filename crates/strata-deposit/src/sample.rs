//! Surface samples: a small blob dropped on the canopy above a deposit.

use strata_voxel::{BLOCK_UPDATE, HeightmapKind, NOTIFY_CLIENTS, VoxelAccessor, VoxelPos};

use crate::attempt::Attempt;
use crate::resolver::{Catalog, ResolvedBlock};
use crate::weighted::WeightedList;

/// Number of random-walk steps.
const WALK_STEPS: usize = 3;
/// Minimum height of the surface above the world floor.
const MIN_FLOOR_CLEARANCE: i32 = 3;

/// Roll for and place a surface sample. Returns the number of sample writes.
///
/// The attempt's `placed` flag is cleared on return whatever the outcome.
pub fn place_samples<A: VoxelAccessor + ?Sized>(
    attempt: &mut Attempt<'_, A>,
    samples: &WeightedList<ResolvedBlock>,
    chance: u8,
) -> usize {
    let rolled = attempt.rng.next_int(100) < i32::from(chance);
    let placed = attempt.take_placed();
    if !rolled || samples.is_empty() || !placed {
        return 0;
    }

    let Some(mut center) = surface_anchor(attempt) else {
        return 0;
    };

    let mut written = 0;
    for _ in 0..WALK_STEPS {
        let i = attempt.rng.next_int(2);
        let j = attempt.rng.next_int(2);
        let k = attempt.rng.next_int(2);
        let f = f64::from(i + j + k) * 0.333 + 0.5;
        let f_sq = f * f;

        for pos in box_around(center, i, j, k) {
            if pos.dist_sq(center) > f_sq {
                continue;
            }
            let Some((index, block)) = samples.pick(attempt.rng) else {
                break;
            };
            let current = attempt.world.get(pos);
            if let Some(voxel) = attempt.resolve(block, index, pos, current, Catalog::Sample) {
                attempt.write(pos, voxel, BLOCK_UPDATE | NOTIFY_CLIENTS);
                written += 1;
            }
        }

        center = center.offset(
            -1 + attempt.rng.next_int(2),
            -attempt.rng.next_int(2),
            -1 + attempt.rng.next_int(2),
        );
    }

    attempt.take_placed();
    written
}

/// The point just above the canopy over the attempt origin, if there is one.
fn surface_anchor<A: VoxelAccessor + ?Sized>(attempt: &Attempt<'_, A>) -> Option<VoxelPos> {
    let origin = attempt.origin;
    let registry = attempt.env.registry;
    let world = &*attempt.world;

    let mut y = world.surface_height(origin.x, origin.z, HeightmapKind::WorldSurface);
    if registry.is_water(world.get(VoxelPos::new(origin.x, y - 1, origin.z))) {
        y = world.surface_height(origin.x, origin.z, HeightmapKind::OceanFloor);
    }
    let surface = VoxelPos::new(origin.x, y, origin.z);

    let canopy = registry.is_canopy(world.get(surface.below()));
    (canopy && y >= world.min_build_height() + MIN_FLOOR_CLEARANCE).then_some(surface)
}

fn box_around(center: VoxelPos, i: i32, j: i32, k: i32) -> impl Iterator<Item = VoxelPos> {
    (center.x - i..=center.x + i).flat_map(move |x| {
        (center.y - j..=center.y + j)
            .flat_map(move |y| (center.z - k..=center.z + k).map(move |z| VoxelPos::new(x, y, z)))
    })
}

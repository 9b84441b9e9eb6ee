//! Discretised sphere, walked one octant at a time and mirrored into the other seven.

use strata_voxel::{VoxelAccessor, VoxelPos};

use crate::attempt::Attempt;
use crate::feature::DepositFeature;
use crate::seed::DepositRandom;

/// Sign of each axis for the eight octants.
const OCTANTS: [[i32; 3]; 8] = [
    [1, 1, 1],
    [-1, 1, 1],
    [1, -1, 1],
    [-1, -1, 1],
    [1, 1, -1],
    [-1, 1, -1],
    [1, -1, -1],
    [-1, -1, -1],
];

/// Sphere center Y: uniform in `[min_y, min(max_y, random(max_y))]`.
///
/// The ceiling never drops below `min_y`, so a range with `max_y <= 0`
/// still yields a valid center.
pub(crate) fn center_y(rng: &mut DepositRandom, min_y: i32, max_y: i32) -> i32 {
    let ceiling = max_y.min(rng.next_int(max_y)).max(min_y);
    rng.int_between(min_y, ceiling)
}

/// Per-octant offsets in `-1..=1` on every axis.
fn octant_offsets(rng: &mut DepositRandom, jitter: bool) -> [[i32; 3]; 8] {
    let mut offsets = [[0; 3]; 8];
    if !jitter {
        return offsets;
    }
    for offset in offsets.iter_mut() {
        for axis in offset.iter_mut() {
            *axis = rng.next_int(3) - 1;
        }
    }
    offsets
}

pub(crate) fn place<A: VoxelAccessor + ?Sized>(
    feature: &DepositFeature,
    attempt: &mut Attempt<'_, A>,
    radius: f64,
    jitter: bool,
) -> bool {
    let model = feature.model();
    let center = VoxelPos::new(
        attempt.origin.x,
        center_y(attempt.rng, model.min_y, model.max_y),
        attempt.origin.z,
    );
    let offsets = octant_offsets(attempt.rng, jitter);

    let inv = 1.0 / radius;
    let ceil = radius.ceil() as i32;
    let mut written = 0usize;

    let mut next_xn = 0.0;
    'x: for x in 0..=ceil {
        let xn = next_xn;
        next_xn = f64::from(x + 1) * inv;
        let mut next_yn = 0.0;
        'y: for y in 0..=ceil {
            let yn = next_yn;
            next_yn = f64::from(y + 1) * inv;
            let mut next_zn = 0.0;
            for z in 0..=ceil {
                let zn = next_zn;
                next_zn = f64::from(z + 1) * inv;

                if xn * xn + yn * yn + zn * zn > 1.0 {
                    if z == 0 {
                        if y == 0 {
                            break 'x;
                        }
                        break 'y;
                    }
                    break;
                }

                for (signs, offset) in OCTANTS.iter().zip(offsets.iter()) {
                    let pos = center.offset(
                        signs[0] * x + offset[0],
                        signs[1] * y + offset[1],
                        signs[2] * z + offset[2],
                    );
                    if !model.contains_y(pos.y) || attempt.world.is_outside_build_height(pos.y) {
                        continue;
                    }
                    if attempt.place_from(pos, feature.blocks(), feature.target()) {
                        written += 1;
                    }
                }
            }
        }
    }

    written > 0
}

//! Dense vein: a chain of overlapping true spheres along a bent line.
//!
//! Unlike the classic vein there is no dedup mask; later spheres re-test
//! voxels already written by earlier ones against their new content.

use std::f64::consts::PI;

use glam::DVec3;
use strata_voxel::{VoxelAccessor, VoxelPos};

use crate::attempt::Attempt;
use crate::feature::DepositFeature;
use crate::seed::{det_cos, det_sin};

pub(crate) fn place<A: VoxelAccessor + ?Sized>(
    feature: &DepositFeature,
    attempt: &mut Attempt<'_, A>,
) -> bool {
    let model = feature.model();
    let size = model.size;
    let origin = attempt.origin;
    let y = attempt.rng.int_between(model.min_y, model.max_y);

    let angle = f64::from(attempt.rng.next_float()) * PI;
    let half_len = f64::from(size) / 8.0;
    let (sin, cos) = (det_sin(angle) * half_len, det_cos(angle) * half_len);
    let start_y = f64::from(y + attempt.rng.next_int(3) - 2);
    let end_y = f64::from(y + attempt.rng.next_int(3) - 2);
    let start = DVec3::new(f64::from(origin.x) + sin, start_y, f64::from(origin.z) + cos);
    let end = DVec3::new(f64::from(origin.x) - sin, end_y, f64::from(origin.z) - cos);

    let mut written = 0usize;
    for step in 0..size {
        let t = f64::from(step) / f64::from(size);
        let center = start.lerp(end, t);
        let scale = attempt.rng.next_double() * f64::from(size) / 16.0;
        let radius = ((det_sin(PI * t) + 1.0) * scale + 1.0) / 2.0;
        written += fill_sphere(feature, attempt, center, radius);
    }

    written > 0
}

fn fill_sphere<A: VoxelAccessor + ?Sized>(
    feature: &DepositFeature,
    attempt: &mut Attempt<'_, A>,
    center: DVec3,
    radius: f64,
) -> usize {
    let model = feature.model();
    let lo = (center - radius).floor();
    let hi = (center + radius).floor();
    let y0 = (lo.y as i32).max(model.min_y);
    let y1 = (hi.y as i32).min(model.max_y);
    let mut written = 0;

    for x in lo.x as i32..=hi.x as i32 {
        let nx = (f64::from(x) + 0.5 - center.x) / radius;
        if nx * nx >= 1.0 {
            continue;
        }
        for y in y0..=y1 {
            let ny = (f64::from(y) + 0.5 - center.y) / radius;
            if nx * nx + ny * ny >= 1.0 || attempt.world.is_outside_build_height(y) {
                continue;
            }
            for z in lo.z as i32..=hi.z as i32 {
                let nz = (f64::from(z) + 0.5 - center.z) / radius;
                if nx * nx + ny * ny + nz * nz >= 1.0 {
                    continue;
                }
                let pos = VoxelPos::new(x, y, z);
                if attempt.place_from(pos, feature.blocks(), feature.target()) {
                    written += 1;
                }
            }
        }
    }

    written
}

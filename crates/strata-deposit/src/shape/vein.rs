//! Classic ellipsoid-chain ore vein.
//!
//! A line segment of length `size / 4` is laid through the origin at a random
//! angle and `size` blobs of varying radius are strung along it. Blobs fully
//! contained in a larger neighbour are dropped before the fill pass.

use std::f64::consts::PI;

use glam::DVec3;
use strata_voxel::{HeightmapKind, NOTIFY_CLIENTS, VoxelAccessor, VoxelPos};

use crate::attempt::Attempt;
use crate::feature::DepositFeature;
use crate::resolver::Catalog;
use crate::seed::{det_cos, det_sin};

/// Probability that the air-exposure check runs for a candidate voxel.
pub const DISCARD_ON_AIR_CHANCE: f32 = 0.5;

/// Inclusive integer box enclosing every blob of one vein.
#[derive(Clone, Copy, Debug)]
struct VeinBox {
    min: VoxelPos,
    width: i32,
    height: i32,
}

impl VeinBox {
    fn max(&self) -> VoxelPos {
        self.min.offset(self.width, self.height, self.width)
    }

    /// Index into the dedup mask.
    fn index(&self, pos: VoxelPos) -> usize {
        let w = (self.width + 1) as usize;
        let h = (self.height + 1) as usize;
        let dx = (pos.x - self.min.x) as usize;
        let dy = (pos.y - self.min.y) as usize;
        let dz = (pos.z - self.min.z) as usize;
        dx + dy * w + dz * w * h
    }

    fn volume(&self) -> usize {
        let w = (self.width + 1) as usize;
        w * w * (self.height + 1) as usize
    }
}

pub(crate) fn place<A: VoxelAccessor + ?Sized>(
    feature: &DepositFeature,
    attempt: &mut Attempt<'_, A>,
) -> bool {
    place_with_discard(feature, attempt, DISCARD_ON_AIR_CHANCE)
}

/// Vein placement where the air-exposure check runs with probability `discard_chance`.
fn place_with_discard<A: VoxelAccessor + ?Sized>(
    feature: &DepositFeature,
    attempt: &mut Attempt<'_, A>,
    discard_chance: f32,
) -> bool {
    let size = feature.model().size;
    let origin = attempt.origin;

    let angle = f64::from(attempt.rng.next_float()) * PI;
    let half_len = f64::from(size) / 8.0;
    let pad = ((f64::from(size) / 16.0 * 2.0 + 1.0) / 2.0).ceil() as i32;

    let (sin, cos) = (det_sin(angle) * half_len, det_cos(angle) * half_len);
    let start_y = f64::from(origin.y + attempt.rng.next_int(3) - 2);
    let end_y = f64::from(origin.y + attempt.rng.next_int(3) - 2);
    let start = DVec3::new(f64::from(origin.x) + sin, start_y, f64::from(origin.z) + cos);
    let end = DVec3::new(f64::from(origin.x) - sin, end_y, f64::from(origin.z) - cos);

    let reach = half_len.ceil() as i32 + pad;
    let bounds = VeinBox {
        min: origin.offset(-reach, -2 - pad, -reach),
        width: 2 * reach,
        height: 2 * (2 + pad),
    };

    // Only place if the box dips below the ocean floor somewhere.
    let submerged = (bounds.min.x..=bounds.max().x).any(|x| {
        (bounds.min.z..=bounds.max().z).any(|z| {
            bounds.min.y <= attempt.world.surface_height(x, z, HeightmapKind::OceanFloor)
        })
    });
    if !submerged {
        return false;
    }

    let blobs = blobs(attempt, size, start, end);
    fill(feature, attempt, &bounds, &blobs, discard_chance) > 0
}

/// Lay out `size` blobs from `start` to `end` and drop the ones swallowed by a neighbour.
fn blobs<A: VoxelAccessor + ?Sized>(
    attempt: &mut Attempt<'_, A>,
    size: i32,
    start: DVec3,
    end: DVec3,
) -> Vec<(DVec3, f64)> {
    let count = size.max(0) as usize;
    let mut blobs = Vec::with_capacity(count);
    for k in 0..count {
        let t = k as f64 / count as f64;
        let center = start.lerp(end, t);
        let scale = attempt.rng.next_double() * f64::from(size) / 16.0;
        let radius = ((det_sin(PI * t) + 1.0) * scale + 1.0) / 2.0;
        blobs.push((center, radius));
    }

    for a in 0..count.saturating_sub(1) {
        if blobs[a].1 <= 0.0 {
            continue;
        }
        for b in a + 1..count {
            if blobs[b].1 <= 0.0 {
                continue;
            }
            let dr = blobs[a].1 - blobs[b].1;
            if dr * dr > blobs[a].0.distance_squared(blobs[b].0) {
                if dr > 0.0 {
                    blobs[b].1 = -1.0;
                } else {
                    blobs[a].1 = -1.0;
                }
            }
        }
    }

    blobs
}

/// Visit every voxel inside a surviving blob once. Returns the number of writes.
fn fill<A: VoxelAccessor + ?Sized>(
    feature: &DepositFeature,
    attempt: &mut Attempt<'_, A>,
    bounds: &VeinBox,
    blobs: &[(DVec3, f64)],
    discard_chance: f32,
) -> usize {
    let mut visited = vec![false; bounds.volume()];
    let max = bounds.max();
    let mut written = 0;

    for &(center, radius) in blobs {
        if radius < 0.0 {
            continue;
        }
        let lo = (center - radius).floor();
        let hi = (center + radius).floor();
        let x0 = (lo.x as i32).max(bounds.min.x);
        let y0 = (lo.y as i32).max(bounds.min.y);
        let z0 = (lo.z as i32).max(bounds.min.z);
        let x1 = (hi.x as i32).max(x0).min(max.x);
        let y1 = (hi.y as i32).max(y0).min(max.y);
        let z1 = (hi.z as i32).max(z0).min(max.z);

        for x in x0..=x1 {
            let nx = (f64::from(x) + 0.5 - center.x) / radius;
            if nx * nx >= 1.0 {
                continue;
            }
            for y in y0..=y1 {
                let ny = (f64::from(y) + 0.5 - center.y) / radius;
                if nx * nx + ny * ny >= 1.0 {
                    continue;
                }
                for z in z0..=z1 {
                    let nz = (f64::from(z) + 0.5 - center.z) / radius;
                    if nx * nx + ny * ny + nz * nz >= 1.0 || attempt.world.is_outside_build_height(y) {
                        continue;
                    }
                    let pos = VoxelPos::new(x, y, z);
                    let slot = bounds.index(pos);
                    if visited[slot] {
                        continue;
                    }
                    visited[slot] = true;
                    if place_voxel(feature, attempt, pos, discard_chance) {
                        written += 1;
                    }
                }
            }
        }
    }

    written
}

fn place_voxel<A: VoxelAccessor + ?Sized>(
    feature: &DepositFeature,
    attempt: &mut Attempt<'_, A>,
    pos: VoxelPos,
    discard_chance: f32,
) -> bool {
    if !feature.model().contains_y(pos.y) {
        return false;
    }
    let Some(current) = attempt.eligible(pos, feature.target()) else {
        return false;
    };
    if attempt.rng.next_float() < discard_chance && attempt.touches_air(pos) {
        return false;
    }

    let blocks = feature.blocks();
    let Some((picked, entry)) = blocks.pick(attempt.rng) else {
        return false;
    };
    let mut found = attempt.resolve(&entry.block, picked, pos, current, Catalog::Ore);
    if found.is_none() {
        for (index, (entry, _)) in blocks.entries().enumerate() {
            if index == picked {
                continue;
            }
            found = attempt.resolve(&entry.block, index, pos, current, Catalog::Ore);
            if found.is_some() {
                break;
            }
        }
    }

    match found {
        Some(voxel) => {
            attempt.write(pos, voxel, NOTIFY_CLIENTS);
            true
        }
        None => false,
    }
}

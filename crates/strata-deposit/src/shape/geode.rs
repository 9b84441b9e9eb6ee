//! Layered geode: concentric shells around a few anchor points, an optional
//! crack through the shell, and crystal growth into the hollow center.
//!
//! Density at a voxel is the sum of `1 / sqrt(d² + offset)` over all anchors,
//! so it rises towards the middle of the geode. Zone thresholds are compared
//! from the innermost outwards.

use strata_voxel::{Direction, NOTIFY_CLIENTS, VoxelAccessor, VoxelPos, VoxelTypeId};

use crate::attempt::Attempt;
use crate::feature::{DepositFeature, GeodeBlocks};
use crate::resolver::{Catalog, ResolvedBlock};
use crate::seed::inv_sqrt;
use crate::weighted::WeightedList;

/// Half-extent of the cube scanned around the origin.
pub const SCAN_RADIUS: i32 = 16;
/// More invalid anchors than this aborts the attempt.
pub const INVALID_ANCHOR_THRESHOLD: u32 = 1;
/// Probability that an inner-fill voxel becomes a growth candidate.
pub const CLUSTER_CHANCE: f32 = 0.35;
const NOISE_MULTIPLIER: f64 = 0.05;
const ANCHOR_DISTANCE: (i32, i32) = (4, 6);
const ANCHOR_POINT_OFFSET: (i32, i32) = (1, 2);
const BASE_CRACK_SIZE: f64 = 2.0;
const CRACK_POINT_OFFSET: f64 = 2.0;

/// Base constants under the inverse square root for each zone, innermost first.
const FILL_LAYER: f64 = 1.7;
const INNER_LAYER: f64 = 2.2;
const MIDDLE_LAYER: f64 = 3.2;
const OUTER_LAYER: f64 = 4.2;

/// The zone a voxel falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeodeZone {
    /// Hollow center.
    Fill,
    /// The mineral layer lining the center.
    InnerFill,
    InnerShell,
    OuterShell,
}

/// Density thresholds, strictly decreasing from `fill` to `outer`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneThresholds {
    pub fill: f64,
    pub inner: f64,
    pub middle: f64,
    pub outer: f64,
}

impl ZoneThresholds {
    /// Thresholds for a geode with `anchors` anchor points.
    pub fn for_anchors(anchors: i32) -> Self {
        let d0 = f64::from(anchors) / f64::from(ANCHOR_DISTANCE.1);
        Self {
            fill: inv_sqrt(FILL_LAYER + d0),
            inner: inv_sqrt(INNER_LAYER + d0),
            middle: inv_sqrt(MIDDLE_LAYER + d0),
            outer: inv_sqrt(OUTER_LAYER + d0),
        }
    }

    /// Classify a shell density. Returns `None` outside the outer shell.
    pub fn classify(&self, density: f64) -> Option<GeodeZone> {
        if density >= self.fill {
            Some(GeodeZone::Fill)
        } else if density >= self.inner {
            Some(GeodeZone::InnerFill)
        } else if density >= self.middle {
            Some(GeodeZone::InnerShell)
        } else if density >= self.outer {
            Some(GeodeZone::OuterShell)
        } else {
            None
        }
    }
}

struct Crack {
    points: Vec<VoxelPos>,
    threshold: f64,
}

pub(crate) fn place<A: VoxelAccessor + ?Sized>(
    feature: &DepositFeature,
    attempt: &mut Attempt<'_, A>,
    layers: &GeodeBlocks,
) -> bool {
    let origin = attempt.origin;
    let anchor_count = attempt.rng.int_between(3, 4);
    let thresholds = ZoneThresholds::for_anchors(anchor_count);
    let d0 = f64::from(anchor_count) / f64::from(ANCHOR_DISTANCE.1);
    let crack_size = BASE_CRACK_SIZE
        + attempt.rng.next_double() / 2.0
        + if anchor_count > 3 { d0 } else { 0.0 };
    let cracked = attempt.rng.next_float() < layers.crack_chance;

    let mut anchors = Vec::with_capacity(anchor_count as usize);
    let mut invalid = 0;
    for _ in 0..anchor_count {
        let (lo, hi) = ANCHOR_DISTANCE;
        let dx = attempt.rng.int_between(lo, hi);
        let dy = attempt.rng.int_between(lo, hi);
        let dz = attempt.rng.int_between(lo, hi);
        let anchor = origin.offset(dx, dy, dz);
        let host = attempt.world.get(anchor);
        if is_invalid_anchor(attempt, layers, host) {
            invalid += 1;
            if invalid > INVALID_ANCHOR_THRESHOLD {
                tracing::debug!(deposit = %attempt.deposit, %origin, "geode aborted on hollow anchors");
                return false;
            }
        }
        let offset = attempt.rng.int_between(ANCHOR_POINT_OFFSET.0, ANCHOR_POINT_OFFSET.1);
        anchors.push((anchor, f64::from(offset)));
    }

    let crack = cracked.then(|| {
        let reach = anchor_count * 2 + 1;
        let (dx, dz) = match attempt.rng.next_int(4) {
            0 => (reach, 0),
            1 => (0, reach),
            2 => (reach, reach),
            _ => (0, 0),
        };
        Crack {
            points: [7, 5, 1].iter().map(|&dy| origin.offset(dx, dy, dz)).collect(),
            threshold: inv_sqrt(crack_size),
        }
    });

    let mut candidates = Vec::new();
    for z in -SCAN_RADIUS..=SCAN_RADIUS {
        for y in -SCAN_RADIUS..=SCAN_RADIUS {
            for x in -SCAN_RADIUS..=SCAN_RADIUS {
                let pos = origin.offset(x, y, z);
                if !feature.model().contains_y(pos.y) || attempt.world.is_outside_build_height(pos.y) {
                    continue;
                }
                let jitter = feature
                    .noise()
                    .sample(f64::from(pos.x), f64::from(pos.y), f64::from(pos.z))
                    * NOISE_MULTIPLIER;
                let density: f64 = anchors
                    .iter()
                    .map(|&(anchor, offset)| inv_sqrt(pos.dist_sq(anchor) + offset) + jitter)
                    .sum();
                let Some(zone) = thresholds.classify(density) else {
                    continue;
                };

                if let Some(crack) = &crack {
                    let crack_density: f64 = crack
                        .points
                        .iter()
                        .map(|&p| inv_sqrt(pos.dist_sq(p) + CRACK_POINT_OFFSET) + jitter)
                        .sum();
                    if crack_density >= crack.threshold && density < thresholds.fill {
                        carve(feature, attempt, pos);
                        continue;
                    }
                }

                match zone {
                    GeodeZone::Fill => fill_zone(feature, attempt, pos, &layers.fill),
                    GeodeZone::InnerFill => {
                        if layers.inner_fill.is_empty() {
                            attempt.place_from(pos, feature.blocks(), feature.target());
                        } else {
                            attempt.place_from(pos, &layers.inner_fill, feature.target());
                        }
                        if attempt.rng.next_float() < CLUSTER_CHANCE {
                            candidates.push(pos);
                        }
                    }
                    GeodeZone::InnerShell => {
                        attempt.place_from(pos, &layers.inner_shell, feature.target());
                    }
                    GeodeZone::OuterShell => {
                        attempt.place_from(pos, &layers.outer_shell, feature.target());
                    }
                }
            }
        }
    }

    grow(attempt, &layers.growth, &candidates);
    true
}

fn is_invalid_anchor<A: VoxelAccessor + ?Sized>(
    attempt: &Attempt<'_, A>,
    layers: &GeodeBlocks,
    voxel: VoxelTypeId,
) -> bool {
    let registry = attempt.env.registry;
    registry.is_air(voxel)
        || registry.is_fluid(voxel)
        || layers
            .invalid_anchor_tag
            .as_deref()
            .is_some_and(|tag| attempt.env.tags.contains(tag, voxel))
}

/// Center zone. An empty list leaves the geode hollow.
fn fill_zone<A: VoxelAccessor + ?Sized>(
    feature: &DepositFeature,
    attempt: &mut Attempt<'_, A>,
    pos: VoxelPos,
    fill: &WeightedList<ResolvedBlock>,
) {
    if fill.is_empty() {
        if attempt.eligible(pos, feature.target()).is_some() {
            attempt.write(pos, VoxelTypeId::AIR, NOTIFY_CLIENTS);
        }
    } else {
        attempt.place_from(pos, fill, feature.target());
    }
}

/// Cut a crack voxel to air and wake adjacent fluids.
fn carve<A: VoxelAccessor + ?Sized>(feature: &DepositFeature, attempt: &mut Attempt<'_, A>, pos: VoxelPos) {
    if attempt.eligible(pos, feature.target()).is_none() {
        return;
    }
    attempt.write(pos, VoxelTypeId::AIR, NOTIFY_CLIENTS);
    for dir in Direction::ALL {
        let next = pos.relative(dir);
        if attempt.env.registry.is_fluid(attempt.world.get(next)) {
            attempt.world.schedule_fluid_tick(next);
        }
    }
}

/// Grow one decoration from each candidate into the first open face.
fn grow<A: VoxelAccessor + ?Sized>(
    attempt: &mut Attempt<'_, A>,
    growth: &WeightedList<ResolvedBlock>,
    candidates: &[VoxelPos],
) {
    if growth.is_empty() {
        return;
    }
    for &candidate in candidates {
        let Some((index, block)) = growth.pick(attempt.rng) else {
            return;
        };
        for dir in Direction::ALL {
            let next = candidate.relative(dir);
            let current = attempt.world.get(next);
            let registry = attempt.env.registry;
            if !(registry.is_air(current) || registry.is_fluid(current)) {
                continue;
            }
            if let Some(voxel) = attempt.resolve(block, index, next, current, Catalog::Ore) {
                attempt.write(next, voxel, NOTIFY_CLIENTS);
            }
            break;
        }
    }
}

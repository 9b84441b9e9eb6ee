//! Placement target predicate: decides whether an existing voxel may be
//! overwritten before any block is resolved.

use strata_voxel::VoxelTypeId;

use crate::error::DepositError;
use crate::model::PlacementTarget;
use crate::resolver::DepositEnv;
use crate::seed::DepositRandom;

/// A [`PlacementTarget`] with names resolved to voxel ids.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetRule {
    Strata,
    Tag(String),
    Voxels(Vec<VoxelTypeId>),
    Chance(Box<TargetRule>, f32),
}

impl TargetRule {
    pub fn compile(
        target: &PlacementTarget,
        env: &DepositEnv<'_>,
        deposit: &str,
    ) -> Result<Self, DepositError> {
        Ok(match target {
            PlacementTarget::Strata => Self::Strata,
            PlacementTarget::Tag(tag) => {
                if !env.tags.is_defined(tag) {
                    return Err(DepositError::UnknownTag {
                        deposit: deposit.to_string(),
                        tag: tag.clone(),
                    });
                }
                Self::Tag(tag.clone())
            }
            PlacementTarget::Voxels(names) => {
                let mut ids = Vec::with_capacity(names.len());
                for name in names {
                    let id = env.registry.lookup_by_name(name).ok_or_else(|| {
                        DepositError::UnknownVoxel {
                            deposit: deposit.to_string(),
                            name: name.clone(),
                        }
                    })?;
                    ids.push(id);
                }
                Self::Voxels(ids)
            }
            PlacementTarget::Chance {
                target,
                probability,
            } => {
                if !(0.0..=1.0).contains(probability) {
                    return Err(DepositError::InvalidParameter {
                        deposit: deposit.to_string(),
                        field: "target probability",
                        value: f64::from(*probability),
                    });
                }
                Self::Chance(Box::new(Self::compile(target, env, deposit)?), *probability)
            }
        })
    }

    /// Returns `true` if `current` may be replaced. Only `Chance` consumes randomness,
    /// and only after its inner rule matched.
    pub fn matches(&self, current: VoxelTypeId, env: &DepositEnv<'_>, rng: &mut DepositRandom) -> bool {
        match self {
            Self::Strata => env.strata.stratum_of(current).is_some(),
            Self::Tag(tag) => env.tags.contains(tag, current),
            Self::Voxels(ids) => ids.contains(&current),
            Self::Chance(inner, probability) => {
                inner.matches(current, env, rng) && rng.next_float() < *probability
            }
        }
    }
}

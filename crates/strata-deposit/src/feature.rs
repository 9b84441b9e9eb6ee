//! [`DepositFeature`]: a validated deposit model with its weighted lists,
//! placement target and noise field prepared once, ready for any number of
//! placement attempts.

use strata_voxel::{VoxelAccessor, VoxelPos};

use crate::attempt::Attempt;
use crate::error::DepositError;
use crate::model::{BlockDefinition, DepositKind, DepositModel, GeodeLayers, SampleBlockDefinition};
use crate::noise_field::{CoherentNoise, NoiseSettings};
use crate::resolver::{DepositEnv, OreEntry, ResolvedBlock};
use crate::sample;
use crate::seed::{DepositRandom, deposit_salt};
use crate::shape;
use crate::target::TargetRule;
use crate::weighted::{MAX_TOTAL_WEIGHT, WeightedList};

/// What one placement attempt did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementOutcome {
    /// Whether the deposit body wrote any non-air voxel.
    pub placed: bool,
    /// Writes issued by the deposit body, air included.
    pub writes: usize,
    /// Writes issued by the surface sample step.
    pub sample_writes: usize,
}

/// Prepared zone lists for a geode.
#[derive(Clone, Debug)]
pub struct GeodeBlocks {
    pub fill: WeightedList<ResolvedBlock>,
    pub inner_fill: WeightedList<ResolvedBlock>,
    pub inner_shell: WeightedList<ResolvedBlock>,
    pub outer_shell: WeightedList<ResolvedBlock>,
    pub growth: WeightedList<ResolvedBlock>,
    pub crack_chance: f32,
    pub invalid_anchor_tag: Option<String>,
}

pub struct DepositFeature {
    model: DepositModel,
    target: TargetRule,
    blocks: WeightedList<OreEntry>,
    samples: WeightedList<ResolvedBlock>,
    noise: CoherentNoise,
    geode: Option<GeodeBlocks>,
    salt: u64,
}

impl DepositFeature {
    /// Validate `model` against the registry and tags and prepare it for placement.
    ///
    /// `worldgen_seed` seeds the noise field shared by all attempts of this feature.
    pub fn new(model: DepositModel, env: &DepositEnv<'_>, worldgen_seed: u64) -> Result<Self, DepositError> {
        validate(&model)?;
        let name = model.name.as_str();

        let target = TargetRule::compile(&model.target, env, name)?;
        let blocks = ore_list(&model.blocks, env, name)?;

        let mut samples = Vec::with_capacity(model.sample_blocks.len());
        for (index, SampleBlockDefinition { source, weight }) in model.sample_blocks.iter().enumerate() {
            if *weight == 0 {
                return Err(DepositError::ZeroWeight {
                    deposit: name.to_string(),
                    index,
                });
            }
            samples.push((ResolvedBlock::compile(source, env, name)?, *weight));
        }
        check_total_weight(samples.iter().map(|(_, w)| *w), name)?;

        let geode = match &model.kind {
            DepositKind::Geode(layers) => Some(geode_blocks(layers, env, name)?),
            _ => None,
        };

        let settings = match model.kind {
            DepositKind::Geode(_) => NoiseSettings::GEODE,
            _ => NoiseSettings::DIKE,
        };
        let noise = CoherentNoise::new(&mut DepositRandom::new(worldgen_seed), settings);

        tracing::debug!(
            deposit = %model.name,
            kind = model.kind.label(),
            blocks = blocks.len(),
            samples = samples.len(),
            "deposit feature prepared"
        );

        Ok(Self {
            salt: deposit_salt(&model.name),
            model,
            target,
            blocks,
            samples: WeightedList::new(samples),
            noise,
            geode,
        })
    }

    pub fn model(&self) -> &DepositModel {
        &self.model
    }

    pub fn name(&self) -> &str {
        &self.model.name
    }

    pub fn target(&self) -> &TargetRule {
        &self.target
    }

    pub fn blocks(&self) -> &WeightedList<OreEntry> {
        &self.blocks
    }

    pub fn samples(&self) -> &WeightedList<ResolvedBlock> {
        &self.samples
    }

    pub fn noise(&self) -> &CoherentNoise {
        &self.noise
    }

    pub fn geode(&self) -> Option<&GeodeBlocks> {
        self.geode.as_ref()
    }

    /// The random source for an attempt of this deposit at `origin`.
    pub fn attempt_random(&self, world_seed: u64, origin: VoxelPos) -> DepositRandom {
        DepositRandom::for_attempt(world_seed, origin, self.salt)
    }

    /// Run one placement attempt at `origin`, followed by the surface sample step.
    pub fn place<A: VoxelAccessor + ?Sized>(
        &self,
        world: &mut A,
        env: &DepositEnv<'_>,
        origin: VoxelPos,
        rng: &mut DepositRandom,
    ) -> PlacementOutcome {
        let mut attempt = Attempt::new(world, *env, rng, origin, &self.model.name);

        let shaped = match &self.model.kind {
            DepositKind::Vanilla => shape::vein::place(self, &mut attempt),
            DepositKind::Sphere { radius, jitter } => {
                shape::sphere::place(self, &mut attempt, *radius, *jitter)
            }
            DepositKind::Dike => shape::dike::place(self, &mut attempt),
            DepositKind::Geode(_) => match &self.geode {
                Some(layers) => shape::geode::place(self, &mut attempt, layers),
                None => false,
            },
            DepositKind::Dense => shape::dense::place(self, &mut attempt),
        };

        let placed = attempt.placed();
        let writes = attempt.writes();
        let sample_writes = sample::place_samples(&mut attempt, &self.samples, self.model.chance);

        tracing::trace!(
            deposit = %self.model.name,
            %origin,
            shaped,
            placed,
            writes,
            sample_writes,
            "deposit attempt finished"
        );

        PlacementOutcome {
            placed,
            writes,
            sample_writes,
        }
    }
}

impl std::fmt::Debug for DepositFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepositFeature")
            .field("model", &self.model)
            .field("target", &self.target)
            .field("blocks", &self.blocks.len())
            .field("samples", &self.samples.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(model: &DepositModel) -> Result<(), DepositError> {
    let name = &model.name;
    if model.min_y > model.max_y {
        return Err(DepositError::InvertedRange {
            deposit: name.clone(),
            min: model.min_y,
            max: model.max_y,
        });
    }
    if model.chance > 100 {
        return Err(DepositError::ChanceOutOfRange {
            deposit: name.clone(),
            chance: model.chance,
        });
    }
    if model.blocks.is_empty() {
        return Err(DepositError::NoBlocks(name.clone()));
    }

    let invalid = |field: &'static str, value: f64| DepositError::InvalidParameter {
        deposit: name.clone(),
        field,
        value,
    };
    match &model.kind {
        DepositKind::Vanilla | DepositKind::Dike | DepositKind::Dense if model.size <= 0 => {
            Err(invalid("size", f64::from(model.size)))
        }
        DepositKind::Sphere { radius, .. } if !radius.is_finite() || *radius <= 0.0 => {
            Err(invalid("radius", *radius))
        }
        DepositKind::Geode(layers) if !(0.0..=1.0).contains(&layers.crack_chance) => {
            Err(invalid("crack chance", f64::from(layers.crack_chance)))
        }
        _ => Ok(()),
    }
}

fn ore_list(
    defs: &[BlockDefinition],
    env: &DepositEnv<'_>,
    deposit: &str,
) -> Result<WeightedList<OreEntry>, DepositError> {
    let mut entries = Vec::with_capacity(defs.len());
    for (index, def) in defs.iter().enumerate() {
        if def.weight == 0 {
            return Err(DepositError::ZeroWeight {
                deposit: deposit.to_string(),
                index,
            });
        }
        if let Some((min, max)) = def.y_range
            && min > max
        {
            return Err(DepositError::InvertedRange {
                deposit: deposit.to_string(),
                min,
                max,
            });
        }
        let block = ResolvedBlock::compile(&def.source, env, deposit)?;
        entries.push((
            OreEntry {
                block,
                y_range: def.y_range,
            },
            def.weight,
        ));
    }
    check_total_weight(entries.iter().map(|(_, w)| *w), deposit)?;
    Ok(WeightedList::new(entries))
}

fn check_total_weight(weights: impl Iterator<Item = u32>, deposit: &str) -> Result<(), DepositError> {
    let total: u64 = weights.map(u64::from).sum();
    if total > MAX_TOTAL_WEIGHT {
        return Err(DepositError::WeightOverflow {
            deposit: deposit.to_string(),
            total,
        });
    }
    Ok(())
}

fn block_list(
    defs: &[BlockDefinition],
    env: &DepositEnv<'_>,
    deposit: &str,
) -> Result<WeightedList<ResolvedBlock>, DepositError> {
    let entries = ore_list(defs, env, deposit)?;
    Ok(WeightedList::new(
        entries.entries().map(|(e, w)| (e.block.clone(), w)),
    ))
}

fn geode_blocks(
    layers: &GeodeLayers,
    env: &DepositEnv<'_>,
    deposit: &str,
) -> Result<GeodeBlocks, DepositError> {
    if let Some(tag) = &layers.invalid_anchor_tag
        && !env.tags.is_defined(tag)
    {
        return Err(DepositError::UnknownTag {
            deposit: deposit.to_string(),
            tag: tag.clone(),
        });
    }
    Ok(GeodeBlocks {
        fill: block_list(&layers.fill, env, deposit)?,
        inner_fill: block_list(&layers.inner_fill, env, deposit)?,
        inner_shell: block_list(&layers.inner_shell, env, deposit)?,
        outer_shell: block_list(&layers.outer_shell, env, deposit)?,
        growth: block_list(&layers.growth, env, deposit)?,
        crack_chance: layers.crack_chance,
        invalid_anchor_tag: layers.invalid_anchor_tag.clone(),
    })
}

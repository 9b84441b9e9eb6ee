//! Deposit placement: five procedural ore shapes, weighted block selection,
//! stratum-aware block resolution and surface samples, all deterministic for
//! a given world seed and attempt origin.
//!
//! ```ignore
//! let feature = DepositFeature::new(model, &env, world_seed)?;
//! let mut rng = feature.attempt_random(world_seed, origin);
//! let outcome = feature.place(&mut world, &env, origin, &mut rng);
//! ```

pub mod attempt;
pub mod error;
pub mod feature;
pub mod model;
pub mod noise_field;
pub mod resolver;
pub mod sample;
pub mod seed;
pub mod shape;
pub mod strata;
pub mod target;
pub mod weighted;

pub use attempt::Attempt;
pub use error::{DepositError, ResolveError};
pub use feature::{DepositFeature, GeodeBlocks, PlacementOutcome};
pub use model::{
    BlockDefinition, BlockSource, DepositKind, DepositModel, GeodeLayers, PlacementTarget,
    SampleBlockDefinition,
};
pub use noise_field::{CoherentNoise, NoiseSettings};
pub use resolver::{Catalog, DepositEnv, OreEntry, ResolvedBlock};
pub use seed::{DepositRandom, derive_attempt_seed};
pub use shape::geode::{GeodeZone, ZoneThresholds};
pub use strata::{StrataLookup, StrataTable};
pub use target::TargetRule;
pub use weighted::WeightedList;

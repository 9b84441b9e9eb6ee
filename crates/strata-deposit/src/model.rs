//! Deposit models: the immutable, already-validated description of one
//! configured deposit type.
//!
//! Models are plain data. They derive serde so a host can load them from its
//! own configuration format, but nothing in this crate parses files.

use serde::{Deserialize, Serialize};

/// Where the content for one weighted alternative comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BlockSource {
    /// A specific voxel type, by registry name.
    Fixed(String),
    /// A uniformly random member of a named tag.
    Tag(String),
    /// A material whose concrete voxel depends on the stratum it lands in.
    ///
    /// For ore blocks the stratum is read from the voxel being replaced, and a
    /// `stratum` here restricts the entry to that stratum only. For sample
    /// blocks, `stratum` names the catalog row to use directly.
    Material {
        material: String,
        #[serde(default)]
        stratum: Option<String>,
    },
}

/// One weighted alternative in a deposit's main block list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub source: BlockSource,
    /// Relative selection weight. Must be positive.
    pub weight: u32,
    /// Inclusive Y range this alternative is restricted to. Only dikes honour it.
    #[serde(default)]
    pub y_range: Option<(i32, i32)>,
}

impl BlockDefinition {
    pub fn fixed(name: impl Into<String>, weight: u32) -> Self {
        Self {
            source: BlockSource::Fixed(name.into()),
            weight,
            y_range: None,
        }
    }

    pub fn tag(name: impl Into<String>, weight: u32) -> Self {
        Self {
            source: BlockSource::Tag(name.into()),
            weight,
            y_range: None,
        }
    }

    pub fn material(material: impl Into<String>, weight: u32) -> Self {
        Self {
            source: BlockSource::Material {
                material: material.into(),
                stratum: None,
            },
            weight,
            y_range: None,
        }
    }

    /// Restrict this alternative to `min..=max`.
    pub fn with_y_range(mut self, min: i32, max: i32) -> Self {
        self.y_range = Some((min, max));
        self
    }
}

/// One weighted alternative for surface samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleBlockDefinition {
    pub source: BlockSource,
    pub weight: u32,
}

impl SampleBlockDefinition {
    pub fn fixed(name: impl Into<String>, weight: u32) -> Self {
        Self {
            source: BlockSource::Fixed(name.into()),
            weight,
        }
    }

    pub fn material(
        material: impl Into<String>,
        stratum: impl Into<String>,
        weight: u32,
    ) -> Self {
        Self {
            source: BlockSource::Material {
                material: material.into(),
                stratum: Some(stratum.into()),
            },
            weight,
        }
    }
}

/// Which existing voxels a deposit may overwrite.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum PlacementTarget {
    /// Any voxel that is the filler of a registered stratum.
    #[default]
    Strata,
    /// Members of a named tag.
    Tag(String),
    /// An explicit list of voxel names.
    Voxels(Vec<String>),
    /// `target` must match, and then a random roll must fall below `probability`.
    Chance {
        target: Box<PlacementTarget>,
        probability: f32,
    },
}

/// Zone block lists and crack settings for a geode.
///
/// When `inner_fill` is empty the deposit's main `blocks` list fills the
/// inner layer (the mineral itself).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeodeLayers {
    /// Probability that a crack is carved through the shell.
    pub crack_chance: f32,
    /// Innermost cavity. Empty means hollow (air).
    #[serde(default)]
    pub fill: Vec<BlockDefinition>,
    /// Mineral layer lining the cavity. Empty falls back to the deposit's `blocks`.
    #[serde(default)]
    pub inner_fill: Vec<BlockDefinition>,
    /// Middle shell. Empty leaves the zone untouched.
    #[serde(default)]
    pub inner_shell: Vec<BlockDefinition>,
    /// Outermost shell. Empty leaves the zone untouched.
    #[serde(default)]
    pub outer_shell: Vec<BlockDefinition>,
    /// Decorations grown from the inner layer into the cavity.
    #[serde(default)]
    pub growth: Vec<BlockDefinition>,
    /// Tag of voxels an anchor point must not land on (besides air and fluids).
    #[serde(default)]
    pub invalid_anchor_tag: Option<String>,
}

/// The five shape algorithms, with their shape-specific parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DepositKind {
    /// Classic ellipsoid-chain ore vein.
    Vanilla,
    /// Discretised sphere placed by octant symmetry.
    Sphere {
        radius: f64,
        /// Per-octant one-voxel offsets that break perfect symmetry.
        #[serde(default = "default_true")]
        jitter: bool,
    },
    /// Noise-banded vertical slab spanning the whole Y range.
    Dike,
    /// Concentric multi-shell structure with an optional crack.
    Geode(GeodeLayers),
    /// Chain of overlapping true spheres along a bent line.
    Dense,
}

fn default_true() -> bool {
    true
}

impl DepositKind {
    /// Short lowercase label, for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vanilla => "vanilla",
            Self::Sphere { .. } => "sphere",
            Self::Dike => "dike",
            Self::Geode(_) => "geode",
            Self::Dense => "dense",
        }
    }
}

/// A fully described deposit type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepositModel {
    /// Unique name, used for logging and seed salting.
    pub name: String,
    pub kind: DepositKind,
    /// Shape size. Its meaning depends on `kind`.
    pub size: i32,
    /// Lowest Y a deposit voxel may be written at (inclusive).
    pub min_y: i32,
    /// Highest Y a deposit voxel may be written at (inclusive).
    pub max_y: i32,
    /// Percent chance (0-100) of attempting a surface sample.
    pub chance: u8,
    #[serde(default)]
    pub target: PlacementTarget,
    pub blocks: Vec<BlockDefinition>,
    #[serde(default)]
    pub sample_blocks: Vec<SampleBlockDefinition>,
}

impl DepositModel {
    /// Returns `true` if `y` lies within `min_y..=max_y`.
    pub fn contains_y(&self, y: i32) -> bool {
        (self.min_y..=self.max_y).contains(&y)
    }
}

//! Generates a small layered test world and decorates it with one deposit of
//! each shape, logging what every deposit placed.

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use strata_config::{CliArgs, Config, GenerationConfig};
use strata_deposit::{
    BlockDefinition, DepositEnv, DepositFeature, DepositKind, DepositModel, DepositRandom, GeodeLayers,
    PlacementOutcome, PlacementTarget, SampleBlockDefinition, StrataTable,
};
use strata_voxel::{
    TagRegistry, VoxelGrid, VoxelKind, VoxelPos, VoxelTypeDef, VoxelTypeId, VoxelTypeRegistry,
};

/// Optional file in the config directory that replaces the built-in deposits.
const DEPOSITS_FILE: &str = "deposits.ron";

/// Voxels the demo terrain is built from.
struct Palette {
    bedrock: VoxelTypeId,
    deepslate: VoxelTypeId,
    stone: VoxelTypeId,
    water: VoxelTypeId,
    leaves: VoxelTypeId,
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(|| dirs::config_dir().map(|dir| dir.join("strata")))
        .unwrap_or_else(|| Path::new(".strata").to_path_buf());

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let generation = &config.generation;
    let (registry, palette) = match build_registry() {
        Ok(built) => built,
        Err(e) => {
            tracing::error!("failed to register voxel types: {e}");
            return;
        }
    };
    let registry = Arc::new(registry);
    let tags = match build_tags(&registry) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::error!("failed to define tags: {e}");
            return;
        }
    };
    let strata = build_strata(&registry, &palette);
    let env = DepositEnv {
        registry: &registry,
        tags: &tags,
        strata: &strata,
    };

    let mut world = build_terrain(registry.clone(), &palette, generation);
    tracing::info!(
        seed = generation.world_seed,
        area = generation.area_chunks,
        min_y = generation.min_build_height,
        max_y = generation.max_build_height,
        "terrain ready"
    );

    let models = load_models(&config_dir);
    for model in models {
        let name = model.name.clone();
        let feature = match DepositFeature::new(model, &env, generation.world_seed) {
            Ok(feature) => feature,
            Err(e) => {
                tracing::error!(deposit = %name, "skipping deposit: {e}");
                continue;
            }
        };
        let totals = decorate(&mut world, &env, &feature, generation);
        tracing::info!(
            deposit = %name,
            kind = feature.model().kind.label(),
            attempts = totals.attempts,
            placed = totals.placed,
            writes = totals.writes,
            samples = totals.sample_writes,
            "deposit finished"
        );
    }

    for name in ["tin_ore", "deepslate_tin_ore", "copper_ore", "amethyst", "tin_sample", "copper_sample"] {
        if let Some(id) = registry.lookup_by_name(name) {
            tracing::info!(voxel = name, count = world.count(id), "final voxel count");
        }
    }
    tracing::info!(
        writes = world.write_count(),
        fluid_ticks = world.fluid_ticks().len(),
        "generation complete"
    );
}

#[derive(Default)]
struct Totals {
    attempts: u32,
    placed: u32,
    writes: usize,
    sample_writes: usize,
}

impl Totals {
    fn add(&mut self, outcome: PlacementOutcome) {
        self.attempts += 1;
        self.placed += u32::from(outcome.placed);
        self.writes += outcome.writes;
        self.sample_writes += outcome.sample_writes;
    }
}

/// Run every configured attempt of one deposit over the whole area.
fn decorate(
    world: &mut VoxelGrid,
    env: &DepositEnv<'_>,
    feature: &DepositFeature,
    generation: &GenerationConfig,
) -> Totals {
    let model = feature.model();
    let min_y = model.min_y.max(generation.min_build_height);
    let max_y = model.max_y.min(generation.max_build_height);
    let mut totals = Totals::default();

    for cx in 0..generation.area_chunks as i32 {
        for cz in 0..generation.area_chunks as i32 {
            let column = VoxelPos::new(cx * 16, 0, cz * 16);
            for attempt in 0..generation.attempts_per_deposit {
                // Host-side origin choice; the deposit draws its own randomness from the origin.
                let mut picker =
                    DepositRandom::for_attempt(generation.world_seed, column, u64::from(attempt));
                let origin = VoxelPos::new(
                    column.x + picker.next_int(16),
                    picker.int_between(min_y, max_y),
                    column.z + picker.next_int(16),
                );
                let mut rng = feature.attempt_random(generation.world_seed, origin);
                totals.add(feature.place(world, env, origin, &mut rng));
            }
        }
    }

    totals
}

fn build_registry() -> Result<(VoxelTypeRegistry, Palette), strata_voxel::RegistryError> {
    let mut registry = VoxelTypeRegistry::new();
    let bedrock = registry.register(VoxelTypeDef::new("bedrock", VoxelKind::Solid))?;
    let deepslate = registry.register(VoxelTypeDef::new("deepslate", VoxelKind::Solid))?;
    let stone = registry.register(VoxelTypeDef::new("stone", VoxelKind::Solid))?;
    let water = registry.register(VoxelTypeDef::new("water", VoxelKind::Water))?;
    let leaves = registry.register(VoxelTypeDef::new("leaves", VoxelKind::Canopy))?;

    for (name, kind) in [
        ("tin_ore", VoxelKind::Solid),
        ("deepslate_tin_ore", VoxelKind::Solid),
        ("copper_ore", VoxelKind::Solid),
        ("deepslate_copper_ore", VoxelKind::Solid),
        ("tin_sample", VoxelKind::Plant),
        ("copper_sample", VoxelKind::Plant),
        ("amethyst", VoxelKind::Solid),
        ("budding_amethyst", VoxelKind::Solid),
        ("calcite", VoxelKind::Solid),
        ("smooth_basalt", VoxelKind::Solid),
        ("amethyst_cluster", VoxelKind::Plant),
        ("granite", VoxelKind::Solid),
        ("diorite", VoxelKind::Solid),
    ] {
        registry.register(VoxelTypeDef::new(name, kind))?;
    }

    Ok((
        registry,
        Palette {
            bedrock,
            deepslate,
            stone,
            water,
            leaves,
        },
    ))
}

fn build_tags(registry: &VoxelTypeRegistry) -> Result<TagRegistry, strata_voxel::RegistryError> {
    let ids = |names: &[&str]| -> Vec<VoxelTypeId> {
        names.iter().filter_map(|n| registry.lookup_by_name(n)).collect()
    };
    let mut tags = TagRegistry::new();
    tags.define(registry, "dike_rock", &ids(&["granite", "diorite"]))?;
    tags.define(registry, "geode_invalid", &ids(&["bedrock"]))?;
    Ok(tags)
}

fn build_strata(registry: &VoxelTypeRegistry, palette: &Palette) -> StrataTable {
    let mut strata = StrataTable::new();
    strata.register_filler(palette.stone, "stone");
    strata.register_filler(palette.deepslate, "deepslate");

    for (stratum, material, ore) in [
        ("stone", "tin", "tin_ore"),
        ("deepslate", "tin", "deepslate_tin_ore"),
        ("stone", "copper", "copper_ore"),
        ("deepslate", "copper", "deepslate_copper_ore"),
    ] {
        if let Some(id) = registry.lookup_by_name(ore) {
            strata.register_ore(stratum, material, id);
        }
    }
    for (material, sample) in [("tin", "tin_sample"), ("copper", "copper_sample")] {
        if let Some(id) = registry.lookup_by_name(sample) {
            strata.register_sample("stone", material, id);
        }
    }
    strata
}

/// Bedrock floor, deepslate below zero, stone above, a lake and a patch of canopy on top.
fn build_terrain(registry: Arc<VoxelTypeRegistry>, palette: &Palette, generation: &GenerationConfig) -> VoxelGrid {
    let width = generation.area_chunks as usize * 16;
    let min_y = generation.min_build_height;
    let max_y = generation.max_build_height.max(min_y);
    let height = (max_y - min_y + 1) as usize;
    let mut world = VoxelGrid::new(registry, VoxelPos::new(0, min_y, 0), [width, height, width]);

    let surface = (min_y + 2 * (max_y - min_y) / 3).max(min_y + 4);
    world.fill_layers(min_y, min_y, palette.bedrock);
    world.fill_layers(min_y + 1, surface.min(-1), palette.deepslate);
    world.fill_layers((min_y + 1).max(0), surface, palette.stone);

    let edge = width as i32 - 1;
    let half = width as i32 / 2;
    world.fill_box(
        VoxelPos::new(0, surface - 4, 0),
        VoxelPos::new(half / 2, surface, half / 2),
        palette.water,
    );
    world.fill_box(
        VoxelPos::new(half, surface + 1, half),
        VoxelPos::new(edge, surface + 1, edge),
        palette.leaves,
    );
    world
}

fn load_models(config_dir: &Path) -> Vec<DepositModel> {
    let path = config_dir.join(DEPOSITS_FILE);
    if !path.exists() {
        return default_models();
    }
    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| ron::from_str::<Vec<DepositModel>>(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(models) => {
            tracing::info!(count = models.len(), path = %path.display(), "loaded deposit models");
            models
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "ignoring deposit file: {e}");
            default_models()
        }
    }
}

fn default_models() -> Vec<DepositModel> {
    let tin = |weight| BlockDefinition::material("tin", weight);
    vec![
        DepositModel {
            name: "tin_vein".into(),
            kind: DepositKind::Vanilla,
            size: 9,
            min_y: -64,
            max_y: 80,
            chance: 30,
            target: PlacementTarget::Strata,
            blocks: vec![tin(1)],
            sample_blocks: vec![SampleBlockDefinition::material("tin", "stone", 1)],
        },
        DepositModel {
            name: "copper_sphere".into(),
            kind: DepositKind::Sphere {
                radius: 3.5,
                jitter: true,
            },
            size: 0,
            min_y: 0,
            max_y: 64,
            chance: 50,
            target: PlacementTarget::Strata,
            blocks: vec![BlockDefinition::material("copper", 4), tin(1)],
            sample_blocks: vec![SampleBlockDefinition::fixed("copper_sample", 1)],
        },
        DepositModel {
            name: "granite_dike".into(),
            kind: DepositKind::Dike,
            size: 8,
            min_y: -48,
            max_y: 60,
            chance: 0,
            target: PlacementTarget::Strata,
            blocks: vec![
                BlockDefinition::tag("dike_rock", 3),
                BlockDefinition::material("copper", 1).with_y_range(-48, 0),
            ],
            sample_blocks: Vec::new(),
        },
        DepositModel {
            name: "amethyst_geode".into(),
            kind: DepositKind::Geode(GeodeLayers {
                crack_chance: 0.95,
                fill: Vec::new(),
                inner_fill: Vec::new(),
                inner_shell: vec![BlockDefinition::fixed("calcite", 1)],
                outer_shell: vec![BlockDefinition::fixed("smooth_basalt", 1)],
                growth: vec![BlockDefinition::fixed("amethyst_cluster", 1)],
                invalid_anchor_tag: Some("geode_invalid".into()),
            }),
            size: 0,
            min_y: -58,
            max_y: 30,
            chance: 0,
            target: PlacementTarget::Chance {
                target: Box::new(PlacementTarget::Strata),
                probability: 0.98,
            },
            blocks: vec![
                BlockDefinition::fixed("amethyst", 12),
                BlockDefinition::fixed("budding_amethyst", 1),
            ],
            sample_blocks: Vec::new(),
        },
        DepositModel {
            name: "dense_tin".into(),
            kind: DepositKind::Dense,
            size: 14,
            min_y: -32,
            max_y: 40,
            chance: 100,
            target: PlacementTarget::Strata,
            blocks: vec![tin(1)],
            sample_blocks: vec![SampleBlockDefinition::material("tin", "stone", 1)],
        },
    ]
}

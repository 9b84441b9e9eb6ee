//! End-to-end placement scenarios against an in-memory voxel grid.

use std::collections::HashSet;
use std::sync::Arc;

use strata_deposit::{
    BlockDefinition, DepositEnv, DepositFeature, DepositKind, DepositModel, DepositRandom, GeodeLayers,
    PlacementTarget, SampleBlockDefinition, StrataTable,
};
use strata_voxel::{
    TagRegistry, VoxelAccessor, VoxelGrid, VoxelKind, VoxelPos, VoxelTypeDef, VoxelTypeId,
    VoxelTypeRegistry,
};

struct Fixture {
    registry: Arc<VoxelTypeRegistry>,
    tags: TagRegistry,
    strata: StrataTable,
    stone: VoxelTypeId,
    dirt: VoxelTypeId,
    water: VoxelTypeId,
    leaves: VoxelTypeId,
    tin_ore: VoxelTypeId,
    tin_sample: VoxelTypeId,
    amethyst: VoxelTypeId,
    cluster: VoxelTypeId,
}

impl Fixture {
    fn new() -> Self {
        let mut registry = VoxelTypeRegistry::new();
        let mut add = |name: &str, kind| registry.register(VoxelTypeDef::new(name, kind)).unwrap();
        let stone = add("stone", VoxelKind::Solid);
        let deepslate = add("deepslate", VoxelKind::Solid);
        let dirt = add("dirt", VoxelKind::Solid);
        let water = add("water", VoxelKind::Water);
        let leaves = add("leaves", VoxelKind::Canopy);
        let tin_ore = add("tin_ore", VoxelKind::Solid);
        let deep_tin_ore = add("deepslate_tin_ore", VoxelKind::Solid);
        let tin_sample = add("tin_sample", VoxelKind::Plant);
        let amethyst = add("amethyst", VoxelKind::Solid);
        add("calcite", VoxelKind::Solid);
        add("basalt", VoxelKind::Solid);
        let cluster = add("cluster", VoxelKind::Plant);

        let mut strata = StrataTable::new();
        strata.register_filler(stone, "stone");
        strata.register_filler(deepslate, "deepslate");
        strata.register_ore("stone", "tin", tin_ore);
        strata.register_ore("deepslate", "tin", deep_tin_ore);
        strata.register_sample("stone", "tin", tin_sample);

        Self {
            registry: Arc::new(registry),
            tags: TagRegistry::new(),
            strata,
            stone,
            dirt,
            water,
            leaves,
            tin_ore,
            tin_sample,
            amethyst,
            cluster,
        }
    }

    fn env(&self) -> DepositEnv<'_> {
        DepositEnv {
            registry: &self.registry,
            tags: &self.tags,
            strata: &self.strata,
        }
    }

    /// A grid spanning `x, z in 0..width` and `y in min_y..=max_y`.
    fn grid(&self, width: usize, min_y: i32, max_y: i32) -> VoxelGrid {
        let height = (max_y - min_y + 1) as usize;
        VoxelGrid::new(self.registry.clone(), VoxelPos::new(0, min_y, 0), [width, height, width])
    }

    fn feature(&self, model: DepositModel) -> DepositFeature {
        self.feature_seeded(model, 7)
    }

    fn feature_seeded(&self, model: DepositModel, worldgen_seed: u64) -> DepositFeature {
        DepositFeature::new(model, &self.env(), worldgen_seed).unwrap()
    }
}

fn model(kind: DepositKind, size: i32, min_y: i32, max_y: i32) -> DepositModel {
    DepositModel {
        name: "tin".into(),
        kind,
        size,
        min_y,
        max_y,
        chance: 0,
        target: PlacementTarget::Strata,
        blocks: vec![BlockDefinition::material("tin", 1)],
        sample_blocks: Vec::new(),
    }
}

fn run(
    fx: &Fixture,
    feature: &DepositFeature,
    grid: &mut VoxelGrid,
    origin: VoxelPos,
    seed: u64,
) -> strata_deposit::PlacementOutcome {
    let mut rng = feature.attempt_random(seed, origin);
    feature.place(grid, &fx.env(), origin, &mut rng)
}

#[test]
fn vanilla_vein_fills_only_stone() {
    let fx = Fixture::new();
    let feature = fx.feature(model(DepositKind::Vanilla, 8, -64, 320));
    let mut total = 0;

    for seed in 0..16u64 {
        let mut grid = fx.grid(32, -64, 320);
        grid.fill_layers(-64, 320, fx.stone);
        let before = grid.clone();
        let origin = VoxelPos::new(16, 40, 16);
        let outcome = run(&fx, &feature, &mut grid, origin, seed);

        let changed = grid.diff(&before);
        assert_eq!(changed.len(), outcome.writes);
        for pos in &changed {
            assert_eq!(before.get(*pos), fx.stone);
            assert_eq!(grid.get(*pos), fx.tin_ore);
            assert!(pos.dist_sq(origin) < 100.0, "{pos} far from origin");
        }
        total += changed.len();
    }
    assert!(total > 0, "no vein placed in 16 attempts");
}

#[test]
fn vanilla_vein_never_replaces_air() {
    let fx = Fixture::new();
    let feature = fx.feature(model(DepositKind::Vanilla, 12, -64, 64));
    for seed in 0..16u64 {
        let mut grid = fx.grid(32, -64, 64);
        grid.fill_layers(-64, 40, fx.stone);
        let origin = VoxelPos::new(16, 40, 16);
        run(&fx, &feature, &mut grid, origin, seed);
        // nothing above the stone surface, ever
        for pos in grid.positions_of(fx.tin_ore) {
            assert!(pos.y <= 40);
        }
    }
}

#[test]
fn vein_respects_model_y_range() {
    let fx = Fixture::new();
    let feature = fx.feature(model(DepositKind::Vanilla, 16, 38, 41));
    for seed in 0..8u64 {
        let mut grid = fx.grid(32, 0, 80);
        grid.fill_layers(0, 80, fx.stone);
        run(&fx, &feature, &mut grid, VoxelPos::new(16, 40, 16), seed);
        for pos in grid.positions_of(fx.tin_ore) {
            assert!((38..=41).contains(&pos.y), "{pos} outside range");
        }
    }
}

#[test]
fn sphere_matches_analytic_ball() {
    let fx = Fixture::new();
    let radius = 3.0;
    let mut m = model(
        DepositKind::Sphere {
            radius,
            jitter: false,
        },
        0,
        0,
        63,
    );
    m.blocks = vec![BlockDefinition::fixed("tin_ore", 1)];
    let feature = fx.feature(m);

    for seed in 0..8u64 {
        let mut grid = fx.grid(32, -16, 80);
        grid.fill_layers(-16, 80, fx.stone);
        let before = grid.clone();
        let origin = VoxelPos::new(16, 0, 16);
        run(&fx, &feature, &mut grid, origin, seed);
        let written: HashSet<VoxelPos> = grid.diff(&before).into_iter().collect();
        assert!(!written.is_empty());

        let inv = 1.0 / radius;
        let expected_for = |cy: i32| -> HashSet<VoxelPos> {
            let mut set = HashSet::new();
            for dx in -3i32..=3 {
                for dy in -3i32..=3 {
                    for dz in -3i32..=3 {
                        let xn = f64::from(dx.abs()) * inv;
                        let yn = f64::from(dy.abs()) * inv;
                        let zn = f64::from(dz.abs()) * inv;
                        let pos = VoxelPos::new(origin.x + dx, cy + dy, origin.z + dz);
                        if xn * xn + yn * yn + zn * zn <= 1.0 && (0..=63).contains(&pos.y) {
                            set.insert(pos);
                        }
                    }
                }
            }
            set
        };
        assert!(
            (0..=63).any(|cy| expected_for(cy) == written),
            "seed {seed}: sphere does not match any analytic ball"
        );
    }
}

#[test]
fn sphere_without_jitter_is_octant_symmetric() {
    let fx = Fixture::new();
    let mut m = model(
        DepositKind::Sphere {
            radius: 4.5,
            jitter: false,
        },
        0,
        20,
        20,
    );
    m.max_y = 60;
    let feature = fx.feature(m);
    let mut grid = fx.grid(32, 0, 80);
    grid.fill_layers(0, 80, fx.stone);
    let origin = VoxelPos::new(16, 0, 16);
    run(&fx, &feature, &mut grid, origin, 3);

    let written: HashSet<VoxelPos> = grid.positions_of(fx.tin_ore).into_iter().collect();
    assert!(!written.is_empty());
    // the equator is the widest layer even when the sphere is clipped
    let cy = (20..=60)
        .max_by_key(|y| written.iter().filter(|p| p.y == *y).count())
        .unwrap();

    for pos in &written {
        let (dx, dy, dz) = (pos.x - origin.x, pos.y - cy, pos.z - origin.z);
        for (sx, sy, sz) in [(1, 1, 1), (-1, 1, 1), (1, -1, 1), (1, 1, -1), (-1, -1, -1)] {
            let mirrored = VoxelPos::new(origin.x + sx * dx, cy + sy * dy, origin.z + sz * dz);
            if (20..=60).contains(&mirrored.y) && (20..=60).contains(&pos.y) {
                assert!(written.contains(&mirrored), "{pos} has no mirror {mirrored}");
            }
        }
    }
}

#[test]
fn dike_on_ineligible_terrain_writes_nothing() {
    let fx = Fixture::new();
    let feature = fx.feature(model(DepositKind::Dike, 6, 0, 40));
    for seed in 0..8u64 {
        let mut grid = fx.grid(32, 0, 48);
        grid.fill_layers(0, 40, fx.dirt);
        let before = grid.clone();
        let outcome = run(&fx, &feature, &mut grid, VoxelPos::new(8, 20, 8), seed);
        assert_eq!(outcome.writes, 0);
        assert!(!outcome.placed);
        assert!(grid.diff(&before).is_empty());
    }
}

#[test]
fn dike_honours_block_y_ranges() {
    let fx = Fixture::new();
    let mut m = model(DepositKind::Dike, 10, 0, 60);
    m.blocks = vec![BlockDefinition::fixed("tin_ore", 1).with_y_range(10, 20)];

    let mut total = 0;
    for worldgen_seed in 0..16u64 {
        let feature = fx.feature_seeded(m.clone(), worldgen_seed);
        let mut grid = fx.grid(64, 0, 60);
        grid.fill_layers(0, 60, fx.stone);
        for cx in 0..4 {
            let origin = VoxelPos::new(cx * 16, 30, 16);
            run(&fx, &feature, &mut grid, origin, 11);
        }
        let ore = grid.positions_of(fx.tin_ore);
        for pos in &ore {
            assert!((10..=20).contains(&pos.y), "{pos} outside block range");
        }
        total += ore.len();
    }
    assert!(total > 0, "no dike band in 16 worldgen seeds");
}

#[test]
fn dike_band_follows_its_centre() {
    let fx = Fixture::new();
    let mut m = model(DepositKind::Dike, 6, 0, 40);
    m.blocks = vec![BlockDefinition::fixed("tin_ore", 1)];

    let mut total = 0;
    for worldgen_seed in 0..16u64 {
        let feature = fx.feature_seeded(m.clone(), worldgen_seed);
        let mut layouts = Vec::new();
        // two columns 32 voxels apart, same random draws
        for origin in [VoxelPos::new(16, 30, 16), VoxelPos::new(48, 30, 16)] {
            let mut grid = fx.grid(80, 0, 48);
            grid.fill_layers(0, 40, fx.stone);
            let mut rng = DepositRandom::new(worldgen_seed);
            feature.place(&mut grid, &fx.env(), origin, &mut rng);
            let ore: HashSet<VoxelPos> = grid
                .positions_of(fx.tin_ore)
                .into_iter()
                .map(|p| p.offset(16 - origin.x, 0, 0))
                .collect();
            layouts.push(ore);
        }
        assert_eq!(layouts[0], layouts[1], "worldgen seed {worldgen_seed}");
        total += layouts[0].len();
    }
    assert!(total > 0, "no dike band in 16 worldgen seeds");
}

fn geode_model() -> DepositModel {
    let mut m = model(
        DepositKind::Geode(GeodeLayers {
            crack_chance: 0.0,
            fill: Vec::new(),
            inner_fill: Vec::new(),
            inner_shell: vec![BlockDefinition::fixed("calcite", 1)],
            outer_shell: vec![BlockDefinition::fixed("basalt", 1)],
            growth: vec![BlockDefinition::fixed("cluster", 1)],
            invalid_anchor_tag: None,
        }),
        0,
        -64,
        128,
    );
    m.blocks = vec![BlockDefinition::fixed("amethyst", 1)];
    m
}

#[test]
fn geode_on_air_aborts() {
    let fx = Fixture::new();
    let feature = fx.feature(geode_model());
    for seed in 0..8u64 {
        let mut grid = fx.grid(48, 0, 64);
        // only a thin floor; every anchor lands in the air above it
        grid.fill_layers(0, 2, fx.stone);
        let before = grid.clone();
        let outcome = run(&fx, &feature, &mut grid, VoxelPos::new(24, 20, 24), seed);
        assert_eq!(outcome.writes, 0);
        assert!(!outcome.placed);
        assert!(grid.diff(&before).is_empty());
    }
}

#[test]
fn geode_in_stone_builds_shells_within_scan_box() {
    let fx = Fixture::new();
    let feature = fx.feature(geode_model());
    let mut grid = fx.grid(64, 0, 64);
    grid.fill_layers(0, 64, fx.stone);
    let before = grid.clone();
    let origin = VoxelPos::new(24, 24, 24);
    let outcome = run(&fx, &feature, &mut grid, origin, 5);

    assert!(outcome.placed);
    assert!(grid.count(fx.amethyst) > 0);
    assert!(grid.count(VoxelTypeId::AIR) > 0, "hollow center missing");
    for pos in grid.diff(&before) {
        assert!((pos.x - origin.x).abs() <= 17);
        assert!((pos.y - origin.y).abs() <= 17);
        assert!((pos.z - origin.z).abs() <= 17);
    }
}

/// Stone with water pillars on a 3-voxel lattice around `origin`, kept
/// clear of the anchor box at offsets 4..=6.
fn pillared_stone(fx: &Fixture, origin: VoxelPos) -> VoxelGrid {
    let mut grid = fx.grid(64, 0, 63);
    grid.fill_layers(0, 63, fx.stone);
    let lattice = |d: i32| d.rem_euclid(3) == 0 && !(4..=6).contains(&d);
    for dx in (-16..=16).filter(|&d| lattice(d)) {
        for dz in (-16..=16).filter(|&d| lattice(d)) {
            let column = VoxelPos::new(origin.x + dx, 0, origin.z + dz);
            grid.fill_box(column, column.offset(0, 63, 0), fx.water);
        }
    }
    grid
}

#[test]
fn geode_crack_carves_wakes_fluid_and_grows_clusters() {
    let fx = Fixture::new();
    let cracked = |growth: Vec<BlockDefinition>| {
        let mut m = geode_model();
        if let DepositKind::Geode(layers) = &mut m.kind {
            layers.crack_chance = 1.0;
            // a solid core, so every new air voxel comes from the crack
            layers.fill = vec![BlockDefinition::fixed("dirt", 1)];
            layers.growth = growth;
        }
        fx.feature(m)
    };
    let grown = cracked(vec![BlockDefinition::fixed("cluster", 1)]);
    let bare = cracked(Vec::new());
    let origin = VoxelPos::new(24, 24, 24);

    let (mut carved, mut ticks, mut clusters) = (0, 0, 0);
    for seed in 0..8u64 {
        let before = pillared_stone(&fx, origin);
        let mut with_growth = before.clone();
        let mut without = before.clone();
        grown.place(&mut with_growth, &fx.env(), origin, &mut DepositRandom::new(seed));
        bare.place(&mut without, &fx.env(), origin, &mut DepositRandom::new(seed));

        carved += before
            .diff(&without)
            .into_iter()
            .filter(|p| before.get(*p) == fx.stone && without.get(*p) == VoxelTypeId::AIR)
            .count();
        for pos in without.fluid_ticks() {
            assert_eq!(without.get(*pos), fx.water, "tick at dry {pos}");
        }
        ticks += without.fluid_ticks().len();

        // growth is the last step, so the bare run shows what each cluster replaced
        for pos in with_growth.positions_of(fx.cluster) {
            let host = without.get(pos);
            assert!(host == VoxelTypeId::AIR || host == fx.water, "cluster over solid at {pos}");
            clusters += 1;
        }
        assert_eq!(without.count(fx.cluster), 0);
    }
    assert!(carved > 0, "no crack carved in 8 attempts");
    assert!(ticks > 0, "no fluid woken in 8 attempts");
    assert!(clusters > 0, "no cluster grown in 8 attempts");
}

#[test]
fn geode_inner_fill_overrides_deposit_blocks() {
    let fx = Fixture::new();
    let mut m = geode_model();
    if let DepositKind::Geode(layers) = &mut m.kind {
        layers.inner_fill = vec![BlockDefinition::fixed("dirt", 1)];
    }
    let feature = fx.feature(m);
    let mut grid = fx.grid(64, 0, 64);
    grid.fill_layers(0, 64, fx.stone);
    let outcome = run(&fx, &feature, &mut grid, VoxelPos::new(24, 24, 24), 5);

    assert!(outcome.placed);
    assert!(grid.count(fx.dirt) > 0);
    assert_eq!(grid.count(fx.amethyst), 0);
}

#[test]
fn dense_without_canopy_never_samples() {
    let fx = Fixture::new();
    let mut m = model(DepositKind::Dense, 5, 0, 40);
    m.chance = 100;
    m.sample_blocks = vec![SampleBlockDefinition::fixed("tin_sample", 1)];
    let feature = fx.feature(m);

    for seed in 0..16u64 {
        let mut grid = fx.grid(32, 0, 64);
        grid.fill_layers(0, 40, fx.stone);
        let outcome = run(&fx, &feature, &mut grid, VoxelPos::new(16, 20, 16), seed);
        assert_eq!(outcome.sample_writes, 0);
        assert_eq!(grid.count(fx.tin_sample), 0);
    }
}

#[test]
fn samples_land_on_canopy_after_placement() {
    let fx = Fixture::new();
    let mut m = model(DepositKind::Dense, 16, 0, 39);
    m.chance = 100;
    m.sample_blocks = vec![SampleBlockDefinition::material("tin", "stone", 1)];
    let feature = fx.feature(m);

    let mut sampled = 0;
    for seed in 0..16u64 {
        let mut grid = fx.grid(32, 0, 64);
        grid.fill_layers(0, 40, fx.stone);
        grid.fill_layers(41, 41, fx.leaves);
        let outcome = run(&fx, &feature, &mut grid, VoxelPos::new(16, 20, 16), seed);
        if outcome.placed {
            assert!(outcome.sample_writes > 0, "seed {seed}: placed but no sample");
            sampled += 1;
        } else {
            assert_eq!(outcome.sample_writes, 0);
        }
        for pos in grid.positions_of(fx.tin_sample) {
            // three walk steps can each sink one voxel
            assert!(pos.y >= 39, "sample too deep at {pos}");
        }
    }
    assert!(sampled > 0);
}

#[test]
fn samples_sink_to_canopy_under_water() {
    let fx = Fixture::new();
    let mut m = model(DepositKind::Dense, 16, 0, 39);
    m.chance = 100;
    m.sample_blocks = vec![SampleBlockDefinition::material("tin", "stone", 1)];
    let feature = fx.feature(m);

    let mut sampled = 0;
    for seed in 0..16u64 {
        let mut grid = fx.grid(32, 0, 64);
        grid.fill_layers(0, 40, fx.stone);
        grid.fill_layers(41, 41, fx.leaves);
        grid.fill_layers(42, 47, fx.water);
        let outcome = run(&fx, &feature, &mut grid, VoxelPos::new(16, 20, 16), seed);
        if outcome.placed {
            assert!(outcome.sample_writes > 0, "seed {seed}: placed but no sample");
        }
        for pos in grid.positions_of(fx.tin_sample) {
            assert!((39..=43).contains(&pos.y), "sample at {pos} is not on the sea floor");
            sampled += 1;
        }
    }
    assert!(sampled > 0);
}

#[test]
fn zero_chance_never_samples() {
    let fx = Fixture::new();
    let mut m = model(DepositKind::Dense, 16, 0, 39);
    m.sample_blocks = vec![SampleBlockDefinition::fixed("tin_sample", 1)];
    let feature = fx.feature(m);
    for seed in 0..8u64 {
        let mut grid = fx.grid(32, 0, 64);
        grid.fill_layers(0, 40, fx.stone);
        grid.fill_layers(41, 41, fx.leaves);
        let outcome = run(&fx, &feature, &mut grid, VoxelPos::new(16, 20, 16), seed);
        assert_eq!(outcome.sample_writes, 0);
    }
}

#[test]
fn dense_stays_in_y_range() {
    let fx = Fixture::new();
    let feature = fx.feature(model(DepositKind::Dense, 24, 18, 22));
    for seed in 0..8u64 {
        let mut grid = fx.grid(48, 0, 40);
        grid.fill_layers(0, 40, fx.stone);
        run(&fx, &feature, &mut grid, VoxelPos::new(24, 20, 24), seed);
        for pos in grid.positions_of(fx.tin_ore) {
            assert!((18..=22).contains(&pos.y), "{pos} outside range");
        }
    }
}

#[test]
fn every_shape_is_deterministic() {
    let fx = Fixture::new();
    let kinds = [
        DepositKind::Vanilla,
        DepositKind::Sphere {
            radius: 4.0,
            jitter: true,
        },
        DepositKind::Dike,
        geode_model().kind,
        DepositKind::Dense,
    ];
    for kind in kinds {
        let mut m = model(kind, 10, 0, 63);
        if matches!(m.kind, DepositKind::Geode(_)) {
            m = geode_model();
        }
        let feature = fx.feature(m);
        let mut grids = Vec::new();
        for _ in 0..2 {
            let mut grid = fx.grid(64, 0, 63);
            grid.fill_layers(0, 63, fx.stone);
            let origin = VoxelPos::new(30, 30, 30);
            let mut rng = DepositRandom::for_attempt(99, origin, 1);
            feature.place(&mut grid, &fx.env(), origin, &mut rng);
            grids.push(grid);
        }
        assert_eq!(
            grids[0].snapshot(),
            grids[1].snapshot(),
            "{} is not deterministic",
            feature.model().kind.label()
        );
    }
}

//! Block resolution: turns a weighted alternative plus the voxel currently at
//! the target position into the concrete voxel to write.
//!
//! Resolution is a pure function of its inputs apart from the random draw for
//! tag members. `Ok(None)` is the expected miss (empty tag, filler with no
//! stratum, unregistered material), `Err` means a lookup table is corrupted.

use strata_voxel::{TagRegistry, VoxelTypeId, VoxelTypeRegistry};

use crate::error::{DepositError, ResolveError};
use crate::model::BlockSource;
use crate::seed::DepositRandom;
use crate::strata::StrataLookup;

/// Read-only lookups shared by every attempt.
#[derive(Clone, Copy)]
pub struct DepositEnv<'a> {
    pub registry: &'a VoxelTypeRegistry,
    pub tags: &'a TagRegistry,
    pub strata: &'a dyn StrataLookup,
}

/// Which material table a [`ResolvedBlock::Material`] consults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Catalog {
    Ore,
    Sample,
}

/// A [`BlockSource`] with fixed names already checked against the registry.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedBlock {
    Fixed(VoxelTypeId),
    Tag(String),
    Material {
        material: String,
        stratum: Option<String>,
    },
}

impl ResolvedBlock {
    /// Check a source against the registry and tag set.
    pub fn compile(
        source: &BlockSource,
        env: &DepositEnv<'_>,
        deposit: &str,
    ) -> Result<Self, DepositError> {
        match source {
            BlockSource::Fixed(name) => env
                .registry
                .lookup_by_name(name)
                .map(Self::Fixed)
                .ok_or_else(|| DepositError::UnknownVoxel {
                    deposit: deposit.to_string(),
                    name: name.clone(),
                }),
            BlockSource::Tag(tag) if env.tags.is_defined(tag) => Ok(Self::Tag(tag.clone())),
            BlockSource::Tag(tag) => Err(DepositError::UnknownTag {
                deposit: deposit.to_string(),
                tag: tag.clone(),
            }),
            BlockSource::Material { material, stratum } => Ok(Self::Material {
                material: material.clone(),
                stratum: stratum.clone(),
            }),
        }
    }

    /// Resolve against `current`, the voxel presently at the write position.
    pub fn resolve(
        &self,
        current: VoxelTypeId,
        catalog: Catalog,
        env: &DepositEnv<'_>,
        rng: &mut DepositRandom,
    ) -> Result<Option<VoxelTypeId>, ResolveError> {
        let (table, key, found) = match self {
            Self::Fixed(id) => return Ok(Some(*id)),
            Self::Tag(tag) => {
                let members = env.tags.members(tag);
                if members.is_empty() {
                    return Ok(None);
                }
                let id = members[rng.next_int(members.len() as i32) as usize];
                ("tag", tag.as_str(), id)
            }
            Self::Material { material, stratum } => {
                let host = env.strata.stratum_of(current);
                let lookup = match catalog {
                    Catalog::Ore => {
                        let Some(host) = host else {
                            return Ok(None);
                        };
                        if stratum.as_deref().is_some_and(|s| s != host) {
                            return Ok(None);
                        }
                        env.strata.ore(host, material)
                    }
                    Catalog::Sample => {
                        let Some(row) = stratum.as_deref().or(host) else {
                            return Ok(None);
                        };
                        env.strata.sample(row, material)
                    }
                };
                let Some(id) = lookup else {
                    return Ok(None);
                };
                let table = match catalog {
                    Catalog::Ore => "ore",
                    Catalog::Sample => "sample",
                };
                (table, material.as_str(), id)
            }
        };

        if env.registry.contains(found) {
            Ok(Some(found))
        } else {
            Err(ResolveError::UnregisteredContent {
                table,
                key: key.to_string(),
                id: found,
            })
        }
    }
}

impl AsRef<ResolvedBlock> for ResolvedBlock {
    fn as_ref(&self) -> &ResolvedBlock {
        self
    }
}

/// A main-list alternative: the block plus its optional Y restriction.
#[derive(Clone, Debug, PartialEq)]
pub struct OreEntry {
    pub block: ResolvedBlock,
    pub y_range: Option<(i32, i32)>,
}

impl OreEntry {
    /// Returns `true` if this alternative may be written at `y`.
    pub fn allows_y(&self, y: i32) -> bool {
        self.y_range.is_none_or(|(min, max)| (min..=max).contains(&y))
    }
}

impl AsRef<ResolvedBlock> for OreEntry {
    fn as_ref(&self) -> &ResolvedBlock {
        &self.block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strata::StrataTable;
    use strata_voxel::{VoxelKind, VoxelTypeDef};

    struct Fixture {
        registry: VoxelTypeRegistry,
        tags: TagRegistry,
        strata: StrataTable,
        stone: VoxelTypeId,
        deepslate: VoxelTypeId,
        tin_ore: VoxelTypeId,
        tin_sample: VoxelTypeId,
    }

    fn fixture() -> Fixture {
        let mut registry = VoxelTypeRegistry::new();
        let stone = registry.register(VoxelTypeDef::new("stone", VoxelKind::Solid)).unwrap();
        let deepslate = registry.register(VoxelTypeDef::new("deepslate", VoxelKind::Solid)).unwrap();
        let tin_ore = registry.register(VoxelTypeDef::new("tin_ore", VoxelKind::Solid)).unwrap();
        let tin_sample = registry.register(VoxelTypeDef::new("tin_sample", VoxelKind::Plant)).unwrap();

        let mut tags = TagRegistry::new();
        tags.define(&registry, "ores", &[tin_ore]).unwrap();
        tags.define(&registry, "empty", &[]).unwrap();

        let mut strata = StrataTable::new();
        strata.register_filler(stone, "stone");
        strata.register_filler(deepslate, "deepslate");
        strata.register_ore("stone", "tin", tin_ore);
        strata.register_sample("stone", "tin", tin_sample);

        Fixture {
            registry,
            tags,
            strata,
            stone,
            deepslate,
            tin_ore,
            tin_sample,
        }
    }

    fn env(f: &Fixture) -> DepositEnv<'_> {
        DepositEnv {
            registry: &f.registry,
            tags: &f.tags,
            strata: &f.strata,
        }
    }

    #[test]
    fn test_compile_rejects_unknown_names() {
        let f = fixture();
        let env = env(&f);
        let fixed = ResolvedBlock::compile(&BlockSource::Fixed("nope".into()), &env, "d");
        assert!(matches!(fixed, Err(DepositError::UnknownVoxel { .. })));
        let tag = ResolvedBlock::compile(&BlockSource::Tag("nope".into()), &env, "d");
        assert!(matches!(tag, Err(DepositError::UnknownTag { .. })));
        let ok = ResolvedBlock::compile(&BlockSource::Fixed("tin_ore".into()), &env, "d").unwrap();
        assert_eq!(ok, ResolvedBlock::Fixed(f.tin_ore));
    }

    #[test]
    fn test_material_resolves_through_host_stratum() {
        let f = fixture();
        let env = env(&f);
        let mut rng = DepositRandom::new(0);
        let tin = ResolvedBlock::Material {
            material: "tin".into(),
            stratum: None,
        };
        assert_eq!(
            tin.resolve(f.stone, Catalog::Ore, &env, &mut rng).unwrap(),
            Some(f.tin_ore)
        );
        // deepslate has a stratum but no tin registered in it
        assert_eq!(tin.resolve(f.deepslate, Catalog::Ore, &env, &mut rng).unwrap(), None);
        // air has no stratum
        assert_eq!(tin.resolve(VoxelTypeId::AIR, Catalog::Ore, &env, &mut rng).unwrap(), None);
    }

    #[test]
    fn test_material_stratum_restriction_for_ores() {
        let f = fixture();
        let env = env(&f);
        let mut rng = DepositRandom::new(0);
        let deep_only = ResolvedBlock::Material {
            material: "tin".into(),
            stratum: Some("deepslate".into()),
        };
        assert_eq!(deep_only.resolve(f.stone, Catalog::Ore, &env, &mut rng).unwrap(), None);
    }

    #[test]
    fn test_sample_uses_named_stratum() {
        let f = fixture();
        let env = env(&f);
        let mut rng = DepositRandom::new(0);
        let sample = ResolvedBlock::Material {
            material: "tin".into(),
            stratum: Some("stone".into()),
        };
        assert_eq!(
            sample.resolve(VoxelTypeId::AIR, Catalog::Sample, &env, &mut rng).unwrap(),
            Some(f.tin_sample)
        );
    }

    #[test]
    fn test_tag_resolution() {
        let f = fixture();
        let env = env(&f);
        let mut rng = DepositRandom::new(0);
        let ores = ResolvedBlock::Tag("ores".into());
        assert_eq!(ores.resolve(f.stone, Catalog::Ore, &env, &mut rng).unwrap(), Some(f.tin_ore));
        let empty = ResolvedBlock::Tag("empty".into());
        assert_eq!(empty.resolve(f.stone, Catalog::Ore, &env, &mut rng).unwrap(), None);
    }

    #[test]
    fn test_corrupted_table_is_an_error() {
        let mut f = fixture();
        f.strata.register_ore("stone", "ghost", VoxelTypeId(999));
        let env = env(&f);
        let ghost = ResolvedBlock::Material {
            material: "ghost".into(),
            stratum: None,
        };
        let result = ghost.resolve(f.stone, Catalog::Ore, &env, &mut DepositRandom::new(0));
        assert!(matches!(result, Err(ResolveError::UnregisteredContent { table: "ore", .. })));
    }

    #[test]
    fn test_ore_entry_y_range() {
        let entry = OreEntry {
            block: ResolvedBlock::Fixed(VoxelTypeId(1)),
            y_range: Some((-10, 10)),
        };
        assert!(entry.allows_y(-10));
        assert!(entry.allows_y(10));
        assert!(!entry.allows_y(11));
        let open = OreEntry {
            block: ResolvedBlock::Fixed(VoxelTypeId(1)),
            y_range: None,
        };
        assert!(open.allows_y(i32::MIN));
    }
}

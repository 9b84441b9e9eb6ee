//! Attempt-scoped placement context.
//!
//! One [`Attempt`] exists per invocation of a shape. It owns the `placed`
//! flag that gates surface samples and counts writes; nothing here outlives
//! the attempt.

use strata_voxel::{Direction, NOTIFY_CLIENTS, UpdateFlags, VoxelAccessor, VoxelPos, VoxelTypeId};

use crate::resolver::{Catalog, DepositEnv, ResolvedBlock};
use crate::seed::DepositRandom;
use crate::target::TargetRule;
use crate::weighted::WeightedList;

pub struct Attempt<'a, A: VoxelAccessor + ?Sized> {
    pub world: &'a mut A,
    pub env: DepositEnv<'a>,
    pub rng: &'a mut DepositRandom,
    pub origin: VoxelPos,
    pub deposit: &'a str,
    placed: bool,
    writes: usize,
}

impl<'a, A: VoxelAccessor + ?Sized> Attempt<'a, A> {
    pub fn new(
        world: &'a mut A,
        env: DepositEnv<'a>,
        rng: &'a mut DepositRandom,
        origin: VoxelPos,
        deposit: &'a str,
    ) -> Self {
        Self {
            world,
            env,
            rng,
            origin,
            deposit,
            placed: false,
            writes: 0,
        }
    }

    /// Whether any non-air voxel has been written during this attempt.
    pub fn placed(&self) -> bool {
        self.placed
    }

    /// Number of writes issued so far, air included.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Clears the `placed` flag and returns its previous value.
    pub fn take_placed(&mut self) -> bool {
        std::mem::take(&mut self.placed)
    }

    /// Reads `pos` and returns its content if `rule` allows replacing it.
    pub fn eligible(&mut self, pos: VoxelPos, rule: &TargetRule) -> Option<VoxelTypeId> {
        let current = self.world.get(pos);
        rule.matches(current, &self.env, self.rng).then_some(current)
    }

    /// Resolve one alternative, logging and swallowing table corruption.
    pub fn resolve(
        &mut self,
        block: &ResolvedBlock,
        index: usize,
        pos: VoxelPos,
        current: VoxelTypeId,
        catalog: Catalog,
    ) -> Option<VoxelTypeId> {
        match block.resolve(current, catalog, &self.env, self.rng) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(deposit = %self.deposit, index, %pos, "{err}");
                None
            }
        }
    }

    pub fn write(&mut self, pos: VoxelPos, voxel: VoxelTypeId, flags: UpdateFlags) {
        self.world.set(pos, voxel, flags);
        self.writes += 1;
        if voxel != VoxelTypeId::AIR {
            self.placed = true;
        }
    }

    /// Predicate, weighted pick, resolve, write. Returns `true` if a voxel was written.
    pub fn place_from<T: AsRef<ResolvedBlock>>(
        &mut self,
        pos: VoxelPos,
        list: &WeightedList<T>,
        rule: &TargetRule,
    ) -> bool {
        let Some(current) = self.eligible(pos, rule) else {
            return false;
        };
        let Some((index, entry)) = list.pick(self.rng) else {
            return false;
        };
        match self.resolve(entry.as_ref(), index, pos, current, Catalog::Ore) {
            Some(voxel) => {
                self.write(pos, voxel, NOTIFY_CLIENTS);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if any face neighbour of `pos` is air.
    pub fn touches_air(&self, pos: VoxelPos) -> bool {
        Direction::ALL
            .iter()
            .any(|&dir| self.env.registry.is_air(self.world.get(pos.relative(dir))))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::strata::StrataTable;
    use strata_voxel::{TagRegistry, VoxelGrid, VoxelKind, VoxelTypeDef, VoxelTypeRegistry};

    #[test]
    fn test_place_from_sets_placed_and_counts() {
        let mut registry = VoxelTypeRegistry::new();
        let stone = registry.register(VoxelTypeDef::new("stone", VoxelKind::Solid)).unwrap();
        let ore = registry.register(VoxelTypeDef::new("ore", VoxelKind::Solid)).unwrap();
        let registry = Arc::new(registry);
        let tags = TagRegistry::new();
        let mut strata = StrataTable::new();
        strata.register_filler(stone, "stone");

        let mut grid = VoxelGrid::new(registry.clone(), VoxelPos::new(0, 0, 0), [4, 4, 4]);
        grid.fill_layers(0, 2, stone);

        let env = DepositEnv {
            registry: &registry,
            tags: &tags,
            strata: &strata,
        };
        let list = WeightedList::new([(ResolvedBlock::Fixed(ore), 1)]);
        let mut rng = DepositRandom::new(3);
        let mut attempt = Attempt::new(&mut grid, env, &mut rng, VoxelPos::new(0, 0, 0), "test");

        // air above the stone is not a stratum filler
        assert!(!attempt.place_from(VoxelPos::new(1, 3, 1), &list, &TargetRule::Strata));
        assert!(!attempt.placed());

        assert!(attempt.place_from(VoxelPos::new(1, 2, 1), &list, &TargetRule::Strata));
        assert!(attempt.placed());
        assert_eq!(attempt.writes(), 1);
        assert!(attempt.touches_air(VoxelPos::new(1, 2, 1)));
        assert!(!attempt.touches_air(VoxelPos::new(1, 1, 1)));

        assert!(attempt.take_placed());
        assert!(!attempt.placed());
        assert_eq!(grid.get(VoxelPos::new(1, 2, 1)), ore);
    }

    #[test]
    fn test_air_writes_do_not_mark_placed() {
        let registry = Arc::new(VoxelTypeRegistry::new());
        let tags = TagRegistry::new();
        let strata = StrataTable::new();
        let mut grid = VoxelGrid::new(registry.clone(), VoxelPos::new(0, 0, 0), [2, 2, 2]);
        let env = DepositEnv {
            registry: &registry,
            tags: &tags,
            strata: &strata,
        };
        let mut rng = DepositRandom::new(0);
        let mut attempt = Attempt::new(&mut grid, env, &mut rng, VoxelPos::new(0, 0, 0), "test");
        attempt.write(VoxelPos::new(0, 0, 0), VoxelTypeId::AIR, NOTIFY_CLIENTS);
        assert!(!attempt.placed());
        assert_eq!(attempt.writes(), 1);
    }
}

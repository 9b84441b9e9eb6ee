//! Voxel type registry: maps compact [`VoxelTypeId`] values to [`VoxelTypeDef`] metadata.
//!
//! The registry is built once when the world is configured. Air is always ID 0
//! so that zero-initialized grid memory represents empty space.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored inside every voxel cell (2 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelTypeId(pub u16);

impl VoxelTypeId {
    /// The air voxel, always registered first.
    pub const AIR: Self = Self(0);
}

/// Broad physical category of a voxel type.
///
/// Deposit placement only needs a handful of distinctions: whether a voxel is
/// empty, whether it is a fluid that should be woken after carving, and
/// whether it counts as canopy for surface samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoxelKind {
    /// Empty space.
    Air,
    /// Ordinary solid terrain (stone, dirt, ores).
    Solid,
    /// Water of any depth.
    Water,
    /// Lava or any other non-water fluid.
    Lava,
    /// Leaves and other canopy blocks.
    Canopy,
    /// Non-blocking decoration (grass tufts, flowers).
    Plant,
}

impl VoxelKind {
    /// Returns `true` for water and lava.
    pub fn is_fluid(self) -> bool {
        matches!(self, Self::Water | Self::Lava)
    }

    /// Returns `true` if entities collide with this kind of voxel.
    pub fn blocks_motion(self) -> bool {
        matches!(self, Self::Solid | Self::Canopy)
    }
}

/// Full descriptor for a voxel type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoxelTypeDef {
    /// Namespaced name (e.g. "stone", "geo:deepslate_iron_ore").
    pub name: String,
    /// Physical category.
    pub kind: VoxelKind,
}

impl VoxelTypeDef {
    /// Shorthand for a definition with the given name and kind.
    pub fn new(name: impl Into<String>, kind: VoxelKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Errors that can occur during voxel type or tag registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A type with the same name has already been registered.
    #[error("duplicate voxel type name: {0}")]
    DuplicateName(String),
    /// All 65 535 user-defined slots have been consumed.
    #[error("voxel type registry is full (max 65536 types)")]
    RegistryFull,
    /// A tag referenced a voxel id that was never registered.
    #[error("tag '{tag}' references unregistered voxel id {id}")]
    UnknownTagMember {
        /// Tag being defined.
        tag: String,
        /// Offending raw id.
        id: u16,
    },
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`VoxelTypeId`] → [`VoxelTypeDef`] with O(1) lookup by index and
/// O(1) reverse lookup by name.
#[derive(Clone, Debug)]
pub struct VoxelTypeRegistry {
    /// Dense array where `index == VoxelTypeId.0`.
    types: Vec<VoxelTypeDef>,
    /// Reverse lookup: name → ID.
    name_to_id: HashMap<String, VoxelTypeId>,
}

impl VoxelTypeRegistry {
    /// Creates a new registry with Air pre-registered as ID 0.
    pub fn new() -> Self {
        let mut name_to_id = HashMap::new();
        name_to_id.insert("air".to_string(), VoxelTypeId::AIR);

        Self {
            types: vec![VoxelTypeDef::new("air", VoxelKind::Air)],
            name_to_id,
        }
    }

    /// Registers a new voxel type and returns its assigned ID.
    ///
    /// IDs are assigned sequentially starting from 1 (0 is Air).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a type with the same name
    /// already exists, or [`RegistryError::RegistryFull`] if all 65 536 slots
    /// are consumed.
    pub fn register(&mut self, def: VoxelTypeDef) -> Result<VoxelTypeId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.types.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let id = VoxelTypeId(self.types.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.types.push(def);
        Ok(id)
    }

    /// Returns the definition for a given ID, or `None` if it was never registered.
    pub fn get(&self, id: VoxelTypeId) -> Option<&VoxelTypeDef> {
        self.types.get(id.0 as usize)
    }

    /// Returns `true` if `id` was produced by this registry.
    pub fn contains(&self, id: VoxelTypeId) -> bool {
        (id.0 as usize) < self.types.len()
    }

    /// Returns the ID for a named voxel type, or `None` if not found.
    pub fn lookup_by_name(&self, name: &str) -> Option<VoxelTypeId> {
        self.name_to_id.get(name).copied()
    }

    /// Returns the kind of a voxel. Unknown IDs are treated as air.
    pub fn kind(&self, id: VoxelTypeId) -> VoxelKind {
        self.get(id).map_or(VoxelKind::Air, |def| def.kind)
    }

    /// Returns the total number of registered types (including Air).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if only Air is registered.
    pub fn is_empty(&self) -> bool {
        self.types.len() <= 1
    }

    /// Returns `true` if the given voxel type is air.
    pub fn is_air(&self, id: VoxelTypeId) -> bool {
        self.kind(id) == VoxelKind::Air
    }

    /// Returns `true` if the given voxel type is water.
    pub fn is_water(&self, id: VoxelTypeId) -> bool {
        self.kind(id) == VoxelKind::Water
    }

    /// Returns `true` if the given voxel type is any fluid.
    pub fn is_fluid(&self, id: VoxelTypeId) -> bool {
        self.kind(id).is_fluid()
    }

    /// Returns `true` if the given voxel type is canopy (leaves).
    pub fn is_canopy(&self, id: VoxelTypeId) -> bool {
        self.kind(id) == VoxelKind::Canopy
    }
}

impl Default for VoxelTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

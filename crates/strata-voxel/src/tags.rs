//! Named voxel collections ("tags") such as `base_stone` or `leaves`.

use rustc_hash::FxHashMap;

use crate::registry::{RegistryError, VoxelTypeId, VoxelTypeRegistry};

/// Maps tag names to ordered member lists.
///
/// Member order is preserved as inserted so that a uniform random pick over a
/// tag is reproducible for a given random sequence.
#[derive(Clone, Debug, Default)]
pub struct TagRegistry {
    tags: FxHashMap<String, Vec<VoxelTypeId>>,
}

impl TagRegistry {
    /// Creates an empty tag registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or extends) a tag with the given members.
    ///
    /// Duplicate members are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownTagMember`] if a member id is not in `registry`.
    pub fn define(
        &mut self,
        registry: &VoxelTypeRegistry,
        name: &str,
        members: &[VoxelTypeId],
    ) -> Result<(), RegistryError> {
        if let Some(bad) = members.iter().find(|id| !registry.contains(**id)) {
            return Err(RegistryError::UnknownTagMember {
                tag: name.to_string(),
                id: bad.0,
            });
        }

        let entry = self.tags.entry(name.to_string()).or_default();
        for id in members {
            if !entry.contains(id) {
                entry.push(*id);
            }
        }
        Ok(())
    }

    /// Returns the members of a tag, or an empty slice for unknown tags.
    pub fn members(&self, name: &str) -> &[VoxelTypeId] {
        self.tags.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if the tag has been defined (even with no members).
    pub fn is_defined(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Returns `true` if `id` is a member of the tag.
    pub fn contains(&self, name: &str, id: VoxelTypeId) -> bool {
        self.members(name).contains(&id)
    }
}

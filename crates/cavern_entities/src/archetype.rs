//! # Entity Archetypes
//!
//! Everything an entity type is configured with: footprint, carving offset,
//! receiver behavior, release hook and an optional placement rule.
//! Archetypes are loaded from TOML once at startup.
//!
//! ```toml
//! [[archetype]]
//! name = "platform"
//! carving_offset = [0.0, 0.5]
//! behavior = "collapse_on_crumble"
//! release_hook = { type = "grant_item", item_id = 3, amount = 1 }
//! cells = [
//!     { x = 0, y = 0, kind = "solid" },
//!     { x = 1, y = 0, kind = "solid" },
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use cavern_core::{EntityId, GridHandle, GridStore, ReceiverBehavior};

use crate::error::{EntityError, EntityResult};
use crate::footprint::{CarveFootprint, FootprintCell};
use crate::hook::ReleaseHook;
use crate::occupancy::TileOccupancyController;
use crate::placement::PlacementRule;

/// A configured entity type.
#[derive(Clone, Debug, PartialEq)]
pub struct Archetype {
    footprint: Arc<CarveFootprint>,
    carving_offset: [f32; 2],
    behavior: ReceiverBehavior,
    release_hook: ReleaseHook,
    placement: Option<PlacementRule>,
}

impl Archetype {
    /// Creates an inert archetype named after its footprint.
    #[must_use]
    pub fn new(footprint: CarveFootprint) -> Self {
        Self {
            footprint: Arc::new(footprint),
            carving_offset: [0.0, 0.0],
            behavior: ReceiverBehavior::Inert,
            release_hook: ReleaseHook::None,
            placement: None,
        }
    }

    /// Sets the carving offset.
    #[must_use]
    pub const fn with_carving_offset(mut self, offset: [f32; 2]) -> Self {
        self.carving_offset = offset;
        self
    }

    /// Sets the receiver behavior.
    #[must_use]
    pub const fn with_behavior(mut self, behavior: ReceiverBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Sets the release hook.
    #[must_use]
    pub const fn with_release_hook(mut self, hook: ReleaseHook) -> Self {
        self.release_hook = hook;
        self
    }

    /// Sets the placement rule.
    #[must_use]
    pub const fn with_placement(mut self, rule: PlacementRule) -> Self {
        self.placement = Some(rule);
        self
    }

    /// Archetype name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.footprint.name()
    }

    /// Shared footprint.
    #[must_use]
    pub fn footprint(&self) -> &Arc<CarveFootprint> {
        &self.footprint
    }

    /// Carving offset.
    #[must_use]
    pub const fn carving_offset(&self) -> [f32; 2] {
        self.carving_offset
    }

    /// Receiver behavior.
    #[must_use]
    pub const fn behavior(&self) -> ReceiverBehavior {
        self.behavior
    }

    /// Release hook.
    #[must_use]
    pub const fn release_hook(&self) -> ReleaseHook {
        self.release_hook
    }

    /// Placement rule, if the archetype has one.
    #[must_use]
    pub const fn placement(&self) -> Option<PlacementRule> {
        self.placement
    }

    /// Builds the occupancy controller for a new entity of this archetype.
    #[must_use]
    pub fn controller<G: GridStore>(
        &self,
        entity: EntityId,
        grid: GridHandle<G>,
    ) -> TileOccupancyController<G> {
        TileOccupancyController::new(entity, Arc::clone(&self.footprint), grid)
            .with_carving_offset(self.carving_offset)
            .with_behavior(self.behavior)
            .with_release_hook(self.release_hook)
    }
}

/// Archetypes by name.
#[derive(Clone, Debug, Default)]
pub struct ArchetypeCatalog {
    archetypes: HashMap<String, Archetype>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    archetype: Vec<ArchetypeDef>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ArchetypeDef {
    name: String,
    #[serde(default)]
    carving_offset: [f32; 2],
    #[serde(default)]
    behavior: ReceiverBehavior,
    #[serde(default)]
    release_hook: ReleaseHook,
    #[serde(default)]
    placement: Option<PlacementRule>,
    cells: Vec<FootprintCell>,
}

impl ArchetypeDef {
    fn build(self) -> EntityResult<Archetype> {
        if !self.carving_offset.iter().all(|v| v.is_finite()) {
            return Err(EntityError::InvalidConfig(format!(
                "archetype '{}' has a non-finite carving offset",
                self.name
            )));
        }
        let archetype = Archetype::new(CarveFootprint::new(self.name, self.cells)?)
            .with_carving_offset(self.carving_offset)
            .with_behavior(self.behavior)
            .with_release_hook(self.release_hook);
        Ok(match self.placement {
            Some(rule) => archetype.with_placement(rule),
            None => archetype,
        })
    }
}

impl ArchetypeCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an archetype.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::DuplicateArchetype`] if the name is taken.
    pub fn insert(&mut self, archetype: Archetype) -> EntityResult<()> {
        if self.archetypes.contains_key(archetype.name()) {
            return Err(EntityError::DuplicateArchetype(archetype.name().to_string()));
        }
        self.archetypes
            .insert(archetype.name().to_string(), archetype);
        Ok(())
    }

    /// Looks up an archetype.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnknownArchetype`] if no archetype has `name`.
    pub fn get(&self, name: &str) -> EntityResult<&Archetype> {
        self.archetypes
            .get(name)
            .ok_or_else(|| EntityError::UnknownArchetype(name.to_string()))
    }

    /// Number of archetypes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Archetype names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.archetypes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parses a catalog from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidConfig`] on malformed TOML, and the
    /// footprint or duplicate errors of any invalid archetype.
    pub fn from_toml_str(source: &str) -> EntityResult<Self> {
        let file: CatalogFile =
            toml::from_str(source).map_err(|e| EntityError::InvalidConfig(e.to_string()))?;

        let mut catalog = Self::new();
        for def in file.archetype {
            catalog.insert(def.build()?)?;
        }
        tracing::debug!(archetypes = catalog.len(), "archetype catalog loaded");
        Ok(catalog)
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidConfig`] if the file cannot be read,
    /// plus everything [`Self::from_toml_str`] can return.
    pub fn from_toml_file(path: &Path) -> EntityResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            EntityError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }
}

//! # Cave World
//!
//! One generated cave and the entities placed in it.
//!
//! ```text
//! generate(config) ──> TileMap (Stone/Air) + TileLayer (variants)
//! spawn / move     ──> TileOccupancyController::update_if_necessary
//! crumble / break  ──> TileEvent ──> process_events ──> react() ──> destroy
//! destroy          ──> release() ──> ItemGrant ──> drain_grants
//! carve / break    ──> dirty cells ──> take_dirty
//! ```
//!
//! The grid store stays uninitialized until the first [`CaveWorld::generate`].
//! Entities spawned before that hold no cells, archetypes with a placement
//! rule cannot be spawned at all, and every generate drops the entities of
//! the previous cave.

use std::collections::HashMap;

use cavern_core::{
    EntityAllocator, EntityId, EventBus, EventReceiver, EventSender, GridHandle, GridPos,
    GridStore, ReceiverReaction, TileKind, TileMap, TileUpdateReason,
};
use cavern_entities::{
    ArchetypeCatalog, CarveOutcome, ItemGrant, ReleaseOutcome, TileOccupancyController,
};
use cavern_procedural::{CaveGenerator, GenerationConfig, GenerationReport, TileLayer};

use crate::error::{WorldError, WorldResult};

/// A cave plus its world-attached entities.
pub struct CaveWorld {
    grid: GridHandle<TileMap>,
    surface: TileLayer,
    catalog: ArchetypeCatalog,
    allocator: EntityAllocator,
    entities: HashMap<EntityId, TileOccupancyController<TileMap>>,
    grants: Vec<ItemGrant>,
    sender: EventSender,
    events: EventReceiver,
}

impl CaveWorld {
    /// Creates an empty world with no cave generated yet.
    #[must_use]
    pub fn new(catalog: ArchetypeCatalog) -> Self {
        let (sender, events) = EventBus::create_pair(EventBus::DEFAULT_CAPACITY);
        Self {
            grid: GridHandle::uninitialized(),
            surface: TileLayer::new(0),
            catalog,
            allocator: EntityAllocator::new(),
            entities: HashMap::new(),
            grants: Vec::new(),
            sender,
            events,
        }
    }

    /// The shared grid store handle.
    #[must_use]
    pub fn grid(&self) -> &GridHandle<TileMap> {
        &self.grid
    }

    /// Autotile variants of the last generated cave.
    #[must_use]
    pub fn surface(&self) -> &TileLayer {
        &self.surface
    }

    /// The archetype catalog.
    #[must_use]
    pub fn catalog(&self) -> &ArchetypeCatalog {
        &self.catalog
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The controller of a live entity.
    #[must_use]
    pub fn controller(&self, id: EntityId) -> Option<&TileOccupancyController<TileMap>> {
        self.entities.get(&id)
    }

    /// Generates a new cave, replacing the grid store.
    ///
    /// Entities of the previous cave are dropped without vacating, since
    /// their cells no longer exist.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error; the current cave is kept.
    pub fn generate(&mut self, config: &GenerationConfig) -> WorldResult<GenerationReport> {
        config.validate()?;

        if !self.entities.is_empty() {
            tracing::info!(entities = self.entities.len(), "dropping entities of previous cave");
            for id in self.entities.keys() {
                self.allocator.free(*id);
            }
            self.entities.clear();
        }
        // Pending events address entities that are gone now.
        drop(self.events.drain());

        self.grid
            .install(TileMap::new(config.size, config.size).with_events(self.sender.clone()));
        let mut generator = CaveGenerator::new(self.grid.clone(), TileLayer::new(config.size));
        let report = generator.generate(config)?;
        self.surface = generator.into_surface();
        // Generation writes are not visual updates of placed entities.
        self.grid.with_store(TileMap::take_dirty);
        Ok(report)
    }

    /// Spawns an entity of `archetype` at a world position and claims its
    /// footprint.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Entity`] for an unknown archetype,
    /// [`WorldError::PlacementRejected`] if the archetype's placement rule
    /// rejects the cell and [`WorldError::GridUnavailable`] if the rule
    /// cannot be checked because no cave exists yet.
    pub fn spawn(&mut self, archetype: &str, position: [f32; 2]) -> WorldResult<EntityId> {
        let archetype = self.catalog.get(archetype)?;

        if let Some(rule) = archetype.placement() {
            match self
                .grid
                .with_store(|store| rule.can_place_at(&*store, position))
            {
                Some(true) => {}
                Some(false) => {
                    let cell = GridPos::from_world(position);
                    return Err(WorldError::PlacementRejected {
                        archetype: archetype.name().to_string(),
                        x: cell.x,
                        y: cell.y,
                    });
                }
                None => {
                    tracing::warn!(archetype = archetype.name(), "grid store unavailable, spawn rejected");
                    return Err(WorldError::GridUnavailable(archetype.name().to_string()));
                }
            }
        }

        let id = self.allocator.allocate();
        let mut controller = archetype.controller(id, self.grid.clone());
        let outcome = controller.update_if_necessary(position);
        tracing::debug!(entity = ?id, archetype = archetype.name(), ?outcome, "entity spawned");
        self.entities.insert(id, controller);
        Ok(id)
    }

    /// Moves an entity, re-carving its footprint if its anchor changed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownEntity`] if `id` is not live.
    pub fn move_entity(&mut self, id: EntityId, position: [f32; 2]) -> WorldResult<CarveOutcome> {
        self.entities
            .get_mut(&id)
            .map(|controller| controller.update_if_necessary(position))
            .ok_or(WorldError::UnknownEntity(id))
    }

    /// Vacates an entity's footprint and removes it.
    ///
    /// If the grid store is unavailable the entity stays live so the destroy
    /// can be retried. A release grant is queued for [`Self::drain_grants`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownEntity`] if `id` is not live.
    pub fn destroy(&mut self, id: EntityId) -> WorldResult<ReleaseOutcome> {
        let controller = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::UnknownEntity(id))?;
        let released = controller.release();
        if released.outcome == CarveOutcome::GridUnavailable {
            return Ok(released);
        }

        self.entities.remove(&id);
        self.allocator.free(id);
        self.grants.extend(released.grant);
        tracing::debug!(entity = ?id, outcome = ?released.outcome, "entity destroyed");
        Ok(released)
    }

    /// Notifies the receiver at `(x, y)` that its cell crumbles.
    ///
    /// Returns `true` if a receiver was registered there.
    pub fn crumble(&mut self, x: i32, y: i32) -> bool {
        self.grid
            .with_store(|store| store.crumble(x, y))
            .unwrap_or(false)
    }

    /// Breaks the tile at `(x, y)` into air.
    ///
    /// Returns `false` if the grid store is unavailable.
    pub fn break_tile(&mut self, x: i32, y: i32) -> bool {
        self.grid
            .with_store(|store| {
                store.set_tile(x, y, TileKind::Air, TileUpdateReason::Break, true);
            })
            .is_some()
    }

    /// Routes pending tile events to their receivers and destroys every
    /// entity whose behavior reacts with a release.
    ///
    /// Returns the destroyed entities in event order.
    pub fn process_events(&mut self) -> Vec<EntityId> {
        let mut destroyed = Vec::new();
        for event in self.events.drain() {
            let receiver = event.receiver();
            if !self.entities.contains_key(&receiver.entity) {
                continue;
            }
            if receiver.react(&event) != ReceiverReaction::Release {
                continue;
            }
            match self.destroy(receiver.entity) {
                Ok(released) if released.outcome != CarveOutcome::GridUnavailable => {
                    destroyed.push(receiver.entity);
                }
                Ok(_) | Err(_) => {}
            }
        }
        if !destroyed.is_empty() {
            tracing::debug!(count = destroyed.len(), "entities released by tile events");
        }
        destroyed
    }

    /// Takes the cells redrawn by carve, uncarve and break writes since the
    /// last call, each once. Empty before the first generate.
    pub fn take_dirty(&mut self) -> Vec<GridPos> {
        self.grid
            .with_store(TileMap::take_dirty)
            .unwrap_or_default()
    }

    /// Takes the item grants produced by destroyed entities.
    pub fn drain_grants(&mut self) -> Vec<ItemGrant> {
        std::mem::take(&mut self.grants)
    }

    /// Renders the grid store as text, top row first: `#` stone, `=` entity
    /// blocks, `.` air.
    #[must_use]
    pub fn ascii_map(&self) -> Option<String> {
        self.grid.with_store(|store| {
            let (width, height) = (store.width(), store.height());
            let mut out = String::with_capacity((width as usize + 1) * height as usize);
            for y in (0..height).rev() {
                for x in 0..width {
                    #[allow(clippy::cast_possible_wrap)]
                    let tile = store.get_tile(x as i32, y as i32);
                    out.push(match tile {
                        TileKind::Air => '.',
                        TileKind::Stone | TileKind::Bedrock => '#',
                        TileKind::Solid | TileKind::CollapsableEntity => '=',
                    });
                }
                out.push('\n');
            }
            out
        })
    }
}

//! # Occupancy Protocol Tests
//!
//! Carve, move, vacate and release against a real `TileMap` and against a
//! store that counts every write.

use std::sync::Arc;

use cavern_core::{
    EntityId, GridHandle, GridPos, GridStore, ReceiverBehavior, TileKind, TileMap, TileReceiver,
    TileUpdateReason,
};
use cavern_entities::{
    CarveFootprint, CarveOutcome, FootprintCell, ReleaseHook, TileOccupancyController,
};

fn pair() -> Arc<CarveFootprint> {
    Arc::new(
        CarveFootprint::new(
            "pair",
            vec![
                FootprintCell::new(0, 0, TileKind::Solid),
                FootprintCell::new(1, 0, TileKind::Solid),
            ],
        )
        .unwrap(),
    )
}

/// `TileMap` wrapper counting tile and receiver writes.
#[derive(Default)]
struct CountingStore {
    inner: Option<TileMap>,
    tile_writes: usize,
    receiver_writes: usize,
}

impl CountingStore {
    fn new(size: u32) -> Self {
        Self {
            inner: Some(TileMap::new(size, size)),
            ..Self::default()
        }
    }

    fn map(&self) -> &TileMap {
        self.inner.as_ref().unwrap()
    }

    fn map_mut(&mut self) -> &mut TileMap {
        self.inner.as_mut().unwrap()
    }
}

impl GridStore for CountingStore {
    fn set_tile(&mut self, x: i32, y: i32, tile: TileKind, reason: TileUpdateReason, visuals: bool) {
        self.tile_writes += 1;
        self.map_mut().set_tile(x, y, tile, reason, visuals);
    }

    fn get_tile(&self, x: i32, y: i32) -> TileKind {
        self.map().get_tile(x, y)
    }

    fn set_receiver(&mut self, x: i32, y: i32, receiver: Option<TileReceiver>) {
        self.receiver_writes += 1;
        self.map_mut().set_receiver(x, y, receiver);
    }

    fn receiver_at(&self, x: i32, y: i32) -> Option<TileReceiver> {
        self.map().receiver_at(x, y)
    }
}

/// Test: Footprint {(0,0),(1,0)} at anchor (3,4) moved to (5,4).
#[test]
fn test_move_example() {
    let grid = GridHandle::new(TileMap::new(10, 10));
    let entity = EntityId::new(3, 0);
    let mut ctl = TileOccupancyController::new(entity, pair(), grid.clone());

    ctl.update_if_necessary([3.0, 4.0]);
    ctl.update_if_necessary([5.0, 4.0]);

    grid.with_store(|store| {
        for x in [3, 4] {
            assert_eq!(store.get_tile(x, 4), TileKind::Air, "({x}, 4)");
            assert_eq!(store.receiver_at(x, 4), None, "({x}, 4)");
        }
        for x in [5, 6] {
            assert_eq!(store.get_tile(x, 4), TileKind::Solid, "({x}, 4)");
            assert_eq!(
                store.receiver_at(x, 4).map(|r| r.entity),
                Some(entity),
                "({x}, 4)"
            );
        }
    })
    .unwrap();
}

/// Test: Overlapping move (anchor shifts by one) keeps the shared cell
/// claimed, since vacate runs before claim.
#[test]
fn test_overlapping_move() {
    let grid = GridHandle::new(TileMap::new(10, 10));
    let mut ctl = TileOccupancyController::new(EntityId::new(0, 0), pair(), grid.clone());

    ctl.update_if_necessary([3.0, 4.0]);
    ctl.update_if_necessary([4.0, 4.0]);

    grid.with_store(|store| {
        assert_eq!(store.get_tile(3, 4), TileKind::Air);
        assert_eq!(store.get_tile(4, 4), TileKind::Solid);
        assert_eq!(store.get_tile(5, 4), TileKind::Solid);
        assert!(store.receiver_at(4, 4).is_some());
        assert_eq!(store.count(TileKind::Solid), 2);
    })
    .unwrap();
}

/// Test: Carve then release restores the pre-carve cells and leaves no
/// receivers behind.
#[test]
fn test_carve_release_symmetry() {
    let mut map = TileMap::new(12, 12);
    // Cave floor under the entity; the entity itself sits in air.
    for x in 0..12 {
        map.set_tile(x, 0, TileKind::Stone, TileUpdateReason::Generate, false);
    }
    let before = map.as_bytes().to_vec();
    let grid = GridHandle::new(map);

    let footprint = Arc::new(CarveFootprint::rect("crate", 3, 2, TileKind::Solid).unwrap());
    let mut ctl = TileOccupancyController::new(EntityId::new(9, 2), footprint, grid.clone());
    ctl.update_if_necessary([2.5, 1.0]);
    ctl.update_if_necessary([6.5, 1.0]);
    assert_eq!(grid.with_store(|s| s.count(TileKind::Solid)), Some(6));

    let outcome = ctl.release();
    assert_eq!(
        outcome.outcome,
        CarveOutcome::Vacated {
            anchor: GridPos::new(6, 1)
        }
    );

    grid.with_store(|store| {
        assert_eq!(store.as_bytes(), &before[..]);
        for y in 0..12 {
            for x in 0..12 {
                assert_eq!(store.receiver_at(x, y), None, "({x}, {y})");
            }
        }
    })
    .unwrap();
    assert!(ctl.claimed_cells().is_empty());
}

/// Test: A second release is a no-op and yields no second grant.
#[test]
fn test_release_is_idempotent() {
    let grid = GridHandle::new(CountingStore::new(8));
    let hook = ReleaseHook::GrantItem {
        item_id: 7,
        amount: 2,
    };
    let mut ctl = TileOccupancyController::new(EntityId::new(1, 0), pair(), grid.clone())
        .with_release_hook(hook);
    ctl.update_if_necessary([1.0, 1.0]);

    let first = ctl.release();
    assert!(first.outcome.wrote());
    let grant = first.grant.unwrap();
    assert_eq!((grant.item_id, grant.amount), (7, 2));
    let writes = grid.with_store(|s| s.tile_writes).unwrap();

    let second = ctl.release();
    assert_eq!(second.outcome, CarveOutcome::AlreadyReleased);
    assert_eq!(second.grant, None);
    assert_eq!(grid.with_store(|s| s.tile_writes), Some(writes));
}

/// Test: Two updates mapping to the same anchor write only once.
#[test]
fn test_unchanged_anchor_writes_nothing() {
    let grid = GridHandle::new(CountingStore::new(8));
    let mut ctl = TileOccupancyController::new(EntityId::new(2, 0), pair(), grid.clone());

    ctl.update_if_necessary([2.1, 3.1]);
    let (tiles, receivers) = grid
        .with_store(|s| (s.tile_writes, s.receiver_writes))
        .unwrap();
    assert_eq!((tiles, receivers), (2, 2));

    assert_eq!(ctl.update_if_necessary([2.9, 3.9]), CarveOutcome::Unchanged);
    assert_eq!(
        grid.with_store(|s| (s.tile_writes, s.receiver_writes)),
        Some((2, 2))
    );
}

/// Test: An uninitialized store is a retryable no-op for both update and
/// release.
#[test]
fn test_grid_unavailable_is_retryable() {
    let grid: GridHandle<TileMap> = GridHandle::new(TileMap::new(8, 8));
    let hook = ReleaseHook::GrantItem {
        item_id: 1,
        amount: 1,
    };
    let mut ctl = TileOccupancyController::new(EntityId::new(5, 0), pair(), grid.clone())
        .with_release_hook(hook);
    ctl.update_if_necessary([1.0, 1.0]);

    // Store unloaded: moving and releasing both change nothing.
    let map = grid.take().unwrap();
    assert_eq!(ctl.update_if_necessary([4.0, 4.0]), CarveOutcome::GridUnavailable);
    assert_eq!(ctl.applied_anchor(), Some(GridPos::new(1, 1)));
    let failed = ctl.release();
    assert_eq!(failed.outcome, CarveOutcome::GridUnavailable);
    assert_eq!(failed.grant, None);
    assert!(!ctl.is_released());

    // Store back: the retry vacates the original cells and grants once.
    grid.install(map);
    let retried = ctl.release();
    assert_eq!(
        retried.outcome,
        CarveOutcome::Vacated {
            anchor: GridPos::new(1, 1)
        }
    );
    assert!(retried.grant.is_some());
    assert_eq!(grid.with_store(|s| s.count(TileKind::Solid)), Some(0));
}

/// Test: Carving notifies a previous receiver of the cell, never the
/// carving entity itself.
#[test]
fn test_carve_notifications() {
    let (sender, receiver) = cavern_core::EventBus::create_pair(16);
    let grid = GridHandle::new(TileMap::new(8, 8).with_events(sender));

    let mut a = TileOccupancyController::new(EntityId::new(0, 0), pair(), grid.clone())
        .with_behavior(ReceiverBehavior::ReleaseOnBreak);
    a.update_if_necessary([0.0, 0.0]);
    a.update_if_necessary([2.0, 0.0]);
    a.release();
    assert_eq!(receiver.pending_count(), 0);

    // Another entity's write to a claimed cell reaches the claimant.
    let mut b = TileOccupancyController::new(EntityId::new(1, 0), pair(), grid.clone());
    b.update_if_necessary([4.0, 4.0]);
    grid.with_store(|s| s.set_tile(4, 4, TileKind::Air, TileUpdateReason::Break, true));
    let events = receiver.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].receiver().entity, EntityId::new(1, 0));
}

/// Test: A world position far outside the `i32` range saturates to the
/// range edge; overflowing footprint cells are skipped and the store drops
/// the rest, so nothing wraps onto the map.
#[test]
fn test_huge_position_does_not_wrap() {
    let grid = GridHandle::new(TileMap::new(8, 8));
    let mut ctl = TileOccupancyController::new(EntityId::new(4, 0), pair(), grid.clone());

    let edge = GridPos::new(i32::MAX, 0);
    assert_eq!(
        ctl.update_if_necessary([3.0e9, 0.0]),
        CarveOutcome::Applied { anchor: edge }
    );
    assert_eq!(ctl.claimed_cells(), vec![edge]);
    assert_eq!(grid.with_store(|s| s.count(TileKind::Solid)), Some(0));

    assert_eq!(
        ctl.update_if_necessary([-3.0e9, 0.0]),
        CarveOutcome::Moved {
            from: edge,
            to: GridPos::new(i32::MIN, 0),
        }
    );
    assert_eq!(grid.with_store(|s| s.count(TileKind::Solid)), Some(0));

    ctl.update_if_necessary([1.0, 1.0]);
    assert_eq!(grid.with_store(|s| s.count(TileKind::Solid)), Some(2));
}

/// Test: A NaN position writes nothing and leaves the origin cell alone.
#[test]
fn test_nan_position_writes_nothing() {
    let grid = GridHandle::new(CountingStore::new(8));
    let mut ctl = TileOccupancyController::new(EntityId::new(6, 0), pair(), grid.clone());

    assert_eq!(
        ctl.update_if_necessary([f32::NAN, f32::NAN]),
        CarveOutcome::InvalidPosition
    );
    assert_eq!(ctl.applied_anchor(), None);
    assert_eq!(
        grid.with_store(|s| (s.tile_writes, s.receiver_writes)),
        Some((0, 0))
    );
    assert_eq!(grid.with_store(|s| s.get_tile(0, 0)), Some(TileKind::Air));
}

//! # Tile Receivers
//!
//! A receiver is the entity registered against a cell. The store notifies it
//! through [`TileReceiver::react`]; what the entity does is decided by its
//! [`ReceiverBehavior`] variant, not by overriding methods.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::events::TileEvent;
use crate::tile::TileUpdateReason;

/// How an entity responds to events on the cells it occupies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverBehavior {
    /// Ignores every event.
    #[default]
    Inert,
    /// Releases the entity when any claimed cell crumbles.
    CollapseOnCrumble,
    /// Releases the entity when a claimed cell is broken by someone else.
    ReleaseOnBreak,
}

/// What the owning entity should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverReaction {
    /// Nothing changes.
    Ignore,
    /// Vacate the footprint and destroy the entity.
    Release,
}

/// An entity registered as the event receiver of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileReceiver {
    /// The owning entity.
    pub entity: EntityId,
    /// How it reacts to events.
    pub behavior: ReceiverBehavior,
}

impl TileReceiver {
    /// Creates a receiver.
    #[inline]
    #[must_use]
    pub const fn new(entity: EntityId, behavior: ReceiverBehavior) -> Self {
        Self { entity, behavior }
    }

    /// Decides the reaction to an event addressed to this receiver.
    ///
    /// Carve and uncarve writes never cause a reaction: they are the
    /// occupancy protocol itself.
    #[must_use]
    pub fn react(&self, event: &TileEvent) -> ReceiverReaction {
        match (self.behavior, event) {
            (ReceiverBehavior::CollapseOnCrumble, TileEvent::CrumbleNotified { .. })
            | (
                ReceiverBehavior::ReleaseOnBreak,
                TileEvent::TileUpdated {
                    reason: TileUpdateReason::Break,
                    ..
                },
            ) => ReceiverReaction::Release,
            _ => ReceiverReaction::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GridPos;

    fn updated(receiver: TileReceiver, reason: TileUpdateReason) -> TileEvent {
        TileEvent::TileUpdated {
            receiver,
            pos: GridPos::new(1, 1),
            reason,
        }
    }

    #[test]
    fn test_inert_ignores_everything() {
        let r = TileReceiver::new(EntityId::new(0, 0), ReceiverBehavior::Inert);
        assert_eq!(r.react(&updated(r, TileUpdateReason::Break)), ReceiverReaction::Ignore);
        let crumble = TileEvent::CrumbleNotified {
            receiver: r,
            pos: GridPos::new(0, 0),
        };
        assert_eq!(r.react(&crumble), ReceiverReaction::Ignore);
    }

    #[test]
    fn test_collapse_on_crumble() {
        let r = TileReceiver::new(EntityId::new(1, 0), ReceiverBehavior::CollapseOnCrumble);
        let crumble = TileEvent::CrumbleNotified {
            receiver: r,
            pos: GridPos::new(0, 0),
        };
        assert_eq!(r.react(&crumble), ReceiverReaction::Release);
        assert_eq!(r.react(&updated(r, TileUpdateReason::Break)), ReceiverReaction::Ignore);
    }

    #[test]
    fn test_release_on_break_ignores_own_protocol() {
        let r = TileReceiver::new(EntityId::new(2, 0), ReceiverBehavior::ReleaseOnBreak);
        assert_eq!(r.react(&updated(r, TileUpdateReason::Break)), ReceiverReaction::Release);
        assert_eq!(r.react(&updated(r, TileUpdateReason::Carve)), ReceiverReaction::Ignore);
        assert_eq!(r.react(&updated(r, TileUpdateReason::Uncarve)), ReceiverReaction::Ignore);
    }
}

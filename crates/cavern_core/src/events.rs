//! # Tile Event Bus
//!
//! The store pushes receiver notifications onto a bounded channel; whoever
//! owns the entities drains it once per frame and routes each event to the
//! addressed receiver.
//!
//! ```text
//! ┌─────────────┐  TileEvent  ┌─────────────┐  react()  ┌─────────────┐
//! │   TileMap   │────────────>│  EventBus   │──────────>│  Owner of   │
//! │ (set/crumble)│            │  (bounded)  │           │  entities   │
//! └─────────────┘             └─────────────┘           └─────────────┘
//! ```

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::coord::GridPos;
use crate::receiver::TileReceiver;
use crate::tile::TileUpdateReason;

/// A notification addressed to the receiver registered at a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileEvent {
    /// A claimed cell was written.
    TileUpdated {
        /// Receiver registered at the cell when it was written.
        receiver: TileReceiver,
        /// The written cell.
        pos: GridPos,
        /// Why it was written.
        reason: TileUpdateReason,
    },
    /// A claimed cell is about to crumble.
    CrumbleNotified {
        /// Receiver registered at the cell.
        receiver: TileReceiver,
        /// The crumbling cell.
        pos: GridPos,
    },
}

impl TileEvent {
    /// Returns the receiver this event is addressed to.
    #[inline]
    #[must_use]
    pub const fn receiver(&self) -> TileReceiver {
        match self {
            Self::TileUpdated { receiver, .. } | Self::CrumbleNotified { receiver, .. } => *receiver,
        }
    }
}

/// Bounded channel carrying [`TileEvent`]s.
pub struct EventBus {
    sender: Sender<TileEvent>,
    receiver: Receiver<TileEvent>,
}

impl EventBus {
    /// Default channel capacity.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates a new event bus holding at most `capacity` pending events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a new pair of sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Handle for sending events.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: Sender<TileEvent>,
}

impl EventSender {
    /// Sends an event without blocking.
    ///
    /// Returns `false` if the event was dropped (channel full or closed).
    #[inline]
    pub fn send(&self, event: TileEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(?dropped, "tile event channel full, event dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone, Debug)]
pub struct EventReceiver {
    receiver: Receiver<TileEvent>,
}

impl EventReceiver {
    /// Receives all pending events without blocking.
    #[inline]
    pub fn drain(&self) -> Vec<TileEvent> {
        let mut events = Vec::with_capacity(self.receiver.len());
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

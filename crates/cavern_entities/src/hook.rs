//! # Release Hooks
//!
//! Optional side effect of destroying a placed entity, such as handing the
//! item it was built from back to the player. The hook is produced at most
//! once per entity; applying the grant (inventory, drops) belongs to the
//! caller.

use serde::{Deserialize, Serialize};

use cavern_core::EntityId;

/// What happens after an entity's footprint is vacated for good.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReleaseHook {
    /// Nothing.
    #[default]
    None,
    /// Give `amount` of `item_id` back.
    GrantItem {
        /// Item to grant.
        item_id: u32,
        /// Quantity.
        amount: u32,
    },
}

impl ReleaseHook {
    /// The grant this hook produces for `entity`, if any.
    #[inline]
    #[must_use]
    pub const fn grant_for(self, entity: EntityId) -> Option<ItemGrant> {
        match self {
            Self::None => None,
            Self::GrantItem { item_id, amount } => Some(ItemGrant {
                entity,
                item_id,
                amount,
            }),
        }
    }
}

/// An item grant produced by a released entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemGrant {
    /// The released entity.
    pub entity: EntityId,
    /// Item to grant.
    pub item_id: u32,
    /// Quantity.
    pub amount: u32,
}

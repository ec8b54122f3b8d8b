//! The closed set of locks an asset can hold.

use crate::types::OwnerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current lock of an asset.
///
/// Exactly one variant is active at a time. Non-owner states are tagged with
/// a sentinel owner (see [`Lock::owner_id`]) instead of a separate flag.
///
/// The serialized form carries a `type` tag (`NO_LOCK`, `MAINTENANCE_LOCK`,
/// `WITHDRAWAL_LOCK`, `OWNER_LOCK`) and is what repositories store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Lock {
    /// Unlocked, available for ordinary locking.
    #[serde(rename = "NO_LOCK")]
    None,
    /// Initial state of every newly registered asset.
    #[serde(rename = "MAINTENANCE_LOCK")]
    Maintenance,
    /// Removed from availability.
    #[serde(rename = "WITHDRAWAL_LOCK")]
    Withdrawal,
    /// Held exclusively by `owner_id` until `until`.
    #[serde(rename = "OWNER_LOCK")]
    Owner {
        /// Lock holder
        owner_id: OwnerId,
        /// Expiry instant
        until: DateTime<Utc>,
    },
}

impl Lock {
    /// The identity that owns this lock, sentinels included.
    ///
    /// `None` for an unlocked asset.
    #[must_use]
    pub fn owner_id(&self) -> Option<OwnerId> {
        match self {
            Self::None => None,
            Self::Maintenance => Some(OwnerId::maintenance()),
            Self::Withdrawal => Some(OwnerId::withdrawal()),
            Self::Owner { owner_id, .. } => Some(owner_id.clone()),
        }
    }

    /// Whether this lock was made for `owner_id`.
    ///
    /// Sentinel locks only match their own sentinel, which no parsed owner id
    /// can be equal to.
    #[must_use]
    pub fn was_made_for(&self, owner_id: &OwnerId) -> bool {
        self.owner_id().is_some_and(|owner| &owner == owner_id)
    }

    /// Whether the asset is unlocked.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether this is an owner lock whose expiry is strictly before `now`.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Owner { until, .. } => *until < now,
            Self::None | Self::Maintenance | Self::Withdrawal => false,
        }
    }
}

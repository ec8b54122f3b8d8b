//! Domain events and rejections.
//!
//! Every transition produces exactly one value: a success event describing
//! what happened, or a rejection describing why nothing happened. Both carry
//! a stable upper-snake-case type tag (see [`Event::event_type`]).
//!
//! Only success events are published, wrapped in [`AvailabilityEvent`].
//! Rejections are returned to the caller and implement [`std::error::Error`].

use crate::types::{AssetId, OwnerId};
use asset_availability_core::event::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable reason carried by every rejection.
///
/// The string form is a contract surface and never changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// No asset with the given id is registered.
    #[serde(rename = "ASSET_IS_MISSING")]
    AssetIsMissing,
    /// An asset with the given id is already registered.
    #[serde(rename = "ASSET_ALREADY_EXISTS")]
    AssetAlreadyExists,
    /// The asset left maintenance already.
    #[serde(rename = "ASSET_ALREADY_ACTIVATED_REASON")]
    AssetAlreadyActivated,
    /// The asset holds an owner lock and cannot be withdrawn.
    #[serde(rename = "ASSET_CURRENTLY_LOCKED")]
    AssetCurrentlyLocked,
    /// The asset is not free for locking.
    #[serde(rename = "ASSET_LOCKED_REASON")]
    AssetLocked,
    /// The caller holds no lock that could be extended.
    #[serde(rename = "NO_LOCK_DEFINED_FOR_OWNER_REASON")]
    NoLockDefinedForOwner,
    /// The caller holds no lock that could be released.
    #[serde(rename = "NO_LOCK_ON_THE_ASSET_REASON")]
    NoLockOnTheAsset,
}

impl RejectionReason {
    /// The stable reason code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssetIsMissing => "ASSET_IS_MISSING",
            Self::AssetAlreadyExists => "ASSET_ALREADY_EXISTS",
            Self::AssetAlreadyActivated => "ASSET_ALREADY_ACTIVATED_REASON",
            Self::AssetCurrentlyLocked => "ASSET_CURRENTLY_LOCKED",
            Self::AssetLocked => "ASSET_LOCKED_REASON",
            Self::NoLockDefinedForOwner => "NO_LOCK_DEFINED_FOR_OWNER_REASON",
            Self::NoLockOnTheAsset => "NO_LOCK_ON_THE_ASSET_REASON",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! impl_event {
    ($($ty:ident => $tag:literal),+ $(,)?) => {
        $(
            impl $ty {
                /// Stable type tag of this event.
                pub const TYPE: &'static str = $tag;
            }

            impl Event for $ty {
                fn event_type(&self) -> &'static str {
                    Self::TYPE
                }
            }
        )+
    };
}

// ========== Success events ==========

/// A new asset was registered (and starts under maintenance).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRegistered {
    /// Registered asset
    pub asset_id: AssetId,
}

/// The asset left maintenance and became available.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetActivated {
    /// Activated asset
    pub asset_id: AssetId,
}

/// The asset was withdrawn from availability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetWithdrawn {
    /// Withdrawn asset
    pub asset_id: AssetId,
}

/// The asset was locked (or a lock was extended) for an owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLocked {
    /// Locked asset
    pub asset_id: AssetId,
    /// Lock holder
    pub owner_id: OwnerId,
    /// When the lock expires
    pub valid_until: DateTime<Utc>,
}

/// The lock holder released the asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUnlocked {
    /// Unlocked asset
    pub asset_id: AssetId,
    /// Former lock holder
    pub owner_id: OwnerId,
    /// Caller-supplied release time
    pub unlocked_at: DateTime<Utc>,
}

/// A lock was reclaimed by the overdue sweep.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLockExpired {
    /// Asset whose lock was cleared
    pub asset_id: AssetId,
}

// ========== Rejections ==========

/// `register` was refused.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("registration of asset {asset_id} rejected: {reason}")]
pub struct AssetRegistrationRejected {
    /// Asset the caller tried to register
    pub asset_id: AssetId,
    /// Why
    pub reason: RejectionReason,
}

impl AssetRegistrationRejected {
    /// The id is taken.
    #[must_use]
    pub const fn due_to_already_existing_asset_with(asset_id: AssetId) -> Self {
        Self {
            asset_id,
            reason: RejectionReason::AssetAlreadyExists,
        }
    }
}

/// `activate` was refused.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("activation of asset {asset_id} rejected: {reason}")]
pub struct AssetActivationRejected {
    /// Asset the caller tried to activate
    pub asset_id: AssetId,
    /// Why
    pub reason: RejectionReason,
}

impl AssetActivationRejected {
    /// No such asset.
    #[must_use]
    pub const fn due_to_missing_asset_with(asset_id: AssetId) -> Self {
        Self {
            asset_id,
            reason: RejectionReason::AssetIsMissing,
        }
    }
}

/// `withdraw` was refused.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("withdrawal of asset {asset_id} rejected: {reason}")]
pub struct AssetWithdrawalRejected {
    /// Asset the caller tried to withdraw
    pub asset_id: AssetId,
    /// Why
    pub reason: RejectionReason,
}

impl AssetWithdrawalRejected {
    /// No such asset.
    #[must_use]
    pub const fn due_to_missing_asset_with(asset_id: AssetId) -> Self {
        Self {
            asset_id,
            reason: RejectionReason::AssetIsMissing,
        }
    }
}

/// `lock` or `lock_indefinitely` was refused.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("lock of asset {asset_id} for {owner_id} rejected: {reason}")]
pub struct AssetLockRejected {
    /// Asset the caller tried to lock
    pub asset_id: AssetId,
    /// Would-be lock holder
    pub owner_id: OwnerId,
    /// Why
    pub reason: RejectionReason,
}

impl AssetLockRejected {
    /// No such asset.
    #[must_use]
    pub const fn due_to_missing_asset_with(asset_id: AssetId, owner_id: OwnerId) -> Self {
        Self {
            asset_id,
            owner_id,
            reason: RejectionReason::AssetIsMissing,
        }
    }
}

/// `unlock` was refused.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("unlocking of asset {asset_id} by {owner_id} rejected: {reason}")]
pub struct AssetUnlockingRejected {
    /// Asset the caller tried to unlock
    pub asset_id: AssetId,
    /// Caller claiming the lock
    pub owner_id: OwnerId,
    /// Why
    pub reason: RejectionReason,
}

impl AssetUnlockingRejected {
    /// No such asset.
    #[must_use]
    pub const fn due_to_missing_asset_with(asset_id: AssetId, owner_id: OwnerId) -> Self {
        Self {
            asset_id,
            owner_id,
            reason: RejectionReason::AssetIsMissing,
        }
    }
}

impl_event! {
    AssetRegistered => "ASSET_REGISTERED",
    AssetActivated => "ASSET_ACTIVATED",
    AssetWithdrawn => "ASSET_WITHDRAWN",
    AssetLocked => "ASSET_LOCKED",
    AssetUnlocked => "ASSET_UNLOCKED",
    AssetLockExpired => "ASSET_LOCK_EXPIRED",
    AssetRegistrationRejected => "ASSET_REGISTRATION_REJECTED",
    AssetActivationRejected => "ASSET_ACTIVATION_REJECTED",
    AssetWithdrawalRejected => "ASSET_WITHDRAWAL_REJECTED",
    AssetLockRejected => "ASSET_LOCK_REJECTED",
    AssetUnlockingRejected => "ASSET_UNLOCKING_REJECTED",
}

/// Common view of every rejection, for callers that log or map them without
/// knowing the concrete type.
pub trait Rejection: Event + fmt::Display {
    /// Asset the refused operation targeted
    fn asset_id(&self) -> &AssetId;

    /// Why the operation was refused
    fn reason(&self) -> RejectionReason;

    /// Caller named in the refused operation, for owner-scoped operations
    fn owner_id(&self) -> Option<&OwnerId> {
        None
    }
}

macro_rules! impl_rejection {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl Rejection for $ty {
                fn asset_id(&self) -> &AssetId {
                    &self.asset_id
                }

                fn reason(&self) -> RejectionReason {
                    self.reason
                }
            }
        )+
    };
    ($($ty:ident with owner),+ $(,)?) => {
        $(
            impl Rejection for $ty {
                fn asset_id(&self) -> &AssetId {
                    &self.asset_id
                }

                fn reason(&self) -> RejectionReason {
                    self.reason
                }

                fn owner_id(&self) -> Option<&OwnerId> {
                    Some(&self.owner_id)
                }
            }
        )+
    };
}

impl_rejection!(
    AssetRegistrationRejected,
    AssetActivationRejected,
    AssetWithdrawalRejected,
);
impl_rejection!(AssetLockRejected with owner, AssetUnlockingRejected with owner);

/// Every event the service publishes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityEvent {
    /// See [`AssetRegistered`]
    Registered(AssetRegistered),
    /// See [`AssetActivated`]
    Activated(AssetActivated),
    /// See [`AssetWithdrawn`]
    Withdrawn(AssetWithdrawn),
    /// See [`AssetLocked`]
    Locked(AssetLocked),
    /// See [`AssetUnlocked`]
    Unlocked(AssetUnlocked),
    /// See [`AssetLockExpired`]
    LockExpired(AssetLockExpired),
}

impl AvailabilityEvent {
    /// The asset the event is about.
    #[must_use]
    pub const fn asset_id(&self) -> &AssetId {
        match self {
            Self::Registered(e) => &e.asset_id,
            Self::Activated(e) => &e.asset_id,
            Self::Withdrawn(e) => &e.asset_id,
            Self::Locked(e) => &e.asset_id,
            Self::Unlocked(e) => &e.asset_id,
            Self::LockExpired(e) => &e.asset_id,
        }
    }

    /// The owner the event concerns, for lock and unlock events.
    #[must_use]
    pub const fn owner_id(&self) -> Option<&OwnerId> {
        match self {
            Self::Locked(e) => Some(&e.owner_id),
            Self::Unlocked(e) => Some(&e.owner_id),
            Self::Registered(_)
            | Self::Activated(_)
            | Self::Withdrawn(_)
            | Self::LockExpired(_) => None,
        }
    }
}

impl Event for AvailabilityEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Registered(e) => e.event_type(),
            Self::Activated(e) => e.event_type(),
            Self::Withdrawn(e) => e.event_type(),
            Self::Locked(e) => e.event_type(),
            Self::Unlocked(e) => e.event_type(),
            Self::LockExpired(e) => e.event_type(),
        }
    }
}

impl From<AssetRegistered> for AvailabilityEvent {
    fn from(event: AssetRegistered) -> Self {
        Self::Registered(event)
    }
}

impl From<AssetActivated> for AvailabilityEvent {
    fn from(event: AssetActivated) -> Self {
        Self::Activated(event)
    }
}

impl From<AssetWithdrawn> for AvailabilityEvent {
    fn from(event: AssetWithdrawn) -> Self {
        Self::Withdrawn(event)
    }
}

impl From<AssetLocked> for AvailabilityEvent {
    fn from(event: AssetLocked) -> Self {
        Self::Locked(event)
    }
}

impl From<AssetUnlocked> for AvailabilityEvent {
    fn from(event: AssetUnlocked) -> Self {
        Self::Unlocked(event)
    }
}

impl From<AssetLockExpired> for AvailabilityEvent {
    fn from(event: AssetLockExpired) -> Self {
        Self::LockExpired(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_are_upper_snake_case_variant_names() {
        let asset_id = AssetId::new("A1");
        let owner_id = OwnerId::new("bob");

        assert_eq!(AssetRegistered { asset_id: asset_id.clone() }.event_type(), "ASSET_REGISTERED");
        assert_eq!(AssetLockExpired { asset_id: asset_id.clone() }.event_type(), "ASSET_LOCK_EXPIRED");
        assert_eq!(
            AssetUnlockingRejected::due_to_missing_asset_with(asset_id, owner_id).event_type(),
            "ASSET_UNLOCKING_REJECTED"
        );
        assert_eq!(AssetWithdrawalRejected::TYPE, "ASSET_WITHDRAWAL_REJECTED");
        assert_eq!(AssetActivationRejected::TYPE, "ASSET_ACTIVATION_REJECTED");
    }

    #[test]
    fn reason_codes_serialize_to_their_stable_strings() {
        for reason in [
            RejectionReason::AssetIsMissing,
            RejectionReason::AssetAlreadyExists,
            RejectionReason::AssetAlreadyActivated,
            RejectionReason::AssetCurrentlyLocked,
            RejectionReason::AssetLocked,
            RejectionReason::NoLockDefinedForOwner,
            RejectionReason::NoLockOnTheAsset,
        ] {
            let json = serde_json::to_string(&reason).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
    }

    #[test]
    fn wrapped_event_keeps_inner_tag() {
        let event: AvailabilityEvent = AssetWithdrawn {
            asset_id: AssetId::new("A2"),
        }
        .into();

        assert_eq!(event.event_type(), "ASSET_WITHDRAWN");
        assert_eq!(event.asset_id(), &AssetId::new("A2"));
    }

    #[test]
    fn rejections_expose_reason_and_owner() {
        let lock = AssetLockRejected::due_to_missing_asset_with(
            AssetId::new("A1"),
            OwnerId::new("bob"),
        );
        let activation = AssetActivationRejected::due_to_missing_asset_with(AssetId::new("A1"));

        assert_eq!(lock.reason(), RejectionReason::AssetIsMissing);
        assert_eq!(lock.owner_id(), Some(&OwnerId::new("bob")));
        assert_eq!(Rejection::asset_id(&activation), &AssetId::new("A1"));
        assert_eq!(activation.owner_id(), None);
    }

    #[test]
    fn only_lock_events_carry_an_owner() {
        let locked: AvailabilityEvent = AssetLocked {
            asset_id: AssetId::new("A1"),
            owner_id: OwnerId::new("bob"),
            valid_until: Utc::now(),
        }
        .into();
        let expired: AvailabilityEvent = AssetLockExpired {
            asset_id: AssetId::new("A1"),
        }
        .into();

        assert_eq!(locked.owner_id(), Some(&OwnerId::new("bob")));
        assert_eq!(expired.owner_id(), None);
    }

    #[test]
    fn rejection_message_names_asset_and_reason() {
        let rejection = AssetLockRejected::due_to_missing_asset_with(
            AssetId::new("A9"),
            OwnerId::new("eve"),
        );
        assert_eq!(
            rejection.to_string(),
            "lock of asset A9 for eve rejected: ASSET_IS_MISSING"
        );
    }
}

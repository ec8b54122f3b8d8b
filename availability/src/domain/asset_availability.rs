//! The asset availability entity and its transition rules.
//!
//! Every business rule of the domain lives here. Each transition validates the
//! current lock first and only then replaces it, so a rejected transition
//! leaves the entity untouched.

use crate::domain::lock::Lock;
use crate::events::{
    AssetActivated, AssetActivationRejected, AssetLockExpired, AssetLockRejected, AssetLocked,
    AssetUnlocked, AssetUnlockingRejected, AssetWithdrawalRejected, AssetWithdrawn,
    RejectionReason,
};
use crate::types::{AssetId, OwnerId};
use asset_availability_core::environment::Clock;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;

/// How far ahead an indefinite lock expires.
pub const INDEFINITE_LOCK_DAYS: i64 = 365;

/// Availability of a single asset.
///
/// Identity is the [`AssetId`], fixed at creation. The only mutable state is
/// the current [`Lock`], which starts as [`Lock::Maintenance`].
#[derive(Clone)]
pub struct AssetAvailability {
    asset_id: AssetId,
    current_lock: Lock,
    clock: Arc<dyn Clock>,
}

impl AssetAvailability {
    /// A newly registered asset, under maintenance.
    #[must_use]
    pub fn new(asset_id: AssetId, clock: Arc<dyn Clock>) -> Self {
        Self::restore(asset_id, Lock::Maintenance, clock)
    }

    /// Reconstitute an asset from stored state.
    #[must_use]
    pub fn restore(asset_id: AssetId, current_lock: Lock, clock: Arc<dyn Clock>) -> Self {
        Self {
            asset_id,
            current_lock,
            clock,
        }
    }

    /// The asset's identity.
    #[must_use]
    pub const fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    /// The lock currently held on the asset.
    #[must_use]
    pub const fn current_lock(&self) -> &Lock {
        &self.current_lock
    }

    /// Leave maintenance. Only allowed once, from the initial state.
    ///
    /// # Errors
    ///
    /// `ASSET_ALREADY_ACTIVATED_REASON` from any state other than maintenance.
    pub fn activate(&mut self) -> Result<AssetActivated, AssetActivationRejected> {
        if !matches!(self.current_lock, Lock::Maintenance) {
            return Err(AssetActivationRejected {
                asset_id: self.asset_id.clone(),
                reason: RejectionReason::AssetAlreadyActivated,
            });
        }

        self.current_lock = Lock::None;
        Ok(AssetActivated {
            asset_id: self.asset_id.clone(),
        })
    }

    /// Withdraw an asset that is unlocked or still under maintenance.
    ///
    /// # Errors
    ///
    /// `ASSET_CURRENTLY_LOCKED` if an owner holds the asset (or it is already
    /// withdrawn).
    pub fn withdraw(&mut self) -> Result<AssetWithdrawn, AssetWithdrawalRejected> {
        if !matches!(self.current_lock, Lock::None | Lock::Maintenance) {
            return Err(AssetWithdrawalRejected {
                asset_id: self.asset_id.clone(),
                reason: RejectionReason::AssetCurrentlyLocked,
            });
        }

        self.current_lock = Lock::Withdrawal;
        Ok(AssetWithdrawn {
            asset_id: self.asset_id.clone(),
        })
    }

    /// Lock a free asset for `owner_id` for `duration` from now.
    ///
    /// Negative durations are treated as zero.
    ///
    /// # Errors
    ///
    /// `ASSET_LOCKED_REASON` unless the asset is currently unlocked.
    pub fn lock_for(
        &mut self,
        owner_id: OwnerId,
        duration: Duration,
    ) -> Result<AssetLocked, AssetLockRejected> {
        if !self.current_lock.is_none() {
            return Err(AssetLockRejected {
                asset_id: self.asset_id.clone(),
                owner_id,
                reason: RejectionReason::AssetLocked,
            });
        }

        Ok(self.apply_owner_lock(owner_id, duration))
    }

    /// Extend an existing lock held by `owner_id` to [`INDEFINITE_LOCK_DAYS`].
    ///
    /// This never creates a lock on a free asset.
    ///
    /// # Errors
    ///
    /// `NO_LOCK_DEFINED_FOR_OWNER_REASON` unless `owner_id` holds the lock.
    pub fn lock_indefinitely_for(
        &mut self,
        owner_id: OwnerId,
    ) -> Result<AssetLocked, AssetLockRejected> {
        if !self.current_lock.was_made_for(&owner_id) {
            return Err(AssetLockRejected {
                asset_id: self.asset_id.clone(),
                owner_id,
                reason: RejectionReason::NoLockDefinedForOwner,
            });
        }

        Ok(self.apply_owner_lock(owner_id, Duration::days(INDEFINITE_LOCK_DAYS)))
    }

    /// Release the lock held by `owner_id`, recording `at` as the release time.
    ///
    /// # Errors
    ///
    /// `NO_LOCK_ON_THE_ASSET_REASON` unless `owner_id` holds the lock.
    pub fn unlock_for(
        &mut self,
        owner_id: OwnerId,
        at: DateTime<Utc>,
    ) -> Result<AssetUnlocked, AssetUnlockingRejected> {
        if !self.current_lock.was_made_for(&owner_id) {
            return Err(AssetUnlockingRejected {
                asset_id: self.asset_id.clone(),
                owner_id,
                reason: RejectionReason::NoLockOnTheAsset,
            });
        }

        self.current_lock = Lock::None;
        Ok(AssetUnlocked {
            asset_id: self.asset_id.clone(),
            owner_id,
            unlocked_at: at,
        })
    }

    /// Clear whatever lock is present, regardless of who holds it.
    ///
    /// Returns `None` if the asset was already unlocked.
    pub fn unlock_if_overdue(&mut self) -> Option<AssetLockExpired> {
        if self.current_lock.is_none() {
            return None;
        }

        self.current_lock = Lock::None;
        Some(AssetLockExpired {
            asset_id: self.asset_id.clone(),
        })
    }

    fn apply_owner_lock(&mut self, owner_id: OwnerId, duration: Duration) -> AssetLocked {
        let valid_until = self
            .clock
            .now()
            .checked_add_signed(duration.max(Duration::zero()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.current_lock = Lock::Owner {
            owner_id: owner_id.clone(),
            until: valid_until,
        };

        AssetLocked {
            asset_id: self.asset_id.clone(),
            owner_id,
            valid_until,
        }
    }
}

impl fmt::Debug for AssetAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetAvailability")
            .field("asset_id", &self.asset_id)
            .field("current_lock", &self.current_lock)
            .finish_non_exhaustive()
    }
}

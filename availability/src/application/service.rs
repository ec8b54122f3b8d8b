//! Availability service - the command handler that loads, transitions,
//! persists, and publishes.
//!
//! Every mutating operation follows the same steps:
//! 1. Load the asset from the repository (reject with `ASSET_IS_MISSING` if absent)
//! 2. Apply the entity transition
//! 3. On success only: save the asset, then publish the event
//! 4. Return the event or the rejection
//!
//! Saving always happens before publishing, so no subscriber can observe an
//! event for a state change that was not persisted.

use crate::domain::{AssetAvailability, AssetAvailabilityRepository};
use crate::events::{
    AssetActivated, AssetActivationRejected, AssetLockRejected, AssetLocked, AssetRegistered,
    AssetRegistrationRejected, AssetUnlocked, AssetUnlockingRejected, AssetWithdrawalRejected,
    AssetWithdrawn, AvailabilityEvent, Rejection,
};
use crate::types::{AssetId, OwnerId};
use asset_availability_core::environment::Clock;
use asset_availability_core::event::Event;
use asset_availability_core::publisher::EventPublisher;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;

/// Orchestrates asset availability transitions.
#[derive(Clone)]
pub struct AvailabilityService {
    repository: Arc<dyn AssetAvailabilityRepository>,
    publisher: Arc<dyn EventPublisher<AvailabilityEvent>>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    /// Create a new availability service
    #[must_use]
    pub fn new(
        repository: Arc<dyn AssetAvailabilityRepository>,
        publisher: Arc<dyn EventPublisher<AvailabilityEvent>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            publisher,
            clock,
        }
    }

    /// Register a new asset. It starts under maintenance.
    ///
    /// # Errors
    ///
    /// `ASSET_ALREADY_EXISTS` if the id is taken; nothing is written.
    pub fn register_asset_with(
        &self,
        asset_id: AssetId,
    ) -> Result<AssetRegistered, AssetRegistrationRejected> {
        if self.repository.find(&asset_id).is_some() {
            return Err(self.rejected(
                AssetRegistrationRejected::due_to_already_existing_asset_with(asset_id),
            ));
        }

        let asset = AssetAvailability::new(asset_id.clone(), Arc::clone(&self.clock));
        let event = AssetRegistered { asset_id };
        self.repository.save(&asset);
        self.applied(event.clone().into());

        Ok(event)
    }

    /// Take an asset out of maintenance.
    ///
    /// # Errors
    ///
    /// `ASSET_IS_MISSING`, or the entity's rejection.
    pub fn activate(&self, asset_id: &AssetId) -> Result<AssetActivated, AssetActivationRejected> {
        let Some(asset) = self.repository.find(asset_id) else {
            return Err(self.rejected(AssetActivationRejected::due_to_missing_asset_with(
                asset_id.clone(),
            )));
        };

        self.handle(asset, AssetAvailability::activate)
    }

    /// Withdraw an asset from availability.
    ///
    /// # Errors
    ///
    /// `ASSET_IS_MISSING`, or the entity's rejection.
    pub fn withdraw(&self, asset_id: &AssetId) -> Result<AssetWithdrawn, AssetWithdrawalRejected> {
        let Some(asset) = self.repository.find(asset_id) else {
            return Err(self.rejected(AssetWithdrawalRejected::due_to_missing_asset_with(
                asset_id.clone(),
            )));
        };

        self.handle(asset, AssetAvailability::withdraw)
    }

    /// Lock an asset for `owner_id` for `duration`.
    ///
    /// # Errors
    ///
    /// `ASSET_IS_MISSING`, or the entity's rejection.
    pub fn lock(
        &self,
        asset_id: &AssetId,
        owner_id: OwnerId,
        duration: Duration,
    ) -> Result<AssetLocked, AssetLockRejected> {
        let Some(asset) = self.repository.find(asset_id) else {
            return Err(self.rejected(AssetLockRejected::due_to_missing_asset_with(
                asset_id.clone(),
                owner_id,
            )));
        };

        self.handle(asset, |asset| asset.lock_for(owner_id, duration))
    }

    /// Extend the lock `owner_id` already holds.
    ///
    /// # Errors
    ///
    /// `ASSET_IS_MISSING`, or the entity's rejection.
    pub fn lock_indefinitely(
        &self,
        asset_id: &AssetId,
        owner_id: OwnerId,
    ) -> Result<AssetLocked, AssetLockRejected> {
        let Some(asset) = self.repository.find(asset_id) else {
            return Err(self.rejected(AssetLockRejected::due_to_missing_asset_with(
                asset_id.clone(),
                owner_id,
            )));
        };

        self.handle(asset, |asset| asset.lock_indefinitely_for(owner_id))
    }

    /// Release the lock `owner_id` holds, recording `at` as the release time.
    ///
    /// # Errors
    ///
    /// `ASSET_IS_MISSING`, or the entity's rejection.
    pub fn unlock(
        &self,
        asset_id: &AssetId,
        owner_id: OwnerId,
        at: DateTime<Utc>,
    ) -> Result<AssetUnlocked, AssetUnlockingRejected> {
        let Some(asset) = self.repository.find(asset_id) else {
            return Err(self.rejected(AssetUnlockingRejected::due_to_missing_asset_with(
                asset_id.clone(),
                owner_id,
            )));
        };

        self.handle(asset, |asset| asset.unlock_for(owner_id, at))
    }

    /// Clear an asset's lock on behalf of the overdue sweep.
    ///
    /// Saves and publishes only if there was a lock to clear. Returns whether
    /// anything changed.
    pub fn unlock_if_overdue(&self, mut asset: AssetAvailability) -> bool {
        let Some(event) = asset.unlock_if_overdue() else {
            return false;
        };

        self.repository.save(&asset);
        self.applied(event.into());
        true
    }

    fn handle<E, R>(
        &self,
        mut asset: AssetAvailability,
        transition: impl FnOnce(&mut AssetAvailability) -> Result<E, R>,
    ) -> Result<E, R>
    where
        E: Clone + Into<AvailabilityEvent>,
        R: Rejection,
    {
        match transition(&mut asset) {
            Ok(event) => {
                self.repository.save(&asset);
                self.applied(event.clone().into());
                Ok(event)
            }
            Err(rejection) => Err(self.rejected(rejection)),
        }
    }

    // Callers save first.
    fn applied(&self, event: AvailabilityEvent) {
        tracing::info!(
            asset_id = %event.asset_id(),
            owner_id = event.owner_id().map(OwnerId::as_str),
            event_type = event.event_type(),
            "Transition applied"
        );
        self.publisher.publish(event);
    }

    fn rejected<R: Rejection>(&self, rejection: R) -> R {
        tracing::debug!(
            asset_id = %rejection.asset_id(),
            owner_id = rejection.owner_id().map(OwnerId::as_str),
            reason = rejection.reason().as_str(),
            event_type = rejection.event_type(),
            "Transition rejected"
        );
        rejection
    }
}

impl fmt::Debug for AvailabilityService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilityService").finish_non_exhaustive()
    }
}

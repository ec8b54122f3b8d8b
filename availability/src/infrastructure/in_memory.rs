//! In-memory repository.
//!
//! Stores only each asset's lock, keyed by id, and rehydrates entities on
//! read, the same way a table-backed repository would.

use crate::domain::{AssetAvailability, AssetAvailabilityRepository, Lock};
use crate::types::AssetId;
use asset_availability_core::environment::Clock;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// `HashMap`-backed [`AssetAvailabilityRepository`].
pub struct InMemoryAssetAvailabilityRepository {
    locks: RwLock<HashMap<AssetId, Lock>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryAssetAvailabilityRepository {
    /// Create an empty repository. `clock` is handed to rehydrated entities and
    /// decides what counts as overdue.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored assets
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no asset is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rehydrate(&self, asset_id: &AssetId, lock: &Lock) -> AssetAvailability {
        AssetAvailability::restore(asset_id.clone(), lock.clone(), Arc::clone(&self.clock))
    }
}

impl AssetAvailabilityRepository for InMemoryAssetAvailabilityRepository {
    fn save(&self, asset: &AssetAvailability) {
        self.locks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(asset.asset_id().clone(), asset.current_lock().clone());
    }

    fn find(&self, asset_id: &AssetId) -> Option<AssetAvailability> {
        self.locks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(asset_id)
            .map(|lock| self.rehydrate(asset_id, lock))
    }

    fn find_overdue(&self) -> Vec<AssetAvailability> {
        let now = self.clock.now();
        self.locks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, lock)| lock.is_overdue(now))
            .map(|(asset_id, lock)| self.rehydrate(asset_id, lock))
            .collect()
    }
}

impl std::fmt::Debug for InMemoryAssetAvailabilityRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAssetAvailabilityRepository")
            .field("assets", &self.len())
            .finish_non_exhaustive()
    }
}

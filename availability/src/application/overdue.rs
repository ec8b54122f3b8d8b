//! Reclaiming locks whose expiry has passed.

use crate::application::service::AvailabilityService;
use crate::domain::AssetAvailabilityRepository;
use std::sync::Arc;

/// Best-effort sweep over every overdue asset.
///
/// Each asset is released independently: a no-op on one never stops the rest.
#[derive(Clone)]
pub struct OverdueLockHandling {
    availability_service: Arc<AvailabilityService>,
    repository: Arc<dyn AssetAvailabilityRepository>,
}

impl OverdueLockHandling {
    /// Create a sweep over `repository`, releasing through `availability_service`
    #[must_use]
    pub fn new(
        availability_service: Arc<AvailabilityService>,
        repository: Arc<dyn AssetAvailabilityRepository>,
    ) -> Self {
        Self {
            availability_service,
            repository,
        }
    }

    /// Release every overdue lock. Returns how many were released.
    pub fn unlock_overdue(&self) -> usize {
        let overdue = self.repository.find_overdue();
        let found = overdue.len();

        let released = overdue
            .into_iter()
            .map(|asset| self.availability_service.unlock_if_overdue(asset))
            .filter(|released| *released)
            .count();

        if found > 0 {
            tracing::info!(found, released, "Overdue lock sweep finished");
        }

        released
    }
}

impl std::fmt::Debug for OverdueLockHandling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverdueLockHandling").finish_non_exhaustive()
    }
}

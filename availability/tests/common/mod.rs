//! Shared fixtures for the availability integration tests.

#![allow(dead_code)] // Not every test file uses every fixture

use asset_availability::application::{AvailabilityService, OverdueLockHandling};
use asset_availability::domain::{AssetAvailability, AssetAvailabilityRepository};
use asset_availability::events::AvailabilityEvent;
use asset_availability::infrastructure::InMemoryAssetAvailabilityRepository;
use asset_availability::types::{AssetId, OwnerId};
use asset_availability_core::environment::Clock;
use asset_availability_core::publisher::EventPublisher;
use asset_availability_testing::{AdjustableClock, RecordingEventPublisher, test_instant};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Repository double that counts writes on top of the in-memory store.
pub struct CountingRepository {
    inner: InMemoryAssetAvailabilityRepository,
    saves: AtomicUsize,
}

impl CountingRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: InMemoryAssetAvailabilityRepository::new(clock),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl AssetAvailabilityRepository for CountingRepository {
    fn save(&self, asset: &AssetAvailability) {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(asset);
    }

    fn find(&self, asset_id: &AssetId) -> Option<AssetAvailability> {
        self.inner.find(asset_id)
    }

    fn find_overdue(&self) -> Vec<AssetAvailability> {
        self.inner.find_overdue()
    }
}

/// A fully wired service over test doubles.
pub struct Harness {
    pub clock: AdjustableClock,
    pub repository: Arc<CountingRepository>,
    pub publisher: RecordingEventPublisher<AvailabilityEvent>,
    pub service: Arc<AvailabilityService>,
    pub overdue: Arc<OverdueLockHandling>,
}

impl Harness {
    pub fn new() -> Self {
        let clock = AdjustableClock::new(test_instant());
        let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
        let repository = Arc::new(CountingRepository::new(Arc::clone(&shared_clock)));
        let publisher = RecordingEventPublisher::new();

        let shared_repository: Arc<dyn AssetAvailabilityRepository> = repository.clone();
        let shared_publisher: Arc<dyn EventPublisher<AvailabilityEvent>> =
            Arc::new(publisher.clone());
        let service = Arc::new(AvailabilityService::new(
            Arc::clone(&shared_repository),
            shared_publisher,
            shared_clock,
        ));
        let overdue = Arc::new(OverdueLockHandling::new(
            Arc::clone(&service),
            shared_repository,
        ));

        Self {
            clock,
            repository,
            publisher,
            service,
            overdue,
        }
    }

    /// Register and activate `id`, then forget the side effects.
    pub fn free_asset(&self, id: &str) -> AssetId {
        let asset_id = AssetId::new(id);
        self.service
            .register_asset_with(asset_id.clone())
            .expect("fresh asset registers");
        self.service.activate(&asset_id).expect("registered asset activates");
        self.publisher.clear();
        asset_id
    }

    /// Side-effect counters as `(saves, published)`.
    pub fn side_effects(&self) -> (usize, usize) {
        (self.repository.saves(), self.publisher.len())
    }

    pub fn find(&self, asset_id: &AssetId) -> Option<AssetAvailability> {
        self.repository.find(asset_id)
    }

    pub fn stored(&self, asset_id: &AssetId) -> AssetAvailability {
        self.find(asset_id).expect("asset is stored")
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

pub fn owner(name: &str) -> OwnerId {
    OwnerId::new(name)
}

//! Asset availability: exclusive, time-bounded locks on identifiable assets.
//!
//! An asset is registered under maintenance, activated to become free, locked
//! by one owner at a time for a bounded period (or extended for
//! [`INDEFINITE_LOCK_DAYS`](domain::INDEFINITE_LOCK_DAYS)), unlocked by that
//! owner, and can be withdrawn while not owner-locked. A periodic sweep
//! reclaims owner locks whose expiry has passed.
//!
//! # Architecture
//!
//! ```text
//!   JSON request ──► AssetAvailabilityController ──► Response (202 / 422 / 400)
//!                               │
//!                               ▼
//!                     AvailabilityService ◄──── OverdueLockHandling ◄── run_overdue_sweeps
//!                       │            │
//!            save first │            │ then publish
//!                       ▼            ▼
//!     AssetAvailabilityRepository   EventPublisher<AvailabilityEvent>
//! ```
//!
//! Every transition yields exactly one value: a success event or a typed
//! rejection. Only successes are persisted and published; a rejection leaves
//! no trace outside the returned value.
//!
//! # Example
//!
//! ```
//! use asset_availability::application::AvailabilityService;
//! use asset_availability::infrastructure::InMemoryAssetAvailabilityRepository;
//! use asset_availability::{AssetId, AvailabilityEvent, OwnerId};
//! use asset_availability_core::environment::{Clock, SystemClock};
//! use asset_availability_core::publisher::EventPublisher;
//! use std::sync::Arc;
//!
//! struct Discard;
//! impl EventPublisher<AvailabilityEvent> for Discard {
//!     fn publish(&self, _event: AvailabilityEvent) {}
//! }
//!
//! let clock: Arc<dyn Clock> = Arc::new(SystemClock);
//! let repository = Arc::new(InMemoryAssetAvailabilityRepository::new(Arc::clone(&clock)));
//! let service = AvailabilityService::new(repository, Arc::new(Discard), clock);
//!
//! let a1 = AssetId::new("A1");
//! service.register_asset_with(a1.clone()).unwrap();
//! service.activate(&a1).unwrap();
//! let locked = service.lock(&a1, OwnerId::new("bob"), chrono::Duration::minutes(35)).unwrap();
//! assert_eq!(locked.owner_id, OwnerId::new("bob"));
//! assert!(service.lock(&a1, OwnerId::new("eve"), chrono::Duration::minutes(5)).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod application;
pub mod commands;
pub mod config;
pub mod controller;
pub mod domain;
pub mod events;
pub mod infrastructure;
pub mod types;

pub use application::{AvailabilityService, OverdueLockHandling, run_overdue_sweeps};
pub use commands::{Command, CommandError};
pub use config::{Config, ConfigError};
pub use controller::{AssetAvailabilityController, Request, Response};
pub use domain::{AssetAvailability, AssetAvailabilityRepository, Lock};
pub use events::{AvailabilityEvent, Rejection, RejectionReason};
pub use types::{AssetId, OwnerId, ParseIdError, Principal};

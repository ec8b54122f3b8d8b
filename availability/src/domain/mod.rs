//! Domain model: the lock variants, the asset availability entity, and the
//! repository contract it is stored through.

pub mod asset_availability;
pub mod lock;
pub mod repository;

pub use asset_availability::{AssetAvailability, INDEFINITE_LOCK_DAYS};
pub use lock::Lock;
pub use repository::AssetAvailabilityRepository;

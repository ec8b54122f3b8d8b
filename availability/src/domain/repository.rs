//! Storage contract for asset availability.

use crate::domain::asset_availability::AssetAvailability;
use crate::types::AssetId;

/// Where asset availability entities live.
///
/// Entities are handed out by value: a `find` returns a snapshot, and changes
/// to it only become visible to others after `save`.
///
/// # Concurrency
///
/// The service performs read-modify-write per call without holding anything
/// across it. Implementations shared between concurrent callers are
/// responsible for whatever per-id serialization they need.
pub trait AssetAvailabilityRepository: Send + Sync {
    /// Upsert by identity.
    fn save(&self, asset: &AssetAvailability);

    /// Look up an asset by id.
    fn find(&self, asset_id: &AssetId) -> Option<AssetAvailability>;

    /// Every asset holding an owner lock whose expiry has passed.
    fn find_overdue(&self) -> Vec<AssetAvailability>;
}

//! Event publishing abstraction.
//!
//! The [`EventPublisher`] trait is how the application layer hands a fact to
//! the outside world once the state change behind it has been persisted.
//!
//! # Key Principles
//!
//! - **Persist first**: callers save state before they publish
//! - **Fire-and-forget**: `publish` returns nothing; delivery failures belong
//!   to the adapter, which logs them
//! - **No retries in the core**: an adapter may retry, the domain never does
//!
//! # Example
//!
//! ```
//! use asset_availability_core::publisher::EventPublisher;
//! use std::sync::Mutex;
//!
//! struct Log(Mutex<Vec<String>>);
//!
//! impl EventPublisher<String> for Log {
//!     fn publish(&self, event: String) {
//!         self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(event);
//!     }
//! }
//!
//! let log = Log(Mutex::new(Vec::new()));
//! log.publish("ASSET_REGISTERED".to_string());
//! ```

use std::sync::Arc;

/// Capability for publishing events of type `E`.
///
/// Implementations must be `Send + Sync` so a single publisher can be shared
/// through an `Arc<dyn EventPublisher<E>>` by every service instance.
pub trait EventPublisher<E>: Send + Sync {
    /// Publish an event.
    ///
    /// No acknowledgement is observed by the caller.
    fn publish(&self, event: E);
}

impl<E, P> EventPublisher<E> for Arc<P>
where
    P: EventPublisher<E> + ?Sized,
{
    fn publish(&self, event: E) {
        (**self).publish(event);
    }
}

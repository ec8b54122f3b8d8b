//! # Asset Availability Core
//!
//! Core traits and types shared by the asset availability crates.
//!
//! This crate knows nothing about assets or locks. It provides the seams the
//! domain depends on by abstraction, so that every collaborator can be swapped
//! for an in-memory double in tests:
//!
//! - **Clock**: the injected time source (never read from global state)
//! - **Event**: a fact with a stable, upper-snake-case type tag
//! - **`EventPublisher`**: fire-and-forget delivery of events
//!
//! ## Example
//!
//! ```
//! use asset_availability_core::environment::{Clock, SystemClock};
//! use std::sync::Arc;
//!
//! let clock: Arc<dyn Clock> = Arc::new(SystemClock);
//! let now = clock.now();
//! assert!(now <= clock.now());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

pub mod event;
pub mod publisher;

/// Environment module - Dependency injection traits
///
/// All external dependencies that are not storage or delivery live here.
/// Today that is only the clock: every constructor that needs "now" takes a
/// `Clock` explicitly.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Any `Fn() -> DateTime<Utc>` closure is also a clock, which keeps ad-hoc
    /// time sources in tests cheap to write.
    ///
    /// # Examples
    ///
    /// ```
    /// use asset_availability_core::environment::Clock;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let frozen = || Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap();
    /// assert_eq!(frozen.now(), frozen.now());
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    impl<F> Clock for F
    where
        F: Fn() -> DateTime<Utc> + Send + Sync,
    {
        fn now(&self) -> DateTime<Utc> {
            self()
        }
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

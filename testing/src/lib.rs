//! # Asset Availability Testing
//!
//! Testing utilities and helpers for the asset availability crates.
//!
//! This crate provides:
//! - Deterministic clocks (`FixedClock`, `AdjustableClock`)
//! - A publisher double that records everything it receives
//! - A Given-When-Then harness for state transitions
//!
//! ## Example
//!
//! ```
//! use asset_availability_core::publisher::EventPublisher;
//! use asset_availability_testing::{RecordingEventPublisher, test_clock};
//!
//! let publisher = RecordingEventPublisher::<String>::new();
//! publisher.publish("ASSET_REGISTERED".to_string());
//! assert_eq!(publisher.len(), 1);
//!
//! let _clock = test_clock();
//! ```

use asset_availability_core::environment::Clock;
use asset_availability_core::publisher::EventPublisher;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, PoisonError};


/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Arc, Clock, DateTime, Duration, Mutex, PoisonError, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use asset_availability_testing::mocks::FixedClock;
    /// use asset_availability_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock whose time only moves when a test moves it.
    ///
    /// Clones share the same instant, so a test can keep one handle and give
    /// another to the code under test.
    ///
    /// ```
    /// use asset_availability_testing::mocks::AdjustableClock;
    /// use asset_availability_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = AdjustableClock::new(Utc::now());
    /// let before = clock.now();
    /// clock.advance(Duration::minutes(5));
    /// assert_eq!(clock.now() - before, Duration::minutes(5));
    /// ```
    #[derive(Debug, Clone)]
    pub struct AdjustableClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl AdjustableClock {
        /// Create a clock starting at the given time
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward (or backward, for a negative duration)
        pub fn advance(&self, by: Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }

        /// Jump to an exact instant
        pub fn set(&self, to: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = to;
        }
    }

    impl Clock for AdjustableClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_instant())
    }

    /// The instant `test_clock()` is frozen at.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_instant() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }
}

/// Publisher double that keeps every published event in memory.
///
/// Clones share the same log, so a test keeps one handle while the code under
/// test owns another.
#[derive(Debug)]
pub struct RecordingEventPublisher<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E> Clone for RecordingEventPublisher<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<E> Default for RecordingEventPublisher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RecordingEventPublisher<E> {
    /// Create a publisher with an empty log
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of events published so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been published
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any published event matches the predicate
    pub fn contains(&self, predicate: impl Fn(&E) -> bool) -> bool {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(predicate)
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<E: Clone> RecordingEventPublisher<E> {
    /// Snapshot of the published events, oldest first
    #[must_use]
    pub fn events(&self) -> Vec<E> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recently published event
    #[must_use]
    pub fn last(&self) -> Option<E> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl<E: Send> EventPublisher<E> for RecordingEventPublisher<E> {
    fn publish(&self, event: E) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Install a test-friendly `tracing` subscriber.
///
/// Output goes through the test harness writer, so it only shows for failing
/// tests. Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .try_init();
}

// Re-export commonly used items
pub use mocks::{AdjustableClock, FixedClock, test_clock, test_instant};
pub use transition_test::TransitionTest;

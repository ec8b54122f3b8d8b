//! Tagged, binary-encodable facts.
//!
//! Every event type names itself with a stable upper-snake-case tag
//! (`ASSET_LOCKED`, `ASSET_LOCK_REJECTED`, ...). The tag identifies the event
//! in logs and on any transport, so it stays fixed even if the payload
//! encoding changes. Payloads leave the process as `bincode` bytes wrapped in
//! a [`SerializedEvent`], which keeps the tag readable without decoding.
//!
//! ```
//! use asset_availability_core::event::{Event, SerializedEvent};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
//! struct AssetActivated {
//!     asset_id: String,
//! }
//!
//! impl Event for AssetActivated {
//!     fn event_type(&self) -> &'static str {
//!         "ASSET_ACTIVATED"
//!     }
//! }
//!
//! let event = AssetActivated { asset_id: "A1".to_string() };
//! let envelope = SerializedEvent::from_event(&event, None)?;
//! assert_eq!(envelope.event_type, "ASSET_ACTIVATED");
//! assert_eq!(envelope.decode::<AssetActivated>()?, event);
//! # Ok::<(), asset_availability_core::event::EventError>(())
//! ```

use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use thiserror::Error;

/// Encoding or decoding an event payload failed.
#[derive(Error, Debug)]
pub enum EventError {
    /// The event could not be turned into bytes.
    #[error("cannot encode {event_type} event: {source}")]
    Encode {
        /// Tag of the event being encoded
        event_type: &'static str,
        /// Underlying `bincode` failure
        #[source]
        source: bincode::Error,
    },

    /// The bytes are not a valid payload for the requested event type.
    #[error("cannot decode event payload: {0}")]
    Decode(#[source] bincode::Error),
}

/// A fact that can be published.
///
/// Implementors must be `Send + Sync + 'static` so publishers can move them
/// across tasks.
pub trait Event: Send + Sync + 'static {
    /// The event's stable type tag.
    fn event_type(&self) -> &'static str;

    /// Encode this event as `bincode` bytes.
    ///
    /// # Errors
    ///
    /// [`EventError::Encode`] if a field refuses to serialize.
    fn to_bytes(&self) -> Result<Vec<u8>, EventError>
    where
        Self: Serialize,
    {
        bincode::serialize(self).map_err(|source| EventError::Encode {
            event_type: self.event_type(),
            source,
        })
    }

    /// Decode an event from `bincode` bytes.
    ///
    /// # Errors
    ///
    /// [`EventError::Decode`] if the bytes are truncated, corrupted, or encode
    /// a different type.
    fn from_bytes(bytes: &[u8]) -> Result<Self, EventError>
    where
        Self: DeserializeOwned + Sized,
    {
        bincode::deserialize(bytes).map_err(EventError::Decode)
    }
}

/// Envelope for an encoded event: tag, payload and optional JSON metadata
/// (`asset_id`, `occurred_at`, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct SerializedEvent {
    /// Type tag, readable without decoding `data`
    pub event_type: String,
    /// `bincode` payload
    pub data: Vec<u8>,
    /// Routing and timing hints
    pub metadata: Option<serde_json::Value>,
}

impl SerializedEvent {
    /// Wrap an already-encoded payload.
    #[must_use]
    pub const fn new(
        event_type: String,
        data: Vec<u8>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            event_type,
            data,
            metadata,
        }
    }

    /// Encode `event` and wrap it with its tag.
    ///
    /// # Errors
    ///
    /// See [`Event::to_bytes`].
    pub fn from_event<E: Event + Serialize>(
        event: &E,
        metadata: Option<serde_json::Value>,
    ) -> Result<Self, EventError> {
        Ok(Self::new(
            event.event_type().to_string(),
            event.to_bytes()?,
            metadata,
        ))
    }

    /// Decode the payload as `E`.
    ///
    /// # Errors
    ///
    /// See [`Event::from_bytes`].
    pub fn decode<E: Event + DeserializeOwned>(&self) -> Result<E, EventError> {
        E::from_bytes(&self.data)
    }
}

impl fmt::Display for SerializedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.event_type, self.data.len())
    }
}

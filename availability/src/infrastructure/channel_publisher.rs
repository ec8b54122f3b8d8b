//! Publisher that hands serialized events to a bounded `tokio` channel.
//!
//! Publishing never blocks and never fails from the caller's point of view.
//! A full or closed channel, or an event that cannot be serialized, is logged
//! and the event is dropped.

use crate::events::AvailabilityEvent;
use asset_availability_core::environment::Clock;
use asset_availability_core::event::{Event, SerializedEvent};
use asset_availability_core::publisher::EventPublisher;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Fire-and-forget [`EventPublisher`] backed by an `mpsc` channel.
#[derive(Clone)]
pub struct ChannelEventPublisher {
    sender: mpsc::Sender<SerializedEvent>,
    clock: Arc<dyn Clock>,
}

impl ChannelEventPublisher {
    /// Create a publisher and the receiving end of its channel.
    ///
    /// `capacity` is clamped to at least one. `clock` stamps each event's
    /// `occurred_at` metadata.
    #[must_use]
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> (Self, mpsc::Receiver<SerializedEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender, clock }, receiver)
    }
}

impl EventPublisher<AvailabilityEvent> for ChannelEventPublisher {
    fn publish(&self, event: AvailabilityEvent) {
        let metadata = serde_json::json!({
            "asset_id": event.asset_id(),
            "occurred_at": self.clock.now().to_rfc3339(),
        });

        let serialized = match SerializedEvent::from_event(&event, Some(metadata)) {
            Ok(serialized) => serialized,
            Err(error) => {
                tracing::warn!(event_type = event.event_type(), %error, "Dropping unserializable event");
                return;
            }
        };

        match self.sender.try_send(serialized) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(event_type = %dropped.event_type, "Event channel full, dropping event");
            }
            Err(TrySendError::Closed(dropped)) => {
                tracing::warn!(event_type = %dropped.event_type, "Event channel closed, dropping event");
            }
        }
    }
}

impl std::fmt::Debug for ChannelEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelEventPublisher")
            .field("capacity", &self.sender.max_capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::events::{AssetLockExpired, AssetRegistered};
    use crate::types::AssetId;
    use asset_availability_testing::test_clock;

    fn registered(id: &str) -> AvailabilityEvent {
        AssetRegistered {
            asset_id: AssetId::new(id),
        }
        .into()
    }

    #[test]
    fn published_events_arrive_tagged_and_decodable() {
        let (publisher, mut receiver) = ChannelEventPublisher::new(4, Arc::new(test_clock()));

        publisher.publish(registered("A1"));

        let serialized = receiver.try_recv().unwrap();
        assert_eq!(serialized.event_type, "ASSET_REGISTERED");
        let metadata = serialized.metadata.clone().unwrap();
        assert_eq!(metadata["asset_id"], "A1");
        assert_eq!(metadata["occurred_at"], "2025-01-01T00:00:00+00:00");
        assert_eq!(
            AvailabilityEvent::from_bytes(&serialized.data).unwrap(),
            registered("A1")
        );
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (publisher, mut receiver) = ChannelEventPublisher::new(1, Arc::new(test_clock()));

        publisher.publish(registered("A1"));
        publisher.publish(
            AssetLockExpired {
                asset_id: AssetId::new("A2"),
            }
            .into(),
        );

        assert_eq!(receiver.try_recv().unwrap().event_type, "ASSET_REGISTERED");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_tolerated() {
        let (publisher, receiver) = ChannelEventPublisher::new(1, Arc::new(test_clock()));
        drop(receiver);

        publisher.publish(registered("A1"));
    }
}

//! Adapters behind the domain's capability traits.

pub mod channel_publisher;
pub mod in_memory;

pub use channel_publisher::ChannelEventPublisher;
pub use in_memory::InMemoryAssetAvailabilityRepository;

//! Streaming measurement: per-player connectors and the typed content
//! metadata model they carry.
//!
//! Connectors are created through
//! [`crate::tracker::Tracker::initialize_streaming`] and keyed by an
//! integer tag so one tracker can serve several concurrent players.

mod connector;
mod metadata;

pub use connector::{
    ConnectorState, MemoryStreamingBackend, NoopStreamingBackend, PlaybackEvent,
    StreamingBackend, StreamingBackendState, StreamingConnector,
};
pub use metadata::{
    ContentMetadata, DeliveryAdvertisementCapability, DeliveryComposition, DeliveryMode,
    DeliverySubscriptionType, DistributionModel, FeedType, MediaFormat, MediaType, MetadataDate,
    MetadataTime, VideoDimension,
};

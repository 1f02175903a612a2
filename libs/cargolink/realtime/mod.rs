//! Realtime notification client
//!
//! Data flow: the registry hands out the service for an identity → the
//! service opens a socket link parameterized by that identity → inbound
//! frames are parsed and dispatched to invalidation side effects and
//! listener callbacks → on abnormal close the link retries with bounded
//! exponential backoff.

pub mod dispatcher;
pub mod event;
pub mod invalidation;
pub mod registry;
pub mod service;

pub use dispatcher::{EventDispatcher, ListenerId, ListenerResult, SoundHook};
pub use event::{
    tags, BookingUpdate, EventKind, NotificationPush, RealtimeEnvelope, VehiclePosition,
};
pub use invalidation::{
    keys_for_tag, query_keys, NoopInvalidator, QueryInvalidator, TracingInvalidator,
};
pub use registry::ConnectionRegistry;
pub use service::RealtimeService;

use thiserror::Error;

/// Errors surfaced by the realtime layer
#[derive(Error, Debug)]
pub enum RealtimeError {
    /// Transport-level failure
    #[error("transport error: {0}")]
    Transport(#[from] resocket::ResocketError),

    /// Inbound frame was not a valid event envelope
    #[error("malformed event: {0}")]
    Envelope(#[from] serde_json::Error),
}

/// Result type for realtime operations
pub type Result<T> = std::result::Result<T, RealtimeError>;

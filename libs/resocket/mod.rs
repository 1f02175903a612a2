//! # Resocket
//!
//! A self-healing WebSocket client for long-lived realtime links.
//!
//! ## Features
//!
//! - **Single driver task**: one task owns the socket; frames are delivered
//!   to a pluggable sink in arrival order, run-to-completion
//! - **Close-code aware**: a normal server close parks the link, anything
//!   else engages the reconnect policy
//! - **Pluggable reconnection**: bounded exponential backoff out of the box,
//!   custom policies via a trait
//! - **Type-state builder**: compile-time guarantees for required configuration
//! - **Observable**: atomic link state, frame/reconnect counters, and a
//!   non-blocking event channel for transitions

pub mod traits;
pub mod core;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use crate::core::{
    builder, client, config, connection_state,
    builder::{states, SocketLinkBuilder},
    client::{LinkCounters, LinkEvent, SocketLink},
    config::LinkConfig,
    connection_state::{AtomicCounters, AtomicLinkState, LinkState},
};

/// Type alias for Result with ResocketError
pub type Result<T> = std::result::Result<T, traits::ResocketError>;

/// Create a new socket link builder
///
/// This is a convenience function for starting the builder pattern.
///
/// # Example
/// ```ignore
/// let link = resocket::builder()
///     .url("wss://api.example.com/ws")
///     .sink(my_sink)
///     .reconnect_policy(ExponentialBackoff::new(
///         Duration::from_secs(1),
///         Duration::from_secs(30),
///         Some(5),
///     ))
///     .build()?;
/// ```
pub fn builder() -> SocketLinkBuilder<builder::states::NoUrl, builder::states::NoSink> {
    SocketLinkBuilder::new()
}

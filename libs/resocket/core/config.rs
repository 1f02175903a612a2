use crate::traits::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Configuration for a [`SocketLink`](crate::client::SocketLink)
///
/// Built via the type-state builder; holds everything the driver task needs
/// to run a link to completion.
pub struct LinkConfig {
    /// WebSocket URL (ws:// or wss://)
    pub(crate) url: String,

    /// Sink receiving inbound frames and lifecycle callbacks
    pub(crate) sink: Arc<dyn FrameSink>,

    /// Reconnection policy consulted after abnormal closes
    pub(crate) reconnect: Box<dyn ReconnectPolicy>,

    /// Shutdown flag - when false, the driver stops and never reconnects
    pub(crate) shutdown_flag: Arc<AtomicBool>,
}

impl LinkConfig {
    /// Get a reference to the URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

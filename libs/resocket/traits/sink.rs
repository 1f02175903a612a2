use crate::frame::Frame;
use async_trait::async_trait;

/// Receiver for inbound frames and link lifecycle callbacks
///
/// The link driver calls these methods inline, one at a time, so a sink
/// never sees overlapping invocations for the same link. `on_frame` should
/// run to completion quickly; anything slow belongs on the sink's own side.
#[async_trait]
pub trait FrameSink: Send + Sync + 'static {
    /// Handle a data frame received from the server
    async fn on_frame(&self, frame: Frame);

    /// Called after the transport handshake completes
    async fn on_open(&self) {}

    /// Called after the link goes down, before any reconnect decision
    async fn on_close(&self) {}
}

/// A sink that discards every frame
///
/// Useful for tests and for links that are only observed through the
/// event channel.
pub struct NullSink;

#[async_trait]
impl FrameSink for NullSink {
    async fn on_frame(&self, _frame: Frame) {}
}

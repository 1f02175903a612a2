pub mod states;

use crate::client::SocketLink;
use crate::config::LinkConfig;
use crate::traits::*;
use states::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Type-state builder for [`SocketLink`]
///
/// The type system enforces that the required fields (URL and sink) are set
/// before the link can be built.
pub struct SocketLinkBuilder<U, S>
where
    U: UrlState,
    S: SinkState,
{
    _state: TypeState<U, S>,
    url: Option<String>,
    sink: Option<Arc<dyn FrameSink>>,
    reconnect: Option<Box<dyn ReconnectPolicy>>,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl SocketLinkBuilder<NoUrl, NoSink> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            _state: TypeState::new(),
            url: None,
            sink: None,
            reconnect: None,
            shutdown_flag: None,
        }
    }
}

impl Default for SocketLinkBuilder<NoUrl, NoSink> {
    fn default() -> Self {
        Self::new()
    }
}

// URL setting
impl<S> SocketLinkBuilder<NoUrl, S>
where
    S: SinkState,
{
    pub fn url(self, url: impl Into<String>) -> SocketLinkBuilder<HasUrl, S> {
        SocketLinkBuilder {
            _state: TypeState::new(),
            url: Some(url.into()),
            sink: self.sink,
            reconnect: self.reconnect,
            shutdown_flag: self.shutdown_flag,
        }
    }
}

// Sink setting
impl<U> SocketLinkBuilder<U, NoSink>
where
    U: UrlState,
{
    /// Set the frame sink
    ///
    /// Takes an `Arc` so the caller can keep interacting with the sink
    /// (registering listeners, toggling flags) while the link drives it.
    pub fn sink(self, sink: Arc<dyn FrameSink>) -> SocketLinkBuilder<U, HasSink> {
        SocketLinkBuilder {
            _state: TypeState::new(),
            url: self.url,
            sink: Some(sink),
            reconnect: self.reconnect,
            shutdown_flag: self.shutdown_flag,
        }
    }
}

// Optional configuration methods
impl<U, S> SocketLinkBuilder<U, S>
where
    U: UrlState,
    S: SinkState,
{
    pub fn reconnect_policy(mut self, policy: impl ReconnectPolicy + 'static) -> Self {
        self.reconnect = Some(Box::new(policy));
        self
    }

    /// Set a custom shutdown flag for coordinated shutdown across components
    ///
    /// By default the link creates an internal flag. When the flag is set to
    /// `false`, the driver closes the socket, abandons any pending retry
    /// sleep, and exits.
    pub fn shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }
}

// Build method - only available when all required fields are set
impl SocketLinkBuilder<HasUrl, HasSink> {
    /// Build the link and spawn its driver task
    ///
    /// Must be called from within a Tokio runtime context.
    pub fn build(self) -> Result<SocketLink> {
        let url = self.url.expect("URL must be set");
        let sink = self.sink.expect("sink must be set");

        if !url.starts_with("ws://") && !url.starts_with("wss://") {
            return Err(ResocketError::Configuration(format!(
                "link URL must use ws:// or wss://, got '{}'",
                url
            )));
        }

        let shutdown_flag = self
            .shutdown_flag
            .unwrap_or_else(|| Arc::new(AtomicBool::new(true)));

        let reconnect = self.reconnect.unwrap_or_else(|| {
            Box::new(ExponentialBackoff::new(
                Duration::from_secs(1),
                Duration::from_secs(30),
                Some(5),
            ))
        });

        let config = LinkConfig {
            url,
            sink,
            reconnect,
            shutdown_flag,
        };

        Ok(SocketLink::spawn(config))
    }
}

//! Realtime notification service
//!
//! Facade tying one identity to one socket link and one dispatcher. The
//! service owns the link handle; status queries go through shared atomic
//! handles so they never contend with the driver.

use crate::config::RealtimeConfig;
use crate::identity::Identity;
use crate::realtime::dispatcher::{EventDispatcher, ListenerId, ListenerResult, SoundHook};
use crate::realtime::event::RealtimeEnvelope;
use crate::realtime::invalidation::QueryInvalidator;
use crate::realtime::Result;
use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use resocket::{AtomicCounters, AtomicLinkState, LinkCounters, LinkEvent, LinkState, SocketLink};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Shared handles into a live link, for lock-free status queries
struct LinkProbe {
    state: Arc<AtomicLinkState>,
    counters: Arc<AtomicCounters>,
    events: Receiver<LinkEvent>,
}

/// The realtime notification client for one identity
pub struct RealtimeService {
    identity: Identity,
    endpoint: String,
    realtime: RealtimeConfig,
    dispatcher: Arc<EventDispatcher>,
    link: Mutex<Option<SocketLink>>,
    probe: RwLock<Option<LinkProbe>>,
}

impl RealtimeService {
    pub fn new(
        identity: Identity,
        ws_base_url: &str,
        realtime: &RealtimeConfig,
        invalidator: Arc<dyn QueryInvalidator>,
        sound_hook: Option<SoundHook>,
    ) -> Self {
        let endpoint = identity.endpoint_url(ws_base_url);
        let dispatcher = Arc::new(EventDispatcher::new(
            invalidator,
            sound_hook,
            realtime.sound_enabled,
        ));

        Self {
            identity,
            endpoint,
            realtime: realtime.clone(),
            dispatcher,
            link: Mutex::new(None),
            probe: RwLock::new(None),
        }
    }

    /// Open the realtime link
    ///
    /// Idempotent: a no-op while a link is live or recovering on its own.
    /// Otherwise any stale handle (parked after a normal close, or exhausted)
    /// is torn down and a fresh link is started. This is also the only way
    /// to revive an exhausted link.
    pub async fn connect(&self) -> Result<()> {
        let mut link = self.link.lock().await;

        if let Some(existing) = link.as_ref() {
            if existing.is_active() {
                debug!(identity = %self.identity, "connect ignored, link already active");
                return Ok(());
            }
        }

        if let Some(stale) = link.take() {
            debug!(identity = %self.identity, "discarding stale link");
            *self.probe.write() = None;
            stale.shutdown().await?;
        }

        let fresh = resocket::builder()
            .url(self.endpoint.clone())
            .sink(self.dispatcher.clone())
            .reconnect_policy(self.realtime.reconnect_policy())
            .build()?;

        *self.probe.write() = Some(LinkProbe {
            state: fresh.state_handle(),
            counters: fresh.counters_handle(),
            events: fresh.event_receiver(),
        });
        *link = Some(fresh);

        info!(identity = %self.identity, endpoint = %self.endpoint, "realtime link started");
        Ok(())
    }

    /// Tear the service down
    ///
    /// Closes the socket, cancels any pending reconnect, and clears every
    /// registered listener. The service can be connected again afterwards,
    /// but the registry builds a fresh instance instead.
    pub async fn destroy(&self) -> Result<()> {
        if let Some(link) = self.link.lock().await.take() {
            link.shutdown().await?;
        }
        *self.probe.write() = None;
        self.dispatcher.clear_listeners();
        info!(identity = %self.identity, "realtime service destroyed");
        Ok(())
    }

    /// Whether the link is currently connected to the server
    pub fn is_connected(&self) -> bool {
        self.probe
            .read()
            .as_ref()
            .map(|probe| probe.state.is_connected())
            .unwrap_or(false)
    }

    /// Current link state, if a link exists
    pub fn link_state(&self) -> Option<LinkState> {
        self.probe.read().as_ref().map(|probe| probe.state.get())
    }

    /// Snapshot of the link counters, if a link exists
    pub fn counters(&self) -> Option<LinkCounters> {
        self.probe.read().as_ref().map(|probe| LinkCounters {
            frames_received: probe.counters.frames_received(),
            frames_sent: probe.counters.frames_sent(),
            reconnects: probe.counters.reconnects(),
        })
    }

    /// Drain one pending link transition event (non-blocking)
    pub fn try_recv_link_event(&self) -> Option<LinkEvent> {
        self.probe
            .read()
            .as_ref()
            .and_then(|probe| probe.events.try_recv().ok())
    }

    /// Register a listener for an exact event tag
    pub fn add_event_listener(
        &self,
        tag: impl Into<String>,
        listener: impl Fn(&RealtimeEnvelope) -> ListenerResult + Send + Sync + 'static,
    ) -> ListenerId {
        self.dispatcher.add_listener(tag, listener)
    }

    /// Remove a previously registered listener
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.dispatcher.remove_listener(id)
    }

    /// Toggle the notification sound cue
    pub fn set_sound_enabled(&self, enabled: bool) {
        self.dispatcher.set_sound_enabled(enabled);
    }

    pub fn sound_enabled(&self) -> bool {
        self.dispatcher.sound_enabled()
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The dispatcher backing this service
    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }
}

//! Event dispatch
//!
//! One dispatcher per realtime connection. Each inbound frame is parsed,
//! runs the built-in invalidation side effects for its tag, then fans out to
//! every externally registered listener subscribed to that exact tag. The
//! whole sequence is synchronous and runs to completion before the link
//! reads the next frame.

use crate::realtime::event::{tags, RealtimeEnvelope};
use crate::realtime::invalidation::{keys_for_tag, QueryInvalidator};
use async_trait::async_trait;
use parking_lot::RwLock;
use resocket::{Frame, FrameSink};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Handle for removing a registered listener
pub type ListenerId = u64;

/// Outcome of a listener invocation; errors are logged and isolated
pub type ListenerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Callback invoked when the notification sound cue should play
pub type SoundHook = Arc<dyn Fn() + Send + Sync>;

type ListenerFn = Box<dyn Fn(&RealtimeEnvelope) -> ListenerResult + Send + Sync>;

/// Parses inbound frames and routes them by tag
pub struct EventDispatcher {
    invalidator: Arc<dyn QueryInvalidator>,
    sound_hook: Option<SoundHook>,
    sound_enabled: AtomicBool,
    listeners: RwLock<HashMap<String, Vec<(ListenerId, ListenerFn)>>>,
    next_listener_id: AtomicU64,
}

impl EventDispatcher {
    pub fn new(
        invalidator: Arc<dyn QueryInvalidator>,
        sound_hook: Option<SoundHook>,
        sound_enabled: bool,
    ) -> Self {
        Self {
            invalidator,
            sound_hook,
            sound_enabled: AtomicBool::new(sound_enabled),
            listeners: RwLock::new(HashMap::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Toggle the notification sound cue
    pub fn set_sound_enabled(&self, enabled: bool) {
        self.sound_enabled.store(enabled, Ordering::Release);
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled.load(Ordering::Acquire)
    }

    /// Register a listener for an exact tag
    ///
    /// Multiple listeners per tag are allowed; the returned id removes this
    /// one specifically.
    pub fn add_listener(
        &self,
        tag: impl Into<String>,
        listener: impl Fn(&RealtimeEnvelope) -> ListenerResult + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .entry(tag.into())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a listener by id; returns whether it was found
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let mut removed = false;
        listeners.retain(|_, subscribed| {
            let before = subscribed.len();
            subscribed.retain(|(listener_id, _)| *listener_id != id);
            removed |= subscribed.len() != before;
            !subscribed.is_empty()
        });
        removed
    }

    /// Drop every registered listener
    pub fn clear_listeners(&self) {
        self.listeners.write().clear();
    }

    /// Total number of registered listeners across all tags
    pub fn listener_count(&self) -> usize {
        self.listeners.read().values().map(Vec::len).sum()
    }

    /// Parse and dispatch an inbound text frame
    ///
    /// A malformed frame is logged and dropped; it never affects the
    /// connection or subsequent frames.
    pub fn dispatch_text(&self, text: &str) {
        match RealtimeEnvelope::parse(text) {
            Ok(envelope) => self.dispatch(&envelope),
            Err(e) => warn!("dropping malformed realtime frame: {}", e),
        }
    }

    /// Run built-in side effects, then fan out to listeners
    pub fn dispatch(&self, envelope: &RealtimeEnvelope) {
        self.run_built_in(envelope);
        self.fan_out(envelope);
    }

    fn run_built_in(&self, envelope: &RealtimeEnvelope) {
        match keys_for_tag(&envelope.tag) {
            Some(keys) => {
                for key in keys {
                    self.invalidator.invalidate(key);
                }
                if envelope.tag == tags::NOTIFICATION && self.sound_enabled() {
                    if let Some(hook) = &self.sound_hook {
                        hook();
                    }
                }
            }
            None => {
                debug!(tag = %envelope.tag, "no built-in handling for tag");
            }
        }
    }

    fn fan_out(&self, envelope: &RealtimeEnvelope) {
        let listeners = self.listeners.read();
        if let Some(subscribed) = listeners.get(&envelope.tag) {
            for (id, listener) in subscribed {
                if let Err(e) = listener(envelope) {
                    error!(listener = *id, tag = %envelope.tag, "listener failed: {}", e);
                }
            }
        }
    }
}

#[async_trait]
impl FrameSink for EventDispatcher {
    async fn on_frame(&self, frame: Frame) {
        match frame.as_text() {
            Some(text) => self.dispatch_text(text),
            None => debug!("ignoring binary frame"),
        }
    }

    async fn on_open(&self) {
        debug!("realtime link open");
    }

    async fn on_close(&self) {
        debug!("realtime link closed");
    }
}

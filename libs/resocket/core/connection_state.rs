//! Atomic link state and counters
//!
//! Shared between the link handle and its driver task; everything here is
//! lock-free so status queries never contend with the driver.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Lifecycle state of a socket link
///
/// Transitions: `Idle → Connecting → Connected → Disconnected`, then back to
/// `Connecting` (as `Reconnecting`) while the retry budget lasts, or to
/// `Idle` after a normal server close, or to `Exhausted` once the budget is
/// spent. `ShuttingDown` is terminal and only entered via shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LinkState {
    /// No connection and none wanted (initial, or after a normal close)
    Idle = 0,
    /// First connection attempt in flight
    Connecting = 1,
    /// Transport handshake completed
    Connected = 2,
    /// Link lost, reconnect decision pending or sleep in progress
    Disconnected = 3,
    /// Retry attempt in flight
    Reconnecting = 4,
    /// Retry budget spent; only an external reconnect revives the link
    Exhausted = 5,
    /// Shutdown requested
    ShuttingDown = 6,
}

impl LinkState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LinkState::Idle,
            1 => LinkState::Connecting,
            2 => LinkState::Connected,
            3 => LinkState::Disconnected,
            4 => LinkState::Reconnecting,
            5 => LinkState::Exhausted,
            _ => LinkState::ShuttingDown,
        }
    }
}

/// Lock-free holder for a [`LinkState`]
#[derive(Debug)]
pub struct AtomicLinkState {
    inner: AtomicU8,
}

impl AtomicLinkState {
    pub fn new(state: LinkState) -> Self {
        Self {
            inner: AtomicU8::new(state as u8),
        }
    }

    pub fn get(&self) -> LinkState {
        LinkState::from_u8(self.inner.load(Ordering::Acquire))
    }

    pub fn set(&self, state: LinkState) {
        self.inner.store(state as u8, Ordering::Release);
    }

    /// Transition only if the current state matches `current`
    pub fn compare_exchange(
        &self,
        current: LinkState,
        new: LinkState,
    ) -> std::result::Result<LinkState, LinkState> {
        self.inner
            .compare_exchange(
                current as u8,
                new as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(LinkState::from_u8)
            .map_err(LinkState::from_u8)
    }

    pub fn is_connected(&self) -> bool {
        self.get() == LinkState::Connected
    }

    /// Connection attempt in flight (first or retry)
    pub fn is_connecting(&self) -> bool {
        matches!(self.get(), LinkState::Connecting | LinkState::Reconnecting)
    }

    /// Link is live or trying to get there; an external reconnect request
    /// should be a no-op in this state
    pub fn is_active(&self) -> bool {
        matches!(
            self.get(),
            LinkState::Connecting
                | LinkState::Connected
                | LinkState::Reconnecting
                | LinkState::Disconnected
        )
    }

    pub fn is_exhausted(&self) -> bool {
        self.get() == LinkState::Exhausted
    }

    pub fn is_shutting_down(&self) -> bool {
        self.get() == LinkState::ShuttingDown
    }
}

/// Lock-free counters for link activity
#[derive(Debug, Default)]
pub struct AtomicCounters {
    frames_received: AtomicU64,
    frames_sent: AtomicU64,
    reconnects: AtomicU64,
}

impl AtomicCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sent(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reconnects(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received.load(Ordering::Relaxed)
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    pub fn reconnects(&self) -> u64 {
        self.reconnects.load(Ordering::Relaxed)
    }
}

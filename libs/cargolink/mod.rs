//! CargoLink Platform - Client Core
//!
//! Client-side realtime layer for the CargoLink cargo-booking platform:
//! a reconnecting notification link, tag-based event dispatch with cache
//! invalidation, and an identity-keyed connection registry.

pub mod config;
pub mod identity;
pub mod realtime;
pub mod utils;

// Re-export commonly used items
pub use config::NotifierConfig;
pub use identity::{Identity, Role};
pub use realtime::{
    ConnectionRegistry, EventDispatcher, EventKind, QueryInvalidator, RealtimeEnvelope,
    RealtimeError, RealtimeService,
};
pub use utils::{init_tracing, init_tracing_with_level, ShutdownManager};

//! Core client functionality: driver task, configuration, state, builder

pub mod builder;
pub mod client;
pub mod config;
pub mod connection_state;

// Re-export main types
pub use builder::{states, SocketLinkBuilder};
pub use client::{LinkCounters, LinkEvent, SocketLink};
pub use config::LinkConfig;
pub use connection_state::{AtomicCounters, AtomicLinkState, LinkState};

// Re-export traits for convenience
pub use crate::traits::*;

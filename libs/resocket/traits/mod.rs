//! # Resocket Traits
//!
//! Core traits and types for the resocket WebSocket client library:
//!
//! - **FrameSink**: receive inbound frames and lifecycle callbacks
//! - **ReconnectPolicy**: control reconnection behavior after abnormal closes

pub mod error;
pub mod frame;
pub mod reconnect;
pub mod sink;

// Re-export commonly used types
pub use error::{ResocketError, Result};
pub use frame::Frame;
pub use reconnect::{ConstantDelay, ExponentialBackoff, NeverReconnect, ReconnectPolicy};
pub use sink::{FrameSink, NullSink};

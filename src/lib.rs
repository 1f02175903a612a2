//! CargoLink Notifier - Main Library
//!
//! This crate provides the binary-facing surface of the CargoLink realtime
//! workspace.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI helpers)
//! - **cargolink**: Platform domain logic (re-exported from workspace)
//! - **resocket**: WebSocket link library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use cargolink_notifier::bin_common::{load_config_from_env, ConfigType};
//! use cargolink_notifier::cargolink::NotifierConfig;
//! ```

// Re-export workspace libraries for convenience
pub use cargolink;
pub use resocket;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{load_config_from_env, parse_args, ConfigType};
}

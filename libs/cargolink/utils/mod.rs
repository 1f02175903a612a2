//! Common utilities for CargoLink binaries

mod logging;
mod shutdown;

pub use logging::{init_tracing, init_tracing_with_level};
pub use shutdown::ShutdownManager;

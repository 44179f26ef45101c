//! Utility modules
//!
//! - **logging**: `tracing` subscriber setup

pub mod logging;

pub use logging::{LogFormat, init_logging};

//! Core functionality
//!
//! Provider implementations, callbacks and the traits shared between them.

pub mod callbacks;
pub mod providers;
pub mod traits;

//! Text Completion Module for Bedrock
//!
//! Invoke API calls for the prompt-based model families

pub mod invoke;
pub mod transformations;

pub use invoke::{execute_invoke, execute_invoke_stream};
pub use transformations::{RequestBody, prepare_input, prepare_output};

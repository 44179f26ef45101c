//! Integration tests for bedrock-llm
//!
//! These tests drive complete invocations through the public API, using
//! in-process transports or a local HTTP server in place of AWS.

pub mod config_tests;
pub mod streaming_tests;

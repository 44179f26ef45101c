//! Core traits module
//!
//! Contains the abstract interfaces shared across the crate

pub mod error_mapper;

pub use error_mapper::ErrorMapper;

//! Utilities
//!
//! Common utilities used throughout the engine.

pub mod error;
pub mod text;

pub use error::*;

//! Data Models
//!
//! Configuration and inbound records shared by the services.

pub mod config;
pub mod prior_knowledge;
pub mod signal_bank;

pub use config::*;
pub use prior_knowledge::*;
pub use signal_bank::*;

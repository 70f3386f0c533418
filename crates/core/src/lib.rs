//! Elicit Core
//!
//! Foundational types for the Elicit workspace. This crate has zero
//! dependencies on the engine or on any model provider.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `category` - The `Category` trait plus `ConfidenceCategory` (quiz mode)
//!   and `InterviewAnchor` (voice-interview mode)
//! - `signal` - `SignalKind`, the closed set of answer signals
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/thiserror**
//! 2. **Closed sum types** - categories and signals are enums, parsed once at
//!    the configuration or model boundary and never compared as raw strings
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod category;
pub mod error;
pub mod signal;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Categories ─────────────────────────────────────────────────────────
pub use category::{Category, ConfidenceCategory, InterviewAnchor};

// ── Signals ────────────────────────────────────────────────────────────
pub use signal::SignalKind;

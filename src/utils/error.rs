//! Error Handling
//!
//! Unified error types for the engine.
//! Uses thiserror for ergonomic error definitions.
//!
//! Model-collaborator failures are deliberately absent: they are recovered
//! inside a turn and never reach the caller (see `services::collaborator`).

use thiserror::Error;

use elicit_core::CoreError;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors (fail fast at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML configuration parse errors
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Errors raised by the core crate
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Validation errors (e.g. answering a finished interview)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Another turn is already being processed for this session
    #[error("Session busy: {0}")]
    SessionBusy(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for engine errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a session busy error
    pub fn session_busy(msg: impl Into<String>) -> Self {
        Self::SessionBusy(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}

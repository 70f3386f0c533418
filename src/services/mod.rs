//! Services
//!
//! The elicitation engine's building blocks, leaf first: confidence tracking
//! and signal detection are local and total; the analyzer and generator wrap
//! the optional model collaborator; the orchestrators drive sessions.

pub mod analyzer;
pub mod collaborator;
pub mod confidence;
pub mod generator;
pub mod guardrail;
pub mod interview;
pub mod quiz;
pub mod session;
pub mod signals;

pub use collaborator::{Collaborator, CollaboratorError, ContentSource, Enriched};
pub use confidence::{ConfidenceState, ExtractedFact, ProgressSnapshot};
pub use interview::{InterviewSession, InterviewState, InterviewTurnResult};
pub use quiz::{QuizSession, QuizState, QuizStep, QuizTurnResult};
pub use session::{Session, SessionHandle};
pub use signals::{SignalDetection, SignalDetector};

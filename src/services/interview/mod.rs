//! Voice Interview
//!
//! Three anchors asked in fixed order (Problem, Process, Priority) with
//! bounded follow-up probing per anchor.

pub mod orchestrator;
pub mod state;

pub use orchestrator::{InterviewProgress, InterviewSession, InterviewTurnResult};
pub use state::{
    CompletionReason, InterviewDecision, InterviewPhase, InterviewState, QuestionType,
    RecordedAnswer, Transition,
};

//! Signal Detection
//!
//! Local keyword and length rules that classify a free-text answer.

pub mod detector;

pub use detector::{DetectedSignal, SignalDetection, SignalDetector, MAX_SUGGESTED_FOLLOW_UPS};

//! Pipeline stages for one notice check.
//!
//! - `detect_changes`: classify the current snapshot against the previous one
//! - `MessageFormatter`: bound a change set into a webhook message
//! - `NoticePipeline`: sequence fetch → detect → format → dispatch → persist

pub mod detect;
pub mod format;
pub mod run;

pub use detect::detect_changes;
pub use format::{MessageFormatter, enforce_limits, truncate, validate_url};
pub use run::{NoticePipeline, RunOutcome};

//! Engine errors.
//!
//! Only conditions the engine cannot recover from are errors. Staffing
//! shortfalls and budget shortfalls are reported as data on the
//! returned schedule instead.

use thiserror::Error;

use crate::models::Role;
use crate::validation::ValidationError;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal engine errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("unknown worker id '{id}' (known ids: {known:?})")]
    UnknownWorker { id: String, known: Vec<String> },

    #[error("unknown shift id '{id}' (known ids: {known:?})")]
    UnknownShift { id: String, known: Vec<String> },

    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("fairness equalization has already been applied to this context")]
    FairnessAlreadyApplied,

    #[error("worker '{worker}' is already assigned to shift '{shift}'")]
    DuplicateAssignment { worker: String, shift: String },

    #[error("worker '{worker}' does not hold the {role} role on shift '{shift}'")]
    NotAssigned {
        worker: String,
        shift: String,
        role: Role,
    },
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}

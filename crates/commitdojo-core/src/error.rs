//! Error types for grading, submissions, and attempt recording.
//!
//! Every kind here is recoverable. Grading and submission errors are returned
//! as values so callers can decide how to present them; recorder errors are
//! defined in core so the dispatcher can classify failures by downcasting
//! instead of string matching.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A commit header that does not match `type(scope)!: description`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseError {
    /// The first line did not match the grammar.
    #[error("commit header does not match `type(scope)!: description`")]
    MalformedFormat,
}

/// Reasons a submission was rejected before it reached grading.
///
/// A rejected submission never consumes an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The submission was blank.
    #[error("enter a commit message before submitting")]
    EmptyInput,

    /// The exercise was already solved in this session.
    #[error("exercise '{0}' is already solved")]
    AlreadyLocked(String),

    /// The retry budget for the exercise is used up.
    #[error("no attempts left for exercise '{exercise_id}' ({max} used), try another exercise")]
    AttemptsExhausted { exercise_id: String, max: u32 },

    /// The exercise is not part of this session.
    #[error("unknown exercise: {0}")]
    UnknownExercise(String),

    /// The session has no exercises to submit to.
    #[error("this session has no exercises")]
    NoExercises,
}

/// Reasons a session could not be built from its answer keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Two answer keys share an exercise id.
    #[error("duplicate exercise ID: {0}")]
    DuplicateExercise(String),
}

impl SubmitError {
    /// Returns `true` if resubmitting the same exercise can never succeed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmitError::AlreadyLocked(_) | SubmitError::AttemptsExhausted { .. }
        )
    }
}

/// Errors that can occur when delivering an attempt record.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The recorder did not finish within its deadline.
    #[error("recording timed out after {0}ms")]
    Timeout(u64),

    /// Credentials were rejected by the remote endpoint.
    #[error("recorder rejected credentials: {0}")]
    Unauthorized(String),

    /// The remote endpoint returned an error response.
    #[error("recorder endpoint error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// Writing the record locally failed.
    #[error("failed to write attempt record: {0}")]
    Io(String),
}

impl RecorderError {
    /// Returns `true` if the failure is likely to go away on its own.
    pub fn is_transient(&self) -> bool {
        match self {
            RecorderError::Timeout(_) | RecorderError::Network(_) => true,
            RecorderError::Http { status, .. } => *status >= 500 || *status == 429,
            RecorderError::Unauthorized(_) | RecorderError::Io(_) => false,
        }
    }
}

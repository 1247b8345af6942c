//! commitdojo-core — Commit grading engine, exercise model, and session state.
//!
//! This crate parses learner commit messages, grades them against an answer
//! key, and tracks per-exercise progress within a practice session.

pub mod error;
pub mod exercise;
pub mod grading;
pub mod grammar;
pub mod hints;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod traits;

pub use error::{ParseError, RecorderError, SessionError, SubmitError};
pub use exercise::{ExerciseAttemptState, ExerciseStatus, MAX_ATTEMPTS};
pub use grading::grade;
pub use grammar::parse;
pub use model::{CommitSpecification, Dimension, FieldScore, GradeResult, ParsedCommit};
pub use session::{Session, SessionSnapshot, SessionState, SubmitOutcome};

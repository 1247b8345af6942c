//! Per-exercise attempt tracking.
//!
//! An exercise moves `Unattempted -> InProgress -> Locked`. `Locked` is
//! terminal for the lifetime of the session.

use serde::{Deserialize, Serialize};

use crate::error::SubmitError;
use crate::grading;
use crate::model::{CommitSpecification, GradeResult};

/// Scored submissions allowed per exercise.
pub const MAX_ATTEMPTS: u32 = 20;

/// Where an exercise stands in its progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStatus {
    Unattempted,
    InProgress,
    Locked,
}

/// Mutable progress for one exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseAttemptState {
    pub exercise_id: String,
    pub attempt_count: u32,
    pub locked: bool,
    pub last_grade: Option<GradeResult>,
}

impl ExerciseAttemptState {
    pub fn new(exercise_id: impl Into<String>) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            attempt_count: 0,
            locked: false,
            last_grade: None,
        }
    }

    pub fn status(&self) -> ExerciseStatus {
        if self.locked {
            ExerciseStatus::Locked
        } else if self.attempt_count == 0 {
            ExerciseStatus::Unattempted
        } else {
            ExerciseStatus::InProgress
        }
    }

    pub fn attempts_remaining(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.attempt_count)
    }

    pub fn is_exhausted(&self) -> bool {
        !self.locked && self.attempt_count >= MAX_ATTEMPTS
    }

    /// Check whether a submission would be accepted, without grading it.
    pub fn check_submission(&self, raw: &str) -> Result<(), SubmitError> {
        if raw.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        if self.locked {
            return Err(SubmitError::AlreadyLocked(self.exercise_id.clone()));
        }
        if self.attempt_count >= MAX_ATTEMPTS {
            return Err(SubmitError::AttemptsExhausted {
                exercise_id: self.exercise_id.clone(),
                max: MAX_ATTEMPTS,
            });
        }
        Ok(())
    }

    /// Grade a submission and apply the resulting transition.
    ///
    /// Rejected submissions leave the state untouched. An accepted one
    /// consumes an attempt and, when perfect, locks the exercise.
    pub fn submit(
        &mut self,
        spec: &CommitSpecification,
        raw: &str,
    ) -> Result<GradeResult, SubmitError> {
        self.check_submission(raw)?;

        let grade = grading::grade(spec, raw);
        self.attempt_count += 1;
        self.last_grade = Some(grade.clone());
        if grade.is_perfect {
            self.locked = true;
        }

        Ok(grade)
    }
}

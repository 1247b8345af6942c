//! Collaborator trait for recording graded attempts.
//!
//! Implementations live in the `commitdojo-recorder` crate. Recording happens
//! after a grade is final and never feeds back into the session.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::GradeResult;
use crate::session::SubmitOutcome;

/// One accepted submission, as handed to a recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Session the attempt belongs to.
    pub session_id: Uuid,
    /// Optional learner name from configuration.
    #[serde(default)]
    pub learner: Option<String>,
    pub exercise_id: String,
    /// The text exactly as submitted.
    pub raw_input: String,
    pub grade: GradeResult,
    /// 1-based attempt number on the exercise.
    pub attempt_number: u32,
    pub timestamp: DateTime<Utc>,
}

impl AttemptRecord {
    /// Build a record for an accepted submission, stamped with the current time.
    pub fn from_outcome(
        session_id: Uuid,
        learner: Option<String>,
        raw_input: &str,
        outcome: &SubmitOutcome,
    ) -> Self {
        Self {
            session_id,
            learner,
            exercise_id: outcome.exercise_id.clone(),
            raw_input: raw_input.to_string(),
            grade: outcome.grade.clone(),
            attempt_number: outcome.attempt_number,
            timestamp: Utc::now(),
        }
    }
}

/// Destination for attempt records (file, HTTP endpoint, ...).
#[async_trait]
pub trait AttemptRecorder: Send + Sync {
    /// Human-readable recorder name (e.g. "jsonl").
    fn name(&self) -> &str;

    /// Deliver one record.
    async fn record(&self, record: &AttemptRecord) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommitSpecification;
    use crate::session::Session;

    #[test]
    fn record_from_outcome() {
        let mut session = Session::new(vec![CommitSpecification::new(
            "docs-readme",
            "docs",
            None,
            "update readme",
            false,
        )]).unwrap();
        let outcome = session.submit("docs-readme", "docs: update readme").unwrap();
        let id = Uuid::new_v4();
        let record = AttemptRecord::from_outcome(id, Some("sam".into()), "docs: update readme", &outcome);

        assert_eq!(record.session_id, id);
        assert_eq!(record.exercise_id, "docs-readme");
        assert_eq!(record.attempt_number, 1);
        assert!(record.grade.is_perfect);

        let json = serde_json::to_string(&record).unwrap();
        let back: AttemptRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.raw_input, "docs: update readme");
        assert_eq!(back.learner.as_deref(), Some("sam"));
    }
}

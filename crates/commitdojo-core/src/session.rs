//! Practice session aggregation.
//!
//! A [`Session`] owns the ordered answer keys for a set of exercises and the
//! mutable [`SessionState`] built up as the learner submits. Each call to
//! [`Session::submit`] reads and writes the state as one unit, so a score can
//! only be credited once per exercise no matter how quickly submissions
//! arrive.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SubmitError};
use crate::exercise::{ExerciseAttemptState, ExerciseStatus, MAX_ATTEMPTS};
use crate::model::{CommitSpecification, ExerciseSet, GradeResult};

/// Mutable progress for a whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Sum of the grades that locked an exercise.
    pub total_score: u32,
    /// Submissions that reached grading.
    pub total_attempts: u32,
    /// Index of the current exercise.
    pub cursor: usize,
    /// Per-exercise progress, created on first accepted submission.
    pub exercises: BTreeMap<String, ExerciseAttemptState>,
}

/// The result of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub exercise_id: String,
    pub grade: GradeResult,
    /// 1-based number of this attempt on the exercise.
    pub attempt_number: u32,
    /// This submission moved the exercise into `Locked`.
    pub newly_locked: bool,
    /// Points added to the session total by this submission.
    pub score_awarded: u32,
}

/// Read-only view of one exercise for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSnapshot {
    pub exercise_id: String,
    pub status: ExerciseStatus,
    pub attempt_count: u32,
    pub attempts_remaining: u32,
    pub locked: bool,
    pub last_score: Option<u8>,
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub total_score: u32,
    pub max_score: u32,
    pub total_attempts: u32,
    pub progress_percent: f64,
    pub cursor: usize,
    pub locked_count: usize,
    pub exercise_count: usize,
    pub exercises: Vec<ExerciseSnapshot>,
}

/// A practice session over an ordered list of exercises.
#[derive(Debug, Clone)]
pub struct Session {
    specs: Vec<CommitSpecification>,
    state: SessionState,
}

impl Session {
    /// Start a session over `specs` in presentation order.
    ///
    /// Exercise ids must be unique; progress is keyed by id.
    pub fn new(specs: Vec<CommitSpecification>) -> Result<Self, SessionError> {
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = specs.iter().find(|s| !seen.insert(s.exercise_id.as_str())) {
            return Err(SessionError::DuplicateExercise(dup.exercise_id.clone()));
        }

        Ok(Self {
            specs,
            state: SessionState::default(),
        })
    }

    pub fn from_set(set: &ExerciseSet) -> Result<Self, SessionError> {
        Self::new(set.specifications())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn specifications(&self) -> &[CommitSpecification] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    fn spec(&self, exercise_id: &str) -> Option<&CommitSpecification> {
        self.specs.iter().find(|s| s.exercise_id == exercise_id)
    }

    /// The answer key under the cursor.
    pub fn current(&self) -> Option<&CommitSpecification> {
        self.specs.get(self.state.cursor)
    }

    /// Progress for an exercise, `None` until its first accepted submission.
    pub fn exercise(&self, exercise_id: &str) -> Option<&ExerciseAttemptState> {
        self.state.exercises.get(exercise_id)
    }

    pub fn status(&self, exercise_id: &str) -> ExerciseStatus {
        self.exercise(exercise_id)
            .map(ExerciseAttemptState::status)
            .unwrap_or(ExerciseStatus::Unattempted)
    }

    /// Submit a commit message for an exercise.
    pub fn submit(&mut self, exercise_id: &str, raw: &str) -> Result<SubmitOutcome, SubmitError> {
        let spec = self
            .spec(exercise_id)
            .cloned()
            .ok_or_else(|| SubmitError::UnknownExercise(exercise_id.to_string()))?;

        if raw.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        if let Some(existing) = self.state.exercises.get(exercise_id) {
            existing.check_submission(raw)?;
        }

        let exercise = self
            .state
            .exercises
            .entry(exercise_id.to_string())
            .or_insert_with(|| ExerciseAttemptState::new(exercise_id));
        let grade = exercise.submit(&spec, raw)?;
        let attempt_number = exercise.attempt_count;

        self.state.total_attempts += 1;
        let score_awarded = if grade.is_perfect {
            u32::from(grade.total_score)
        } else {
            0
        };
        self.state.total_score += score_awarded;

        tracing::debug!(
            exercise = exercise_id,
            attempt = attempt_number,
            score = grade.total_score,
            perfect = grade.is_perfect,
            "graded submission"
        );
        if grade.is_perfect {
            tracing::debug!(
                exercise = exercise_id,
                total_score = self.state.total_score,
                "exercise locked"
            );
        }

        Ok(SubmitOutcome {
            exercise_id: exercise_id.to_string(),
            newly_locked: grade.is_perfect,
            grade,
            attempt_number,
            score_awarded,
        })
    }

    /// Submit to the exercise under the cursor.
    pub fn submit_current(&mut self, raw: &str) -> Result<SubmitOutcome, SubmitError> {
        let id = self
            .current()
            .map(|s| s.exercise_id.clone())
            .ok_or(SubmitError::NoExercises)?;
        self.submit(&id, raw)
    }

    /// Move to the next exercise, wrapping to the first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> usize {
        let n = self.specs.len();
        if n > 0 {
            self.state.cursor = (self.state.cursor + 1) % n;
        }
        self.state.cursor
    }

    /// Move to the previous exercise, wrapping to the last.
    pub fn previous(&mut self) -> usize {
        let n = self.specs.len();
        if n > 0 {
            self.state.cursor = (self.state.cursor + n - 1) % n;
        }
        self.state.cursor
    }

    /// Move the cursor to a specific exercise.
    pub fn jump_to(&mut self, exercise_id: &str) -> Result<usize, SubmitError> {
        let idx = self
            .specs
            .iter()
            .position(|s| s.exercise_id == exercise_id)
            .ok_or_else(|| SubmitError::UnknownExercise(exercise_id.to_string()))?;
        self.state.cursor = idx;
        Ok(idx)
    }

    pub fn locked_count(&self) -> usize {
        self.specs
            .iter()
            .filter(|s| self.status(&s.exercise_id) == ExerciseStatus::Locked)
            .count()
    }

    /// Share of exercises solved, 0.0 to 100.0.
    pub fn progress_percent(&self) -> f64 {
        if self.specs.is_empty() {
            return 0.0;
        }
        self.locked_count() as f64 / self.specs.len() as f64 * 100.0
    }

    /// Highest total score the session can reach.
    pub fn max_score(&self) -> u32 {
        self.specs.len() as u32 * u32::from(GradeResult::MAX_SCORE)
    }

    /// Discard all progress and return to the first exercise.
    pub fn reset(&mut self) {
        tracing::debug!(attempts = self.state.total_attempts, "resetting session");
        self.state = SessionState::default();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let exercises = self
            .specs
            .iter()
            .map(|spec| match self.exercise(&spec.exercise_id) {
                Some(ex) => ExerciseSnapshot {
                    exercise_id: spec.exercise_id.clone(),
                    status: ex.status(),
                    attempt_count: ex.attempt_count,
                    attempts_remaining: ex.attempts_remaining(),
                    locked: ex.locked,
                    last_score: ex.last_grade.as_ref().map(|g| g.total_score),
                },
                None => ExerciseSnapshot {
                    exercise_id: spec.exercise_id.clone(),
                    status: ExerciseStatus::Unattempted,
                    attempt_count: 0,
                    attempts_remaining: MAX_ATTEMPTS,
                    locked: false,
                    last_score: None,
                },
            })
            .collect();

        SessionSnapshot {
            total_score: self.state.total_score,
            max_score: self.max_score(),
            total_attempts: self.state.total_attempts,
            progress_percent: self.progress_percent(),
            cursor: self.state.cursor,
            locked_count: self.locked_count(),
            exercise_count: self.specs.len(),
            exercises,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<CommitSpecification> {
        vec![
            CommitSpecification::new(
                "feat-auth",
                "feat",
                Some("auth"),
                "add user authentication system",
                false,
            ),
            CommitSpecification::new("docs-readme", "docs", None, "update installation guide", false),
            CommitSpecification::new("api-break", "feat", Some("api"), "remove deprecated endpoints", true),
        ]
    }

    const PERFECT_AUTH: &str = "feat(auth): add user authentication system";

    #[test]
    fn scenario_perfect_locks_and_scores_once() {
        let mut session = Session::new(specs()).unwrap();
        let outcome = session.submit("feat-auth", PERFECT_AUTH).unwrap();
        assert!(outcome.grade.is_perfect);
        assert!(outcome.newly_locked);
        assert_eq!(outcome.score_awarded, 8);
        assert_eq!(session.state().total_score, 8);

        for _ in 0..3 {
            let err = session.submit("feat-auth", PERFECT_AUTH).unwrap_err();
            assert_eq!(err, SubmitError::AlreadyLocked("feat-auth".into()));
        }
        assert_eq!(session.state().total_score, 8);
        assert_eq!(session.state().total_attempts, 1);
        assert_eq!(session.exercise("feat-auth").unwrap().attempt_count, 1);
    }

    #[test]
    fn scenario_partial_grade_adds_nothing() {
        let mut session = Session::new(specs()).unwrap();
        let outcome = session.submit("feat-auth", "feet(auth): add user auth").unwrap();
        assert_eq!(outcome.grade.total_score, 3);
        assert!(!outcome.newly_locked);
        assert_eq!(outcome.score_awarded, 0);
        assert_eq!(session.state().total_score, 0);
        assert_eq!(session.status("feat-auth"), ExerciseStatus::InProgress);
    }

    #[test]
    fn scenario_malformed_consumes_attempt() {
        let mut session = Session::new(specs()).unwrap();
        let outcome = session.submit("feat-auth", "just some text").unwrap();
        assert!(outcome.grade.parse_error().is_some());
        assert_eq!(outcome.grade.total_score, 0);
        assert_eq!(outcome.attempt_number, 1);
        assert_eq!(session.state().total_attempts, 1);
    }

    #[test]
    fn scenario_exhaustion() {
        let mut session = Session::new(specs()).unwrap();
        for n in 1..=MAX_ATTEMPTS {
            let outcome = session.submit("feat-auth", "feat(auth): nope").unwrap();
            assert_eq!(outcome.attempt_number, n);
        }
        let err = session.submit("feat-auth", PERFECT_AUTH).unwrap_err();
        assert!(matches!(err, SubmitError::AttemptsExhausted { .. }));
        assert_eq!(session.exercise("feat-auth").unwrap().attempt_count, MAX_ATTEMPTS);
        assert_eq!(session.state().total_attempts, MAX_ATTEMPTS);
        assert_eq!(session.state().total_score, 0);
    }

    #[test]
    fn empty_input_creates_no_state() {
        let mut session = Session::new(specs()).unwrap();
        assert_eq!(session.submit("feat-auth", ""), Err(SubmitError::EmptyInput));
        assert_eq!(session.submit("feat-auth", "   "), Err(SubmitError::EmptyInput));
        assert!(session.exercise("feat-auth").is_none());
        assert_eq!(session.state().total_attempts, 0);
    }

    #[test]
    fn unknown_exercise_is_rejected() {
        let mut session = Session::new(specs()).unwrap();
        let err = session.submit("nope", PERFECT_AUTH).unwrap_err();
        assert_eq!(err, SubmitError::UnknownExercise("nope".into()));
        assert!(session.state().exercises.is_empty());
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut session = Session::new(specs()).unwrap();
        assert_eq!(session.previous(), 2);
        assert_eq!(session.next(), 0);
        assert_eq!(session.next(), 1);
        assert_eq!(session.next(), 2);
        assert_eq!(session.next(), 0);
        assert_eq!(session.current().unwrap().exercise_id, "feat-auth");
    }

    #[test]
    fn navigation_on_empty_session_is_noop() {
        let mut session = Session::new(vec![]).unwrap();
        assert_eq!(session.next(), 0);
        assert_eq!(session.previous(), 0);
        assert_eq!(session.progress_percent(), 0.0);
        assert_eq!(
            session.submit_current("feat: x"),
            Err(SubmitError::NoExercises)
        );
    }

    #[test]
    fn duplicate_exercise_ids_are_rejected() {
        let mut specs = specs();
        specs.push(CommitSpecification::new(
            specs[0].exercise_id.clone(),
            "chore",
            None,
            "bump deps",
            false,
        ));
        let dup = specs[0].exercise_id.clone();
        assert_eq!(
            Session::new(specs).err(),
            Some(SessionError::DuplicateExercise(dup))
        );
    }

    #[test]
    fn submit_current_follows_cursor() {
        let mut session = Session::new(specs()).unwrap();
        session.next();
        let outcome = session
            .submit_current("docs: update installation guide")
            .unwrap();
        assert_eq!(outcome.exercise_id, "docs-readme");
        assert!(outcome.newly_locked);
    }

    #[test]
    fn jump_to_known_and_unknown() {
        let mut session = Session::new(specs()).unwrap();
        assert_eq!(session.jump_to("api-break"), Ok(2));
        assert!(session.jump_to("missing").is_err());
        assert_eq!(session.state().cursor, 2);
    }

    #[test]
    fn progress_counts_locked_exercises() {
        let mut session = Session::new(specs()).unwrap();
        session.submit("feat-auth", PERFECT_AUTH).unwrap();
        session.submit("docs-readme", "docs: nope").unwrap();
        let pct = session.progress_percent();
        assert!((pct - 100.0 / 3.0).abs() < 1e-9, "got {pct}");
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = Session::new(specs()).unwrap();
        session.submit("feat-auth", PERFECT_AUTH).unwrap();
        session.next();
        session.reset();
        assert_eq!(session.state(), &SessionState::default());
        assert_eq!(session.status("feat-auth"), ExerciseStatus::Unattempted);

        let outcome = session.submit("feat-auth", PERFECT_AUTH).unwrap();
        assert_eq!(outcome.score_awarded, 8);
        assert_eq!(session.state().total_score, 8);
    }

    #[test]
    fn identical_sequences_give_identical_state() {
        let inputs = [
            ("feat-auth", "feat: add"),
            ("feat-auth", ""),
            ("api-break", "feat(api): remove deprecated endpoints"),
            ("api-break", "feat(api)!: remove deprecated endpoints"),
            ("api-break", "feat(api)!: remove deprecated endpoints"),
        ];
        let run = || {
            let mut session = Session::new(specs()).unwrap();
            for (id, raw) in inputs {
                let _ = session.submit(id, raw);
            }
            session.state().clone()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn snapshot_reports_every_exercise() {
        let mut session = Session::new(specs()).unwrap();
        session.submit("feat-auth", PERFECT_AUTH).unwrap();
        session.submit("api-break", "feat(api): remove deprecated endpoints").unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.exercise_count, 3);
        assert_eq!(snap.locked_count, 1);
        assert_eq!(snap.total_score, 8);
        assert_eq!(snap.max_score, 24);
        assert_eq!(snap.total_attempts, 2);

        assert_eq!(snap.exercises[0].status, ExerciseStatus::Locked);
        assert_eq!(snap.exercises[1].status, ExerciseStatus::Unattempted);
        assert_eq!(snap.exercises[1].attempts_remaining, MAX_ATTEMPTS);
        assert_eq!(snap.exercises[2].status, ExerciseStatus::InProgress);
        assert_eq!(snap.exercises[2].last_score, Some(7));
        assert_eq!(snap.exercises[2].attempts_remaining, MAX_ATTEMPTS - 1);
    }
}

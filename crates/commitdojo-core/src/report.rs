//! Session report types with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::exercise::ExerciseStatus;
use crate::model::ExerciseSet;
use crate::session::{Session, SessionSnapshot};

/// A finished (or abandoned) practice session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session identifier, shared with the attempt records.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the exercise set.
    pub exercise_set: ExerciseSetSummary,
    /// Learner name from configuration.
    #[serde(default)]
    pub learner: Option<String>,
    /// Final session numbers.
    pub snapshot: SessionSnapshot,
    /// Per-exercise detail in presentation order.
    pub exercises: Vec<ExerciseSummary>,
}

/// Summary of an exercise set (without the answer keys).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSetSummary {
    pub id: String,
    pub name: String,
    pub exercise_count: usize,
}

/// Outcome of one exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSummary {
    pub id: String,
    pub title: String,
    pub status: ExerciseStatus,
    pub attempt_count: u32,
    pub last_score: Option<u8>,
    /// Feedback from the most recent graded attempt.
    #[serde(default)]
    pub last_feedback: Vec<String>,
}

impl SessionReport {
    /// Build a report from a session and the set it was started from.
    pub fn from_session(
        id: Uuid,
        set: &ExerciseSet,
        session: &Session,
        learner: Option<String>,
    ) -> Self {
        let exercises = set
            .exercises
            .iter()
            .map(|ex| {
                let state = session.exercise(&ex.id);
                ExerciseSummary {
                    id: ex.id.clone(),
                    title: ex.title.clone(),
                    status: session.status(&ex.id),
                    attempt_count: state.map(|s| s.attempt_count).unwrap_or(0),
                    last_score: state
                        .and_then(|s| s.last_grade.as_ref())
                        .map(|g| g.total_score),
                    last_feedback: state
                        .and_then(|s| s.last_grade.as_ref())
                        .map(|g| g.feedback().into_iter().map(String::from).collect())
                        .unwrap_or_default(),
                }
            })
            .collect();

        Self {
            id,
            created_at: Utc::now(),
            exercise_set: ExerciseSetSummary {
                id: set.id.clone(),
                name: set.name.clone(),
                exercise_count: set.exercises.len(),
            },
            learner,
            snapshot: session.snapshot(),
            exercises,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let snap = &self.snapshot;
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.exercise_set.name));
        if let Some(learner) = &self.learner {
            md.push_str(&format!("Learner: {learner}\n\n"));
        }
        md.push_str(&format!(
            "**Summary:** {}/{} points, {} of {} solved ({:.0}%), {} attempts\n\n",
            snap.total_score,
            snap.max_score,
            snap.locked_count,
            snap.exercise_count,
            snap.progress_percent,
            snap.total_attempts
        ));

        if !self.exercises.is_empty() {
            md.push_str("| Exercise | Status | Attempts | Last score |\n");
            md.push_str("|----------|--------|----------|------------|\n");
            for ex in &self.exercises {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    ex.title,
                    status_label(ex.status),
                    ex.attempt_count,
                    ex.last_score
                        .map(|s| format!("{s}/8"))
                        .unwrap_or_else(|| "-".into())
                ));
            }
        }

        md
    }
}

/// Short label for an exercise status.
pub fn status_label(status: ExerciseStatus) -> &'static str {
    match status {
        ExerciseStatus::Unattempted => "not started",
        ExerciseStatus::InProgress => "in progress",
        ExerciseStatus::Locked => "solved",
    }
}

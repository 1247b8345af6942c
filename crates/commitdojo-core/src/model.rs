//! Core data model types for commitdojo.
//!
//! These are the types the grading engine, the session, and every
//! collaborator share: answer keys, parsed commits, and grades.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The answer key for one exercise.
///
/// Values are stored lowercase because the grammar parser lowercases the
/// learner's input before matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSpecification {
    /// Exercise this answer belongs to.
    pub exercise_id: String,
    /// Expected commit type (e.g. "feat").
    pub expected_type: String,
    /// Expected scope, `None` when the commit should carry no scope.
    #[serde(default)]
    pub expected_scope: Option<String>,
    /// Reference description the learner's wording is matched against.
    pub expected_description: String,
    /// Whether the commit must carry the `!` breaking-change marker.
    #[serde(default)]
    pub breaking_change: bool,
}

impl CommitSpecification {
    pub fn new(
        exercise_id: impl Into<String>,
        expected_type: &str,
        expected_scope: Option<&str>,
        expected_description: &str,
        breaking_change: bool,
    ) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            expected_type: expected_type.trim().to_lowercase(),
            expected_scope: expected_scope
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
            expected_description: expected_description.trim().to_lowercase(),
            breaking_change,
        }
    }

    /// The header a fully correct answer would use, e.g. `feat(auth)!: add login`.
    pub fn canonical_header(&self) -> String {
        let mut header = self.expected_type.clone();
        if let Some(scope) = &self.expected_scope {
            header.push('(');
            header.push_str(scope);
            header.push(')');
        }
        if self.breaking_change {
            header.push('!');
        }
        header.push_str(": ");
        header.push_str(&self.expected_description);
        header
    }
}

/// A commit header that matched the grammar. All fields are lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedCommit {
    /// Commit type token.
    #[serde(rename = "type")]
    pub commit_type: String,
    /// Scope between parentheses, if present.
    pub scope: Option<String>,
    /// Whether `!` appeared immediately before the colon.
    pub breaking: bool,
    /// Everything after the colon, trimmed.
    pub description: String,
}

/// One graded dimension of a commit header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Type,
    Scope,
    Description,
    Breaking,
}

impl Dimension {
    /// All dimensions in grading order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Type,
        Dimension::Scope,
        Dimension::Description,
        Dimension::Breaking,
    ];

    /// Points awarded when this dimension passes.
    pub fn max_points(self) -> u8 {
        match self {
            Dimension::Type => 2,
            Dimension::Scope => 2,
            Dimension::Description => 3,
            Dimension::Breaking => 1,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Type => write!(f, "type"),
            Dimension::Scope => write!(f, "scope"),
            Dimension::Description => write!(f, "description"),
            Dimension::Breaking => write!(f, "breaking"),
        }
    }
}

/// Outcome of a single field grader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldScore {
    /// Which dimension this score is for.
    pub dimension: Dimension,
    /// Whether the dimension matched the answer key.
    pub passed: bool,
    /// Points earned (0 on failure).
    pub points: u8,
    /// Human-readable feedback for the learner.
    pub message: String,
}

impl FieldScore {
    pub fn pass(dimension: Dimension, message: impl Into<String>) -> Self {
        Self {
            dimension,
            passed: true,
            points: dimension.max_points(),
            message: message.into(),
        }
    }

    pub fn fail(dimension: Dimension, message: impl Into<String>) -> Self {
        Self {
            dimension,
            passed: false,
            points: 0,
            message: message.into(),
        }
    }
}

/// The full grade for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResult {
    /// Scores in `Dimension::ALL` order.
    pub field_scores: [FieldScore; 4],
    /// Sum of points over passing dimensions (0..=8).
    pub total_score: u8,
    /// Parse succeeded and every dimension passed.
    pub is_perfect: bool,
    /// The parsed header, `None` when the input was malformed.
    pub parsed: Option<ParsedCommit>,
}

impl GradeResult {
    /// Highest score a single submission can earn.
    pub const MAX_SCORE: u8 = 8;

    /// Build a grade from four field scores and the parsed header.
    pub fn from_scores(field_scores: [FieldScore; 4], parsed: Option<ParsedCommit>) -> Self {
        let total_score = field_scores.iter().map(|s| s.points).sum();
        let is_perfect = parsed.is_some() && field_scores.iter().all(|s| s.passed);
        Self {
            field_scores,
            total_score,
            is_perfect,
            parsed,
        }
    }

    /// The parse error behind this grade, if the header was malformed.
    pub fn parse_error(&self) -> Option<ParseError> {
        match self.parsed {
            Some(_) => None,
            None => Some(ParseError::MalformedFormat),
        }
    }

    /// The score for one dimension.
    pub fn score_for(&self, dimension: Dimension) -> &FieldScore {
        let idx = match dimension {
            Dimension::Type => 0,
            Dimension::Scope => 1,
            Dimension::Description => 2,
            Dimension::Breaking => 3,
        };
        &self.field_scores[idx]
    }

    /// Feedback messages, one per dimension.
    pub fn feedback(&self) -> Vec<&str> {
        self.field_scores.iter().map(|s| s.message.as_str()).collect()
    }
}

/// A single practice exercise as authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier within its set.
    pub id: String,
    /// Short title.
    pub title: String,
    /// The change the learner has to describe.
    #[serde(default)]
    pub scenario: String,
    /// Optional hint shown on request.
    #[serde(default)]
    pub hint: Option<String>,
    /// Tags for filtering.
    #[serde(default)]
    pub tags: Vec<String>,
    /// The answer key.
    pub answer: CommitSpecification,
}

/// An ordered collection of exercises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSet {
    /// Unique identifier for this set.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this set.
    #[serde(default)]
    pub description: String,
    /// Exercises in presentation order.
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl ExerciseSet {
    /// Look up an exercise by id.
    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Answer keys in presentation order.
    pub fn specifications(&self) -> Vec<CommitSpecification> {
        self.exercises.iter().map(|e| e.answer.clone()).collect()
    }
}

//! TOML exercise set parser.
//!
//! Loads exercise sets from TOML files and directories, and validates them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::grading::required_keywords;
use crate::model::{CommitSpecification, Exercise, ExerciseSet};

/// Commit types from the Conventional Commits and Angular conventions.
pub const STANDARD_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

/// Intermediate TOML structure for parsing exercise set files.
#[derive(Debug, Deserialize)]
struct TomlExerciseFile {
    exercise_set: TomlExerciseSetHeader,
    #[serde(default)]
    exercises: Vec<TomlExercise>,
}

#[derive(Debug, Deserialize)]
struct TomlExerciseSetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlExercise {
    id: String,
    title: String,
    #[serde(default)]
    scenario: String,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    answer: TomlAnswer,
}

#[derive(Debug, Deserialize)]
struct TomlAnswer {
    #[serde(rename = "type")]
    commit_type: String,
    #[serde(default)]
    scope: Option<String>,
    description: String,
    #[serde(default)]
    breaking: bool,
}

/// Parse a single TOML file into an `ExerciseSet`.
pub fn parse_exercise_set(path: &Path) -> Result<ExerciseSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exercise set file: {}", path.display()))?;

    parse_exercise_set_str(&content, path)
}

/// Parse a TOML string into an `ExerciseSet`. Fails when two exercises share an id.
pub fn parse_exercise_set_str(content: &str, source_path: &Path) -> Result<ExerciseSet> {
    let parsed: TomlExerciseFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let exercises = parsed
        .exercises
        .into_iter()
        .map(|e| {
            let answer = CommitSpecification::new(
                e.id.clone(),
                &e.answer.commit_type,
                e.answer.scope.as_deref(),
                &e.answer.description,
                e.answer.breaking,
            );
            Exercise {
                id: e.id,
                title: e.title,
                scenario: e.scenario,
                hint: e.hint,
                tags: e.tags,
                answer,
            }
        })
        .collect::<Vec<_>>();

    let mut seen_ids = std::collections::HashSet::new();
    if let Some(dup) = exercises.iter().find(|e| !seen_ids.insert(e.id.as_str())) {
        anyhow::bail!(
            "duplicate exercise ID: {} in {}",
            dup.id,
            source_path.display()
        );
    }

    Ok(ExerciseSet {
        id: parsed.exercise_set.id,
        name: parsed.exercise_set.name,
        description: parsed.exercise_set.description,
        exercises,
    })
}

/// Parse a file, or every `.toml` file under a directory.
pub fn load_exercise_path(path: &Path) -> Result<Vec<ExerciseSet>> {
    if path.is_dir() {
        load_exercise_directory(path)
    } else {
        Ok(vec![parse_exercise_set(path)?])
    }
}

/// Recursively load all `.toml` exercise set files from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_exercise_directory(dir: &Path) -> Result<Vec<ExerciseSet>> {
    let mut sets = Vec::new();

    for path in collect_toml_files(dir)? {
        match parse_exercise_set(&path) {
            Ok(set) => sets.push(set),
            Err(e) => {
                tracing::warn!("skipping {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(sets)
}

/// Every `.toml` file under `dir`, recursively, in path order.
pub fn collect_toml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            files.extend(collect_toml_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }

    Ok(files)
}

/// A warning from exercise set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The exercise ID (if applicable).
    pub exercise_id: Option<String>,
    /// Warning message.
    pub message: String,
}

fn has_uppercase(s: &str) -> bool {
    s.chars().any(char::is_uppercase)
}

/// Validate an exercise set for common authoring mistakes.
pub fn validate_exercise_set(set: &ExerciseSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.exercises.is_empty() {
        warnings.push(ValidationWarning {
            exercise_id: None,
            message: "exercise set has no exercises".into(),
        });
    }

    // Check for duplicate exercise IDs
    let mut seen_ids = std::collections::HashSet::new();
    for exercise in &set.exercises {
        if !seen_ids.insert(&exercise.id) {
            warnings.push(ValidationWarning {
                exercise_id: Some(exercise.id.clone()),
                message: format!("duplicate exercise ID: {}", exercise.id),
            });
        }
    }

    for exercise in &set.exercises {
        let answer = &exercise.answer;
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                exercise_id: Some(exercise.id.clone()),
                message,
            });
        };

        if exercise.scenario.trim().is_empty() {
            warn("scenario is empty".into());
        }

        if answer.expected_description.is_empty() {
            warn("answer description is empty".into());
        } else if required_keywords(&answer.expected_description).is_empty() {
            warn("answer description has no word longer than 2 characters, any description will pass".into());
        }

        if answer.expected_type.is_empty()
            || !answer
                .expected_type
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            warn(format!(
                "answer type '{}' can never be matched, use a single word",
                answer.expected_type
            ));
        } else if !STANDARD_TYPES.contains(&answer.expected_type.as_str()) {
            warn(format!(
                "answer type '{}' is not a standard commit type",
                answer.expected_type
            ));
        }

        if let Some(scope) = &answer.expected_scope {
            if scope.contains(')') {
                warn(format!("answer scope '{scope}' can never be matched"));
            }
        }
    }

    warnings
}

/// Validate TOML text, including checks that only make sense before answer
/// keys are lowercased.
pub fn validate_exercise_set_str(content: &str, source_path: &Path) -> Result<Vec<ValidationWarning>> {
    let set = parse_exercise_set_str(content, source_path)?;
    let mut warnings = validate_exercise_set(&set);

    let raw: TomlExerciseFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    for e in &raw.exercises {
        let a = &e.answer;
        if has_uppercase(&a.commit_type)
            || a.scope.as_deref().is_some_and(has_uppercase)
            || has_uppercase(&a.description)
        {
            warnings.push(ValidationWarning {
                exercise_id: Some(e.id.clone()),
                message: "answer contains uppercase letters, it is compared in lowercase".into(),
            });
        }
    }

    Ok(warnings)
}

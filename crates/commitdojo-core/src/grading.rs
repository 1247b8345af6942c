//! Field graders and the combined grading function.
//!
//! Every function here is pure: the same answer key and input always
//! produce the same [`GradeResult`].

use crate::grammar;
use crate::model::{CommitSpecification, Dimension, FieldScore, GradeResult, ParsedCommit};

/// Share of required description words a learner must match.
pub const DESCRIPTION_MATCH_RATIO: f64 = 0.6;

/// Expected-description words at or below this length are ignored.
pub const MIN_KEYWORD_LEN: usize = 2;

/// Parse and grade a raw submission against an answer key.
pub fn grade(spec: &CommitSpecification, raw: &str) -> GradeResult {
    match grammar::parse(raw) {
        Ok(parsed) => grade_parsed(&parsed, spec),
        Err(_) => malformed(),
    }
}

/// Grade a header that already parsed.
pub fn grade_parsed(parsed: &ParsedCommit, spec: &CommitSpecification) -> GradeResult {
    GradeResult::from_scores(
        [
            grade_type(parsed, spec),
            grade_scope(parsed, spec),
            grade_description(parsed, spec),
            grade_breaking(parsed, spec),
        ],
        Some(parsed.clone()),
    )
}

fn malformed() -> GradeResult {
    GradeResult::from_scores(
        [
            FieldScore::fail(Dimension::Type, "✗ Missing type: use the form type(scope): description"),
            FieldScore::fail(Dimension::Scope, "✗ Missing scope: could not read a scope from the header"),
            FieldScore::fail(Dimension::Description, "✗ Missing description after the colon"),
            FieldScore::fail(Dimension::Breaking, "✗ Breaking-change marker could not be checked"),
        ],
        None,
    )
}

/// Type grader (2 points).
pub fn grade_type(parsed: &ParsedCommit, spec: &CommitSpecification) -> FieldScore {
    if parsed.commit_type == spec.expected_type {
        FieldScore::pass(Dimension::Type, format!("✓ Correct type: {}", parsed.commit_type))
    } else {
        FieldScore::fail(
            Dimension::Type,
            format!(
                "✗ Type '{}' does not fit this change, expected '{}'",
                parsed.commit_type, spec.expected_type
            ),
        )
    }
}

/// Scope grader (2 points). No scope on either side counts as a match.
pub fn grade_scope(parsed: &ParsedCommit, spec: &CommitSpecification) -> FieldScore {
    match (&parsed.scope, &spec.expected_scope) {
        (Some(got), Some(want)) if got == want => {
            FieldScore::pass(Dimension::Scope, format!("✓ Correct scope: {got}"))
        }
        (None, None) => FieldScore::pass(Dimension::Scope, "✓ Correctly left out the scope"),
        (Some(got), Some(want)) => FieldScore::fail(
            Dimension::Scope,
            format!("✗ Scope '{got}' is not right, expected '{want}'"),
        ),
        (None, Some(want)) => {
            FieldScore::fail(Dimension::Scope, format!("✗ Missing scope, expected '{want}'"))
        }
        (Some(got), None) => FieldScore::fail(
            Dimension::Scope,
            format!("✗ Unexpected scope '{got}', this change needs no scope"),
        ),
    }
}

/// Words of the expected description that the learner has to cover.
pub fn required_keywords(expected_description: &str) -> Vec<&str> {
    expected_description
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_LEN)
        .collect()
}

/// Minimum number of keywords to match out of `required`.
pub fn keyword_threshold(required: usize) -> usize {
    (required as f64 * DESCRIPTION_MATCH_RATIO).ceil() as usize
}

/// Count required keywords contained in some word of `description`.
///
/// The learner's word must contain the keyword, not the other way round:
/// "authentication" covers "auth", but "auth" does not cover "authentication".
pub fn matched_keywords(description: &str, required: &[&str]) -> usize {
    let words: Vec<&str> = description.split_whitespace().collect();
    required
        .iter()
        .filter(|keyword| words.iter().any(|w| w.contains(*keyword)))
        .count()
}

/// Description grader (3 points, fuzzy).
pub fn grade_description(parsed: &ParsedCommit, spec: &CommitSpecification) -> FieldScore {
    let required = required_keywords(&spec.expected_description);
    let needed = keyword_threshold(required.len());
    let matched = matched_keywords(&parsed.description, &required);

    if matched >= needed {
        FieldScore::pass(
            Dimension::Description,
            format!(
                "✓ Description covers the change ({matched} of {} key words)",
                required.len()
            ),
        )
    } else {
        FieldScore::fail(
            Dimension::Description,
            format!(
                "✗ Description is missing key words ({matched} of {} matched, {needed} needed)",
                required.len()
            ),
        )
    }
}

/// Breaking-change grader (1 point).
pub fn grade_breaking(parsed: &ParsedCommit, spec: &CommitSpecification) -> FieldScore {
    match (parsed.breaking, spec.breaking_change) {
        (true, true) => FieldScore::pass(Dimension::Breaking, "✓ Breaking change marked with '!'"),
        (false, false) => FieldScore::pass(Dimension::Breaking, "✓ Correctly not marked as breaking"),
        (false, true) => FieldScore::fail(
            Dimension::Breaking,
            "✗ This is a breaking change, add '!' before the colon",
        ),
        (true, false) => FieldScore::fail(
            Dimension::Breaking,
            "✗ This change is not breaking, remove the '!'",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    fn auth_spec() -> CommitSpecification {
        CommitSpecification::new(
            "feat-auth",
            "feat",
            Some("auth"),
            "add user authentication system",
            false,
        )
    }

    #[test]
    fn perfect_submission_scores_eight() {
        let grade = grade(&auth_spec(), "feat(auth): add user authentication system");
        assert!(grade.is_perfect);
        assert_eq!(grade.total_score, 8);
        assert!(grade.field_scores.iter().all(|s| s.passed));
        assert!(grade.parse_error().is_none());
    }

    #[test]
    fn wrong_type_and_partial_description() {
        let grade = grade(&auth_spec(), "feet(auth): add user auth");
        assert!(!grade.is_perfect);
        assert!(!grade.score_for(Dimension::Type).passed);
        assert!(grade.score_for(Dimension::Scope).passed);
        assert!(!grade.score_for(Dimension::Description).passed);
        assert!(grade.score_for(Dimension::Breaking).passed);
        assert_eq!(grade.total_score, 3);
    }

    #[test]
    fn malformed_input_fails_every_dimension() {
        let grade = grade(&auth_spec(), "just some text");
        assert_eq!(grade.parse_error(), Some(ParseError::MalformedFormat));
        assert!(grade.field_scores.iter().all(|s| !s.passed && s.points == 0));
        assert_eq!(grade.total_score, 0);
        assert!(!grade.is_perfect);
        assert!(grade.feedback().iter().any(|m| m.contains("Missing type")));
        assert!(grade.feedback().iter().any(|m| m.contains("Missing scope")));
        assert!(grade.feedback().iter().any(|m| m.contains("Missing description")));
    }

    #[test]
    fn grading_is_case_insensitive() {
        let grade = grade(&auth_spec(), "FEAT(AUTH): Add User Authentication System");
        assert!(grade.is_perfect);
    }

    #[test]
    fn grading_is_pure() {
        let spec = auth_spec();
        for input in ["feat(auth): add user auth", "nope", "fix!: add system"] {
            assert_eq!(grade(&spec, input), grade(&spec, input));
        }
    }

    #[test]
    fn required_keywords_skip_short_words() {
        assert_eq!(
            required_keywords("fix a bug in the api of it"),
            vec!["fix", "bug", "the", "api"]
        );
        assert!(required_keywords("a to be").is_empty());
    }

    #[test]
    fn threshold_rounds_up() {
        assert_eq!(keyword_threshold(0), 0);
        assert_eq!(keyword_threshold(1), 1);
        assert_eq!(keyword_threshold(2), 2);
        assert_eq!(keyword_threshold(3), 2);
        assert_eq!(keyword_threshold(4), 3);
        assert_eq!(keyword_threshold(5), 3);
        assert_eq!(keyword_threshold(10), 6);
    }

    #[test]
    fn containment_is_directional() {
        let required = ["auth"];
        assert_eq!(matched_keywords("add authentication", &required), 1);
        let required = ["authentication"];
        assert_eq!(matched_keywords("add auth", &required), 0);
    }

    #[test]
    fn description_passes_at_threshold() {
        let spec = auth_spec();
        // three of four keywords
        let three = grade(&spec, "feat(auth): add user authentication");
        assert!(three.score_for(Dimension::Description).passed);
        // two of four keywords
        let two = grade(&spec, "feat(auth): add authentication");
        assert!(!two.score_for(Dimension::Description).passed);
    }

    #[test]
    fn description_without_keywords_always_passes() {
        let spec = CommitSpecification::new("ex", "fix", None, "do it", false);
        let grade = grade(&spec, "fix: whatever");
        assert!(grade.score_for(Dimension::Description).passed);
        assert!(grade.is_perfect);
    }

    #[test]
    fn scope_combinations() {
        let scoped = auth_spec();
        let unscoped = CommitSpecification::new("ex", "feat", None, "add user authentication system", false);

        assert!(!grade(&scoped, "feat: add user authentication system").score_for(Dimension::Scope).passed);
        assert!(!grade(&scoped, "feat(api): add user authentication system").score_for(Dimension::Scope).passed);
        assert!(grade(&unscoped, "feat: add user authentication system").score_for(Dimension::Scope).passed);
        let extra = grade(&unscoped, "feat(auth): add user authentication system");
        assert!(!extra.score_for(Dimension::Scope).passed);
        assert!(extra.score_for(Dimension::Scope).message.contains("Unexpected scope"));
    }

    #[test]
    fn breaking_marker_must_match_answer() {
        let breaking = CommitSpecification::new("ex", "feat", Some("api"), "remove v1 endpoints", true);

        let marked = grade(&breaking, "feat(api)!: remove v1 endpoints");
        assert!(marked.is_perfect);

        let unmarked = grade(&breaking, "feat(api): remove v1 endpoints");
        assert!(!unmarked.score_for(Dimension::Breaking).passed);
        assert_eq!(unmarked.total_score, 7);

        let spurious = grade(&auth_spec(), "feat(auth)!: add user authentication system");
        assert!(!spurious.score_for(Dimension::Breaking).passed);
        assert!(!spurious.is_perfect);
    }
}

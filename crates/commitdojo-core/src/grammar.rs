//! Conventional commit header grammar.
//!
//! Only the first line of a submission is parsed. The line is lowercased
//! before matching, so every later comparison is case-insensitive.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ParseError;
use crate::model::ParsedCommit;

static HEADER_RE: OnceLock<Regex> = OnceLock::new();

fn header_re() -> &'static Regex {
    HEADER_RE.get_or_init(|| {
        Regex::new(r"^([a-z0-9_]+)(?:\(([^)]+)\))?(!)?:\s*(.+)$")
            .expect("commit header pattern is valid")
    })
}

/// The first line of `raw`, with a trailing `\r` and trailing whitespace removed.
///
/// Leading whitespace is kept, so an indented header does not match the grammar.
pub fn first_line(raw: &str) -> &str {
    raw.split('\n').next().unwrap_or_default().trim_end()
}

/// Parse the header line of a commit message.
///
/// Grammar: `type(scope)!: description`, where `(scope)` and `!` are optional.
/// A mismatch yields [`ParseError::MalformedFormat`] with nothing extracted.
pub fn parse(raw: &str) -> Result<ParsedCommit, ParseError> {
    let line = first_line(raw).to_lowercase();
    let caps = header_re()
        .captures(&line)
        .ok_or(ParseError::MalformedFormat)?;

    let commit_type = caps
        .get(1)
        .map(|m| m.as_str().to_string())
        .ok_or(ParseError::MalformedFormat)?;
    let scope = caps.get(2).map(|m| m.as_str().to_string());
    let breaking = caps.get(3).is_some();
    let description = caps
        .get(4)
        .map(|m| m.as_str().trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or(ParseError::MalformedFormat)?;

    Ok(ParsedCommit {
        commit_type,
        scope,
        breaking,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_header() {
        let parsed = parse("feat(auth)!: drop legacy tokens").unwrap();
        assert_eq!(parsed.commit_type, "feat");
        assert_eq!(parsed.scope.as_deref(), Some("auth"));
        assert!(parsed.breaking);
        assert_eq!(parsed.description, "drop legacy tokens");
    }

    #[test]
    fn scope_and_marker_are_optional() {
        let parsed = parse("fix: handle empty cart").unwrap();
        assert_eq!(parsed.commit_type, "fix");
        assert_eq!(parsed.scope, None);
        assert!(!parsed.breaking);
        assert_eq!(parsed.description, "handle empty cart");
    }

    #[test]
    fn lowercases_everything() {
        let parsed = parse("FEAT(Auth): Add User Login").unwrap();
        assert_eq!(parsed.commit_type, "feat");
        assert_eq!(parsed.scope.as_deref(), Some("auth"));
        assert_eq!(parsed.description, "add user login");
    }

    #[test]
    fn whitespace_after_colon_is_optional() {
        let parsed = parse("docs:update readme").unwrap();
        assert_eq!(parsed.description, "update readme");
    }

    #[test]
    fn only_first_line_is_parsed() {
        let parsed = parse("chore(deps): bump serde\r\n\nThis body mentions feat: stuff").unwrap();
        assert_eq!(parsed.commit_type, "chore");
        assert_eq!(parsed.description, "bump serde");
    }

    #[test]
    fn malformed_inputs() {
        for input in [
            "just some text",
            "feat add login",
            "feat(): empty scope",
            "feat(auth: unclosed scope",
            "feat:",
            "feat:   ",
            ": no type",
            "feat !: space before marker",
            "",
            "\nfeat: on second line",
        ] {
            assert_eq!(
                parse(input),
                Err(ParseError::MalformedFormat),
                "expected {input:?} to be malformed"
            );
        }
    }

    #[test]
    fn marker_must_precede_colon() {
        let parsed = parse("refactor!: rename module").unwrap();
        assert!(parsed.breaking);
        assert_eq!(parse("refactor:! rename").unwrap().description, "! rename");
    }

    #[test]
    fn trailing_whitespace_is_ignored() {
        let parsed = parse("test(parser): cover edge cases   \r\n").unwrap();
        assert_eq!(parsed.commit_type, "test");
        assert_eq!(parsed.description, "cover edge cases");
    }

    #[test]
    fn leading_whitespace_is_malformed() {
        assert_eq!(
            parse("   feat(auth): add login"),
            Err(ParseError::MalformedFormat)
        );
        assert_eq!(parse("\tfix: typo"), Err(ParseError::MalformedFormat));
        assert_eq!(first_line("  docs: readme  \nbody"), "  docs: readme");
    }
}

//! Advisory style notes for a commit header.
//!
//! Hints look at the raw text as typed (before lowercasing) and never affect
//! a grade.

use crate::grammar::first_line;

/// Headers longer than this are hard to read in `git log --oneline`.
pub const MAX_HEADER_LEN: usize = 72;

/// Style notes for the first line of `raw`. Empty when nothing stands out.
pub fn header_hints(raw: &str) -> Vec<String> {
    let header = first_line(raw);
    let mut hints = Vec::new();
    if header.is_empty() {
        return hints;
    }

    let len = header.chars().count();
    if len > MAX_HEADER_LEN {
        hints.push(format!(
            "header is {len} characters, keep it within {MAX_HEADER_LEN}"
        ));
    }

    if let Some((_, description)) = header.split_once(':') {
        let description = description.trim();
        if description.chars().next().is_some_and(char::is_uppercase) {
            hints.push("start the description with a lowercase letter".into());
        }
        if description.ends_with('.') {
            hints.push("drop the trailing period from the description".into());
        }
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_header_has_no_hints() {
        assert!(header_hints("feat(auth): add login").is_empty());
        assert!(header_hints("").is_empty());
    }

    #[test]
    fn long_header() {
        let raw = format!("feat: {}", "x".repeat(80));
        let hints = header_hints(&raw);
        assert_eq!(hints.len(), 1);
        assert!(hints[0].contains("86 characters"));
    }

    #[test]
    fn capitalized_description_with_period() {
        let hints = header_hints("fix: Correct the total.");
        assert_eq!(hints.len(), 2);
    }

    #[test]
    fn body_is_ignored() {
        let hints = header_hints("fix: correct totals\n\nThis Body Ends With A Period.");
        assert!(hints.is_empty());
    }
}

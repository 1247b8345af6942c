//! The `commitdojo init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create commitdojo.toml
    if std::path::Path::new("commitdojo.toml").exists() {
        println!("commitdojo.toml already exists, skipping.");
    } else {
        std::fs::write("commitdojo.toml", SAMPLE_CONFIG)?;
        println!("Created commitdojo.toml");
    }

    // Create example exercise set
    std::fs::create_dir_all("exercises")?;
    let example_path = std::path::Path::new("exercises/example.toml");
    if example_path.exists() {
        println!("exercises/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_EXERCISE_SET)?;
        println!("Created exercises/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: commitdojo validate --exercise-set exercises/example.toml");
    println!("  2. Run: commitdojo practice --exercise-set exercises/example.toml");
    println!("  3. Optionally configure a recorder in commitdojo.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# commitdojo configuration

exercises_dir = "./exercises"
output_dir = "./commitdojo-results"
# learner = "your-name"
recorder_timeout_ms = 2000

# Where graded attempts are sent. One of: none, jsonl, http.
[recorder]
type = "none"

# [recorder]
# type = "jsonl"
# path = "./commitdojo-results/attempts.jsonl"

# [recorder]
# type = "http"
# base_url = "https://example.com/api"
# api_key = "${COMMITDOJO_API_KEY}"
"#;

const EXAMPLE_EXERCISE_SET: &str = r#"[exercise_set]
id = "example"
name = "Example Exercises"
description = "Two exercises to get started"

[[exercises]]
id = "feat-login"
title = "Login form"
scenario = "You added a login form to the web client."
hint = "New functionality is a feat. The change lives in the ui module."
tags = ["feat"]

[exercises.answer]
type = "feat"
scope = "ui"
description = "add login form"

[[exercises]]
id = "fix-typo"
title = "Typo in the README"
scenario = "You fixed a spelling mistake in the README."
tags = ["docs"]

[exercises.answer]
type = "docs"
description = "fix typo in readme"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn templates_are_valid() {
        let set = commitdojo_core::parser::parse_exercise_set_str(
            EXAMPLE_EXERCISE_SET,
            Path::new("example.toml"),
        )
        .unwrap();
        assert_eq!(set.exercises.len(), 2);
        assert!(commitdojo_core::parser::validate_exercise_set(&set).is_empty());

        let config = commitdojo_recorder::parse_config_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.recorder, commitdojo_recorder::RecorderConfig::None);
        assert_eq!(config.recorder_timeout_ms, 2000);
    }
}

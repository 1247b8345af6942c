//! The `commitdojo validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use commitdojo_core::parser;

pub fn execute(exercise_set_path: PathBuf) -> Result<()> {
    let files = if exercise_set_path.is_dir() {
        parser::collect_toml_files(&exercise_set_path)?
    } else {
        vec![exercise_set_path]
    };

    let mut total_warnings = 0;

    for file in &files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read exercise set file: {}", file.display()))?;
        let set = parser::parse_exercise_set_str(&content, file)?;
        println!(
            "Exercise set: {} ({} exercises)",
            set.name,
            set.exercises.len()
        );

        let warnings = parser::validate_exercise_set_str(&content, file)?;
        for w in &warnings {
            let prefix = w
                .exercise_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All exercise sets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

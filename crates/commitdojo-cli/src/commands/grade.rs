//! The `commitdojo grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use commitdojo_core::hints::header_hints;
use commitdojo_core::model::GradeResult;
use commitdojo_core::parser::parse_exercise_set;

use super::format_grade;

#[derive(Serialize)]
struct GradeOutput<'a> {
    exercise_id: &'a str,
    grade: &'a GradeResult,
    hints: Vec<String>,
}

pub fn execute(
    exercise_set_path: PathBuf,
    exercise_id: String,
    message: String,
    format: String,
    fail_on_imperfect: bool,
) -> Result<()> {
    let set = parse_exercise_set(&exercise_set_path)?;
    let exercise = set.get(&exercise_id).with_context(|| {
        format!(
            "exercise '{exercise_id}' not found in {}",
            exercise_set_path.display()
        )
    })?;
    anyhow::ensure!(!message.trim().is_empty(), "commit message is empty");

    let grade = commitdojo_core::grade(&exercise.answer, &message);
    let hints = header_hints(&message);

    match format.as_str() {
        "json" => {
            let output = GradeOutput {
                exercise_id: &exercise.id,
                grade: &grade,
                hints,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!("{}: {}", exercise.id, exercise.title);
            print!("{}", format_grade(&grade));
            for hint in &hints {
                println!("  hint: {hint}");
            }
        }
    }

    if fail_on_imperfect && !grade.is_perfect {
        std::process::exit(1);
    }

    Ok(())
}

//! The `commitdojo report` command.

use std::path::PathBuf;

use anyhow::Result;

use commitdojo_core::report::{status_label, SessionReport};

pub fn execute(input: PathBuf, format: String) -> Result<()> {
    let report = SessionReport::load_json(&input)?;

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            let snap = &report.snapshot;
            println!(
                "{}: {}/{} points, {} of {} solved ({:.0}%), {} attempts",
                report.exercise_set.name,
                snap.total_score,
                snap.max_score,
                snap.locked_count,
                snap.exercise_count,
                snap.progress_percent,
                snap.total_attempts
            );
            for ex in &report.exercises {
                println!(
                    "  {:<24} {:<12} {} attempt(s)",
                    ex.id,
                    status_label(ex.status),
                    ex.attempt_count
                );
            }
        }
    }

    Ok(())
}

//! The `commitdojo list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use commitdojo_core::parser::load_exercise_path;

pub fn execute(exercise_set_path: PathBuf, tag: Option<String>) -> Result<()> {
    let sets = load_exercise_path(&exercise_set_path)?;

    for set in &sets {
        let exercises: Vec<_> = set
            .exercises
            .iter()
            .filter(|ex| tag.as_ref().is_none_or(|t| ex.tags.contains(t)))
            .collect();

        println!("{} [{}] ({} exercises)", set.name, set.id, exercises.len());
        if exercises.is_empty() {
            println!();
            continue;
        }

        let mut table = Table::new();
        table.set_header(vec!["ID", "Title", "Tags", "Breaking"]);
        for ex in exercises {
            table.add_row(vec![
                Cell::new(&ex.id),
                Cell::new(&ex.title),
                Cell::new(ex.tags.join(", ")),
                Cell::new(if ex.answer.breaking_change { "yes" } else { "" }),
            ]);
        }
        println!("{table}\n");
    }

    if sets.is_empty() {
        println!("No exercise sets found. Run `commitdojo init` to create one.");
    }

    Ok(())
}

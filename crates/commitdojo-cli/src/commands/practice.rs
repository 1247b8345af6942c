//! The `commitdojo practice` command.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use uuid::Uuid;

use commitdojo_core::exercise::{ExerciseStatus, MAX_ATTEMPTS};
use commitdojo_core::hints::header_hints;
use commitdojo_core::model::ExerciseSet;
use commitdojo_core::parser::parse_exercise_set;
use commitdojo_core::report::{status_label, SessionReport};
use commitdojo_core::session::{Session, SubmitOutcome};
use commitdojo_core::traits::{AttemptRecord, AttemptRecorder};
use commitdojo_recorder::config::load_config_from;
use commitdojo_recorder::{create_recorder, RecordDispatcher};

use super::format_grade;

const HELP: &str = "\
Commands:
  :next          go to the next exercise
  :prev          go to the previous exercise
  :goto <id>     jump to an exercise
  :hint          show the hint for this exercise
  :status        show session progress
  :reset         discard all progress
  :quit          finish and save the report
Anything else is graded as a commit message for the current exercise.";

pub async fn execute(
    exercise_set_path: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let set = parse_exercise_set(&exercise_set_path)?;
    anyhow::ensure!(
        !set.exercises.is_empty(),
        "exercise set '{}' has no exercises",
        set.id
    );

    let recorder: Arc<dyn AttemptRecorder> =
        Arc::from(create_recorder(&config.recorder, config.recorder_timeout())?);
    let dispatcher = RecordDispatcher::new(recorder, config.recorder_timeout());
    tracing::info!(
        set = %set.id,
        exercises = set.exercises.len(),
        recorder = dispatcher.recorder_name(),
        "starting practice session"
    );

    let mut practice = Practice::new(&set, &dispatcher, config.learner.clone())?;
    let mut stdout = std::io::stdout();
    practice
        .run(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await?;

    dispatcher.drain(config.recorder_timeout()).await;

    let report = SessionReport::from_session(
        practice.session_id,
        &set,
        &practice.session,
        config.learner,
    );
    let output_dir = output.unwrap_or(config.output_dir);
    let path = output_dir.join(format!("session-{}.json", report.id));
    report.save_json(&path)?;

    print_summary(&report);
    println!("Report saved to {}", path.display());

    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

/// One interactive session: reads lines, grades, and dispatches records.
struct Practice<'a> {
    set: &'a ExerciseSet,
    session: Session,
    session_id: Uuid,
    learner: Option<String>,
    dispatcher: &'a RecordDispatcher,
}

impl<'a> Practice<'a> {
    fn new(
        set: &'a ExerciseSet,
        dispatcher: &'a RecordDispatcher,
        learner: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            set,
            session: Session::from_set(set)?,
            session_id: Uuid::new_v4(),
            learner,
            dispatcher,
        })
    }

    async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(
            out,
            "{} ({} exercises). Type :help for commands.\n",
            self.set.name,
            self.set.exercises.len()
        )?;
        self.show_current(out)?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;
            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };
            if let Flow::Quit = self.handle_line(&line, out)? {
                break;
            }
        }

        Ok(())
    }

    fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let line = line.trim();
        if let Some(command) = line.strip_prefix(':') {
            return self.handle_command(command, out);
        }

        match self.session.submit_current(line) {
            Ok(outcome) => self.on_graded(line, &outcome, out)?,
            Err(e) => writeln!(out, "  ! {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn handle_command<W: Write>(&mut self, command: &str, out: &mut W) -> Result<Flow> {
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map(|(n, a)| (n, a.trim()))
            .unwrap_or((command, ""));

        match name {
            "next" | "n" => {
                self.session.next();
                self.show_current(out)?;
            }
            "prev" | "p" => {
                self.session.previous();
                self.show_current(out)?;
            }
            "goto" | "g" => match self.session.jump_to(arg) {
                Ok(_) => self.show_current(out)?,
                Err(e) => writeln!(out, "  ! {e}")?,
            },
            "hint" | "h" => {
                let hint = self
                    .session
                    .current()
                    .and_then(|spec| self.set.get(&spec.exercise_id))
                    .and_then(|ex| ex.hint.as_deref());
                match hint {
                    Some(hint) => writeln!(out, "  hint: {hint}")?,
                    None => writeln!(out, "  No hint for this exercise.")?,
                }
            }
            "status" | "s" => self.show_status(out)?,
            "reset" => {
                // A reset starts a new session, so later records get a fresh id.
                self.session.reset();
                self.session_id = Uuid::new_v4();
                writeln!(out, "  Session reset.")?;
                self.show_current(out)?;
            }
            "quit" | "q" | "exit" => return Ok(Flow::Quit),
            "help" | "?" => writeln!(out, "{HELP}")?,
            other => writeln!(out, "  Unknown command ':{other}', type :help")?,
        }

        Ok(Flow::Continue)
    }

    fn on_graded<W: Write>(&mut self, raw: &str, outcome: &SubmitOutcome, out: &mut W) -> Result<()> {
        write!(out, "{}", format_grade(&outcome.grade))?;
        for hint in header_hints(raw) {
            writeln!(out, "  hint: {hint}")?;
        }

        self.dispatcher.dispatch(AttemptRecord::from_outcome(
            self.session_id,
            self.learner.clone(),
            raw,
            outcome,
        ));

        if outcome.newly_locked {
            writeln!(out, "  Solved! +{} points.", outcome.score_awarded)?;
            if self.session.locked_count() == self.session.len() {
                writeln!(out, "  All exercises solved. Type :quit to finish.")?;
            } else {
                self.advance_to_unsolved();
                writeln!(out)?;
                self.show_current(out)?;
            }
            return Ok(());
        }

        let remaining = MAX_ATTEMPTS.saturating_sub(outcome.attempt_number);
        if remaining == 0 {
            writeln!(out, "  No attempts left for this exercise, use :next to move on.")?;
        } else {
            writeln!(out, "  {remaining} attempt(s) left.")?;
        }
        Ok(())
    }

    fn advance_to_unsolved(&mut self) {
        for _ in 0..self.session.len() {
            self.session.next();
            let unsolved = self
                .session
                .current()
                .is_some_and(|spec| self.session.status(&spec.exercise_id) != ExerciseStatus::Locked);
            if unsolved {
                break;
            }
        }
    }

    fn show_current<W: Write>(&self, out: &mut W) -> Result<()> {
        let Some(spec) = self.session.current() else {
            return Ok(());
        };
        let cursor = self.session.state().cursor;
        let attempts = self
            .session
            .exercise(&spec.exercise_id)
            .map(|e| e.attempt_count)
            .unwrap_or(0);

        match self.set.get(&spec.exercise_id) {
            Some(ex) => {
                writeln!(out, "[{}/{}] {}: {}", cursor + 1, self.session.len(), ex.id, ex.title)?;
                if !ex.scenario.is_empty() {
                    writeln!(out, "  {}", ex.scenario.trim())?;
                }
            }
            None => writeln!(out, "[{}/{}] {}", cursor + 1, self.session.len(), spec.exercise_id)?,
        }
        writeln!(
            out,
            "  Status: {}, attempts {attempts}/{MAX_ATTEMPTS}",
            status_label(self.session.status(&spec.exercise_id))
        )?;
        Ok(())
    }

    fn show_status<W: Write>(&self, out: &mut W) -> Result<()> {
        use comfy_table::{Cell, Table};

        let snap = self.session.snapshot();
        let mut table = Table::new();
        table.set_header(vec!["Exercise", "Status", "Attempts", "Last score"]);
        for ex in &snap.exercises {
            table.add_row(vec![
                Cell::new(&ex.exercise_id),
                Cell::new(status_label(ex.status)),
                Cell::new(ex.attempt_count),
                Cell::new(
                    ex.last_score
                        .map(|s| format!("{s}/8"))
                        .unwrap_or_else(|| "-".into()),
                ),
            ]);
        }
        writeln!(out, "{table}")?;
        writeln!(
            out,
            "  Score {}/{}, solved {}/{} ({:.0}%), {} attempts",
            snap.total_score,
            snap.max_score,
            snap.locked_count,
            snap.exercise_count,
            snap.progress_percent,
            snap.total_attempts
        )?;
        Ok(())
    }
}

fn print_summary(report: &SessionReport) {
    use comfy_table::{Cell, Table};

    let snap = &report.snapshot;
    let mut table = Table::new();
    table.set_header(vec!["Score", "Solved", "Progress", "Attempts"]);
    table.add_row(vec![
        Cell::new(format!("{}/{}", snap.total_score, snap.max_score)),
        Cell::new(format!("{}/{}", snap.locked_count, snap.exercise_count)),
        Cell::new(format!("{:.0}%", snap.progress_percent)),
        Cell::new(snap.total_attempts),
    ]);

    println!("\n{table}");
}

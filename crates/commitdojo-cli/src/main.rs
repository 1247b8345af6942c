//! commitdojo CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "commitdojo",
    version,
    about = "Practice writing Conventional Commit messages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive practice session
    Practice {
        /// Path to .toml exercise set
        #[arg(long)]
        exercise_set: PathBuf,

        /// Directory for the session report (defaults to the configured output_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a single commit message against one exercise
    Grade {
        /// Path to .toml exercise set
        #[arg(long)]
        exercise_set: PathBuf,

        /// Exercise ID
        #[arg(long)]
        exercise: String,

        /// Commit message to grade
        #[arg(long)]
        message: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Exit code 1 if the grade is not perfect
        #[arg(long)]
        fail_on_imperfect: bool,
    },

    /// Validate exercise set TOML files
    Validate {
        /// Path to exercise set file or directory
        #[arg(long)]
        exercise_set: PathBuf,
    },

    /// List the exercises in a set
    List {
        /// Path to exercise set file or directory
        #[arg(long)]
        exercise_set: PathBuf,

        /// Only show exercises with this tag
        #[arg(long)]
        tag: Option<String>,
    },

    /// Show a saved session report
    Report {
        /// Session report JSON
        #[arg(long)]
        input: PathBuf,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and example exercise set
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("commitdojo=info".parse().expect("static directive is valid")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Practice {
            exercise_set,
            output,
            config,
        } => commands::practice::execute(exercise_set, output, config).await,
        Commands::Grade {
            exercise_set,
            exercise,
            message,
            format,
            fail_on_imperfect,
        } => commands::grade::execute(exercise_set, exercise, message, format, fail_on_imperfect),
        Commands::Validate { exercise_set } => commands::validate::execute(exercise_set),
        Commands::List { exercise_set, tag } => commands::list::execute(exercise_set, tag),
        Commands::Report { input, format } => commands::report::execute(input, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

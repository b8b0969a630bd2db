//! quizkit CLI: take multiple-choice quizzes in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "quizkit", version, about = "Multiple-choice quizzes in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz
    Take {
        /// Path to the question JSON file
        #[arg(long)]
        questions: PathBuf,

        /// Discard saved progress and start over
        #[arg(long, conflicts_with = "resume")]
        fresh: bool,

        /// Continue from saved progress without asking
        #[arg(long)]
        resume: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a question JSON file
    Validate {
        /// Path to the question JSON file
        #[arg(long)]
        questions: PathBuf,
    },

    /// Show saved progress
    Status {
        /// Question file, to report progress against its size
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Delete saved progress
    Reset {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizkit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            questions,
            fresh,
            resume,
            config,
        } => commands::take::execute(questions, fresh, resume, config).await,
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Status { questions, config } => commands::status::execute(questions, config),
        Commands::Reset { config } => commands::reset::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

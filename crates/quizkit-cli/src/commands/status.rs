//! The `quizkit status` command.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::config::load_config_from;
use quizkit_core::loader;
use quizkit_core::timer::format_time;

pub fn execute(questions_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = config.progress_store();

    let Some(snapshot) = store.load() else {
        println!("No saved progress.");
        return Ok(());
    };

    let answered = snapshot.answers.len();
    match questions_path {
        Some(path) => {
            let questions = loader::load_file(&path)?;
            let valid = snapshot
                .answers
                .iter()
                .filter(|(q, o)| questions.accepts(*q, *o))
                .count();
            println!(
                "Saved progress: {valid} of {} answered, at question {}",
                questions.len(),
                snapshot.current_index.min(questions.len() - 1) + 1
            );
            if valid < answered {
                println!(
                    "  {} saved answer(s) do not match this question set and will be dropped.",
                    answered - valid
                );
            }
        }
        None => {
            println!(
                "Saved progress: {answered} answered, at question {}",
                snapshot.current_index + 1
            );
        }
    }
    println!("Time elapsed: {}", format_time(snapshot.elapsed_seconds));
    println!("Stored in: {}", config.state_dir.display());

    Ok(())
}

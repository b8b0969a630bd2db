//! The `quizkit reset` command.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = config.progress_store();

    let had_progress = store.exists();
    store.clear();

    if had_progress {
        println!("Saved progress cleared.");
    } else {
        println!("No saved progress.");
    }

    Ok(())
}

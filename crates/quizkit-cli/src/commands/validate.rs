//! The `quizkit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::loader;

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let questions = loader::load_file(&questions_path)?;

    println!(
        "Question set: {} ({} questions)",
        questions_path.display(),
        questions.len()
    );

    let mut without_explanation = 0;
    for (i, q) in questions.iter().enumerate() {
        if q.explanation.is_none() {
            without_explanation += 1;
        }
        println!(
            "  {:>3}. {} [{} options, answer {}]",
            i + 1,
            q.text,
            q.options.len(),
            quizkit_core::Question::option_label(q.correct_answer_index)
        );
    }

    if without_explanation > 0 {
        println!("\n{without_explanation} question(s) have no explanation.");
    }
    println!("All questions valid.");

    Ok(())
}

//! Question data loader.
//!
//! Turns an external JSON value into a validated `QuestionSet`, decoding any
//! HTML entities in text fields so renderers receive plain text.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::error::QuizError;
use crate::model::{Question, QuestionSet};

/// Intermediate structure matching the external question JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer_index: i64,
    #[serde(default)]
    explanation: Option<String>,
}

/// Load and validate a question set from an arbitrary JSON value.
pub fn load(raw: &serde_json::Value) -> Result<QuestionSet, QuizError> {
    let items = raw
        .as_array()
        .ok_or_else(|| QuizError::invalid_data("expected an array of questions"))?;

    let questions = items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let parsed = RawQuestion::deserialize(item).map_err(|e| {
                QuizError::invalid_data(format!("question {}: {e}", position + 1))
            })?;
            let correct_answer_index = usize::try_from(parsed.correct_answer_index).map_err(|_| {
                QuizError::invalid_data(format!(
                    "question {} has negative correctAnswerIndex {}",
                    position + 1,
                    parsed.correct_answer_index
                ))
            })?;
            Ok(Question {
                text: decode_entities(&parsed.question),
                options: parsed.options.iter().map(|o| decode_entities(o)).collect(),
                correct_answer_index,
                explanation: parsed.explanation.as_deref().map(decode_entities),
            })
        })
        .collect::<Result<Vec<_>, QuizError>>()?;

    let set = QuestionSet::new(questions)?;
    tracing::debug!(questions = set.len(), "loaded question set");
    Ok(set)
}

/// Load a question set from JSON text.
pub fn load_str(content: &str) -> Result<QuestionSet, QuizError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| QuizError::invalid_data(format!("malformed JSON: {e}")))?;
    load(&value)
}

/// Load a question set from a JSON file.
pub fn load_file(path: &Path) -> anyhow::Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;
    load_str(&content).with_context(|| format!("failed to load questions from {}", path.display()))
}

/// Decode HTML character references into plain text.
///
/// Covers the full HTML5 named entity table plus decimal and hex numeric
/// references. Unknown entities are left as-is, so plain text passes through
/// unchanged.
pub fn decode_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}

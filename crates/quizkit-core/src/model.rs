//! Core data model types for quizkit.
//!
//! Questions are loaded once and never mutated; answers are the only part of
//! the model that changes while a quiz is taken.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The question prompt, as plain text.
    #[serde(rename = "question")]
    pub text: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_answer_index: usize,
    /// Shown next to the question during review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Returns `true` if `option` is a valid index into this question's options.
    pub fn has_option(&self, option: usize) -> bool {
        option < self.options.len()
    }

    /// Returns `true` if `option` is the correct answer.
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer_index
    }

    /// Letter label for an option index (`0` → `A`).
    pub fn option_label(index: usize) -> char {
        u8::try_from(index)
            .ok()
            .filter(|i| *i < 26)
            .map(|i| (b'A' + i) as char)
            .unwrap_or('?')
    }

    fn validate(&self, position: usize) -> Result<(), QuizError> {
        if self.text.trim().is_empty() {
            return Err(QuizError::invalid_data(format!(
                "question {} has empty text",
                position + 1
            )));
        }
        if self.options.len() < 2 {
            return Err(QuizError::invalid_data(format!(
                "question {} needs at least 2 options, found {}",
                position + 1,
                self.options.len()
            )));
        }
        if !self.has_option(self.correct_answer_index) {
            return Err(QuizError::invalid_data(format!(
                "question {} has correctAnswerIndex {} but only {} options",
                position + 1,
                self.correct_answer_index,
                self.options.len()
            )));
        }
        Ok(())
    }
}

/// A validated, non-empty, immutable list of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Build a question set, validating every question.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::invalid_data("question list is empty"));
        }
        for (position, question) in questions.iter().enumerate() {
            question.validate(position)?;
        }
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    /// Returns `true` if `index` addresses a question in this set.
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.questions.len()
    }

    /// Returns `true` if `option` is a valid answer for question `index`.
    pub fn accepts(&self, index: usize, option: usize) -> bool {
        self.get(index).is_some_and(|q| q.has_option(option))
    }
}

impl Index<usize> for QuestionSet {
    type Output = Question;

    fn index(&self, index: usize) -> &Question {
        &self.questions[index]
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// Selected option per question index. At most one answer per question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<usize, usize>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The option chosen for `question`, if any.
    pub fn get(&self, question: usize) -> Option<usize> {
        self.0.get(&question).copied()
    }

    pub fn contains(&self, question: usize) -> bool {
        self.0.contains_key(&question)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(question, option)` pairs in question order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(q, o)| (*q, *o))
    }

    /// Record an answer, replacing any earlier choice for the same question.
    pub(crate) fn record(&mut self, question: usize, option: usize) -> Option<usize> {
        self.0.insert(question, option)
    }

    /// Drop entries that do not fit `questions`.
    pub(crate) fn retain_valid(&mut self, questions: &QuestionSet) -> usize {
        let before = self.0.len();
        self.0.retain(|q, o| questions.accepts(*q, *o));
        before - self.0.len()
    }
}

impl FromIterator<(usize, usize)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Three four-option questions with correct answers `[1, 0, 2]`.
    pub fn three_questions() -> QuestionSet {
        let make = |text: &str, correct: usize| Question {
            text: text.into(),
            options: vec!["w".into(), "x".into(), "y".into(), "z".into()],
            correct_answer_index: correct,
            explanation: None,
        };
        QuestionSet::new(vec![make("one", 1), make("two", 0), make("three", 2)]).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, correct: usize) -> Question {
        Question {
            text: "What?".into(),
            options: (0..options).map(|i| format!("opt{i}")).collect(),
            correct_answer_index: correct,
            explanation: None,
        }
    }

    #[test]
    fn rejects_empty_set() {
        assert!(matches!(
            QuestionSet::new(vec![]),
            Err(QuizError::InvalidData(_))
        ));
    }

    #[test]
    fn rejects_single_option() {
        let err = QuestionSet::new(vec![question(1, 0)]).unwrap_err();
        assert!(err.to_string().contains("at least 2 options"));
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = QuestionSet::new(vec![question(2, 0), question(3, 3)]).unwrap_err();
        assert!(err.to_string().contains("question 2"), "got: {err}");
    }

    #[test]
    fn rejects_blank_text() {
        let mut q = question(2, 0);
        q.text = "   ".into();
        assert!(QuestionSet::new(vec![q]).is_err());
    }

    #[test]
    fn accepts_checks_both_indices() {
        let set = QuestionSet::new(vec![question(2, 1), question(4, 3)]).unwrap();
        assert!(set.accepts(1, 3));
        assert!(!set.accepts(0, 2));
        assert!(!set.accepts(2, 0));
    }

    #[test]
    fn answer_map_keeps_last_write() {
        let mut answers = AnswerMap::new();
        assert_eq!(answers.record(0, 1), None);
        assert_eq!(answers.record(0, 3), Some(1));
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get(0), Some(3));
    }

    #[test]
    fn answer_map_serializes_with_string_keys() {
        let answers: AnswerMap = [(0, 1), (2, 3)].into_iter().collect();
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"0":1,"2":3}"#);
        let back: AnswerMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, answers);
    }

    #[test]
    fn retain_valid_drops_stale_entries() {
        let set = fixtures::three_questions();
        let mut answers: AnswerMap = [(0, 1), (1, 9), (7, 0)].into_iter().collect();
        assert_eq!(answers.retain_valid(&set), 2);
        assert_eq!(answers.iter().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn option_labels() {
        assert_eq!(Question::option_label(0), 'A');
        assert_eq!(Question::option_label(3), 'D');
        assert_eq!(Question::option_label(30), '?');
    }
}

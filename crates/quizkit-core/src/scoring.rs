//! Scoring of submitted sessions.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{AnswerMap, QuestionSet};
use crate::session::QuizSession;
use crate::timer::format_time;

/// Verdict for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub question_index: usize,
    pub is_correct: bool,
    pub user_answer_index: Option<usize>,
    pub correct_answer_index: usize,
}

impl ReviewEntry {
    pub fn is_answered(&self) -> bool {
        self.user_answer_index.is_some()
    }
}

/// Score breakdown for a submitted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub unanswered_count: usize,
    pub time_taken_seconds: u64,
    /// One entry per question, in question order.
    pub review: Vec<ReviewEntry>,
}

impl ResultsSummary {
    /// Total number of questions scored.
    pub fn total(&self) -> usize {
        self.correct_count + self.incorrect_count + self.unanswered_count
    }

    /// Correct answers as a whole percentage of all questions.
    pub fn accuracy_percent(&self) -> u32 {
        match self.total() {
            0 => 0,
            total => (self.correct_count as f64 / total as f64 * 100.0).round() as u32,
        }
    }

    /// `MM:SS` rendering of the time taken.
    pub fn time_taken(&self) -> String {
        format_time(self.time_taken_seconds)
    }
}

/// Score a submitted session.
pub fn score(session: &QuizSession) -> Result<ResultsSummary, QuizError> {
    if !session.is_submitted() {
        return Err(QuizError::Precondition("quiz must be submitted before scoring"));
    }
    Ok(score_answers(
        session.questions(),
        session.answers(),
        session.elapsed_seconds(),
    ))
}

/// Score an answer map against a question set.
///
/// Answers for indices outside `questions` are ignored.
pub fn score_answers(
    questions: &QuestionSet,
    answers: &AnswerMap,
    time_taken_seconds: u64,
) -> ResultsSummary {
    let mut correct_count = 0;
    let mut incorrect_count = 0;
    let mut unanswered_count = 0;

    let review = questions
        .iter()
        .enumerate()
        .map(|(question_index, question)| {
            let user_answer_index = answers.get(question_index);
            let is_correct = user_answer_index.is_some_and(|a| question.is_correct(a));
            match (user_answer_index, is_correct) {
                (None, _) => unanswered_count += 1,
                (Some(_), true) => correct_count += 1,
                (Some(_), false) => incorrect_count += 1,
            }
            ReviewEntry {
                question_index,
                is_correct,
                user_answer_index,
                correct_answer_index: question.correct_answer_index,
            }
        })
        .collect();

    ResultsSummary {
        correct_count,
        incorrect_count,
        unanswered_count,
        time_taken_seconds,
        review,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::fixtures::three_questions;
    use crate::session::StartMode;
    use crate::store::{MemoryBackend, ProgressStore, DEFAULT_STORAGE_KEY};
    use crate::timer::{ManualTicker, TimerClock};

    fn session_over(backend: &Arc<MemoryBackend>) -> QuizSession {
        QuizSession::new(
            Arc::new(three_questions()),
            ProgressStore::new(backend.clone(), DEFAULT_STORAGE_KEY),
            TimerClock::new(Box::new(ManualTicker::new())),
        )
    }

    #[test]
    fn mixed_answers_scenario() {
        let backend = Arc::new(MemoryBackend::new());
        let mut session = session_over(&backend);
        session.start(StartMode::Fresh).unwrap();
        session.select_answer(1).unwrap();
        session.navigate_to(1).unwrap();
        session.select_answer(3).unwrap();
        for _ in 0..42 {
            session.tick();
        }
        session.submit(true).unwrap();

        let results = score(&session).unwrap();
        assert_eq!(results.correct_count, 1);
        assert_eq!(results.incorrect_count, 1);
        assert_eq!(results.unanswered_count, 1);
        assert_eq!(results.time_taken_seconds, 42);
        assert_eq!(results.time_taken(), "00:42");
        assert_eq!(results.accuracy_percent(), 33);
        assert_eq!(
            results.review,
            vec![
                ReviewEntry {
                    question_index: 0,
                    is_correct: true,
                    user_answer_index: Some(1),
                    correct_answer_index: 1,
                },
                ReviewEntry {
                    question_index: 1,
                    is_correct: false,
                    user_answer_index: Some(3),
                    correct_answer_index: 0,
                },
                ReviewEntry {
                    question_index: 2,
                    is_correct: false,
                    user_answer_index: None,
                    correct_answer_index: 2,
                },
            ]
        );
    }

    #[test]
    fn scoring_requires_submission() {
        let backend = Arc::new(MemoryBackend::new());
        let mut session = session_over(&backend);
        assert!(matches!(score(&session), Err(QuizError::Precondition(_))));
        session.start(StartMode::Fresh).unwrap();
        assert!(matches!(score(&session), Err(QuizError::Precondition(_))));
    }

    #[test]
    fn counts_always_sum_to_question_count() {
        let questions = three_questions();
        let cases: Vec<AnswerMap> = vec![
            AnswerMap::new(),
            [(0, 1), (1, 0), (2, 2)].into_iter().collect(),
            [(0, 0), (1, 1), (2, 3)].into_iter().collect(),
            [(2, 2)].into_iter().collect(),
            [(0, 1), (5, 0)].into_iter().collect(),
        ];
        for answers in &cases {
            let results = score_answers(&questions, answers, 0);
            assert_eq!(results.total(), questions.len());
            assert_eq!(results.review.len(), questions.len());
        }
    }

    #[test]
    fn perfect_score() {
        let questions = three_questions();
        let answers = [(0, 1), (1, 0), (2, 2)].into_iter().collect();
        let results = score_answers(&questions, &answers, 10);
        assert_eq!(results.correct_count, 3);
        assert_eq!(results.accuracy_percent(), 100);
    }

    #[test]
    fn resumed_session_scores_like_uninterrupted_one() {
        let direct_backend = Arc::new(MemoryBackend::new());
        let mut direct = session_over(&direct_backend);
        let reload_backend = Arc::new(MemoryBackend::new());
        let mut before_reload = session_over(&reload_backend);

        for session in [&mut direct, &mut before_reload] {
            session.start(StartMode::Fresh).unwrap();
            session.tick();
            session.tick();
            session.select_answer(1).unwrap();
            session.navigate_to(2).unwrap();
            session.select_answer(0).unwrap();
        }

        direct.submit(true).unwrap();
        let mut resumed = session_over(&reload_backend);
        resumed.start(StartMode::Resume).unwrap();
        resumed.submit(true).unwrap();

        assert_eq!(score(&resumed).unwrap(), score(&direct).unwrap());
    }
}

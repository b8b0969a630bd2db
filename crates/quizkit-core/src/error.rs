//! Quiz error types.
//!
//! Only malformed question data is fatal. Lifecycle violations are rejected
//! without touching state, and storage failures never surface here at all.

use thiserror::Error;

use crate::session::SessionStatus;

/// Errors returned by the quiz core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The question data could not be loaded or failed validation.
    #[error("invalid quiz data: {0}")]
    InvalidData(String),

    /// An operation was invoked in a lifecycle state that does not allow it.
    #[error("cannot {operation} while quiz is {status}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },

    /// `start` was called on a submitted session without restarting first.
    #[error("quiz already submitted, restart before starting again")]
    AlreadySubmitted,

    /// Scoring was requested before the session was submitted.
    #[error("precondition failed: {0}")]
    Precondition(&'static str),
}

impl QuizError {
    pub(crate) fn invalid_data(message: impl Into<String>) -> Self {
        QuizError::InvalidData(message.into())
    }

    /// Returns `true` if this error should abort the whole quiz.
    pub fn is_fatal(&self) -> bool {
        matches!(self, QuizError::InvalidData(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_operation_and_state() {
        let err = QuizError::InvalidState {
            operation: "select an answer",
            status: SessionStatus::Submitted,
        };
        assert_eq!(
            err.to_string(),
            "cannot select an answer while quiz is submitted"
        );
    }

    #[test]
    fn only_invalid_data_is_fatal() {
        assert!(QuizError::invalid_data("empty").is_fatal());
        assert!(!QuizError::AlreadySubmitted.is_fatal());
        assert!(!QuizError::Precondition("not submitted").is_fatal());
    }
}

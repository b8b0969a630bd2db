//! quizkit-core: quiz session state machine, scoring, and persistence.
//!
//! This crate holds everything with real invariants: question validation,
//! answer bookkeeping, progress resumption, timer accounting, and scoring.
//! Rendering lives with the caller, which reads session state after each
//! command.

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod scoring;
pub mod session;
pub mod store;
pub mod timer;

pub use error::QuizError;
pub use model::{AnswerMap, Question, QuestionSet};
pub use scoring::{score, ResultsSummary, ReviewEntry};
pub use session::{QuizSession, SessionStatus, StartMode, SubmitOutcome};
pub use store::{ProgressSnapshot, ProgressStore};
pub use timer::{Ticker, TimerClock};

//! The quiz session state machine.
//!
//! A session moves `NotStarted → InProgress → Submitted`. All commands run to
//! completion synchronously; rejected commands leave state untouched. Timer
//! ticks arrive through [`QuizSession::tick`] from whatever event loop hosts
//! the session.

use std::fmt;
use std::sync::Arc;

use crate::error::QuizError;
use crate::model::{AnswerMap, Question, QuestionSet};
use crate::store::{ProgressSnapshot, ProgressStore};
use crate::timer::TimerClock;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Submitted,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::NotStarted => write!(f, "not started"),
            SessionStatus::InProgress => write!(f, "in progress"),
            SessionStatus::Submitted => write!(f, "submitted"),
        }
    }
}

/// How to enter `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Discard any saved progress and begin at the first question.
    Fresh,
    /// Restore answers, position, and elapsed time from saved progress.
    Resume,
}

/// Result of a `submit` call that was allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// The caller's confirmation gate said no. Nothing changed.
    Cancelled,
}

/// Receives notifications the renderer cannot get by polling after commands.
pub trait SessionObserver: Send + Sync {
    /// Called after every counted second.
    fn on_tick(&self, elapsed_seconds: u64);
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_tick(&self, _: u64) {}
}

/// Plain-data view of the session for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub current_index: usize,
    pub answers: AnswerMap,
    pub elapsed_seconds: u64,
    pub question_count: usize,
}

impl SessionState {
    pub fn submitted(&self) -> bool {
        self.status == SessionStatus::Submitted
    }

    pub fn started(&self) -> bool {
        self.status != SessionStatus::NotStarted
    }
}

/// A single user's pass through a question set.
pub struct QuizSession {
    questions: Arc<QuestionSet>,
    store: ProgressStore,
    clock: TimerClock,
    observer: Arc<dyn SessionObserver>,
    status: SessionStatus,
    current_index: usize,
    answers: AnswerMap,
}

impl QuizSession {
    pub fn new(questions: Arc<QuestionSet>, store: ProgressStore, clock: TimerClock) -> Self {
        Self {
            questions,
            store,
            clock,
            observer: Arc::new(NoopObserver),
            status: SessionStatus::NotStarted,
            current_index: 0,
            answers: AnswerMap::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Enter `InProgress`, either fresh or from saved progress, and start the
    /// clock. Starting while already in progress re-enters with the given mode.
    pub fn start(&mut self, mode: StartMode) -> Result<(), QuizError> {
        if self.status == SessionStatus::Submitted {
            return Err(QuizError::AlreadySubmitted);
        }

        match mode {
            StartMode::Fresh => {
                self.store.clear();
                self.answers = AnswerMap::new();
                self.current_index = 0;
                self.clock.reset();
            }
            StartMode::Resume => {
                let snapshot = self.store.load().unwrap_or_default();
                self.apply_snapshot(snapshot);
            }
        }

        self.status = SessionStatus::InProgress;
        self.clock.start();
        tracing::debug!(
            ?mode,
            current_index = self.current_index,
            answered = self.answers.len(),
            elapsed = self.clock.elapsed_seconds(),
            "quiz started"
        );
        Ok(())
    }

    /// Record `option` as the answer to the current question, replacing any
    /// earlier choice. Out-of-range options are ignored.
    pub fn select_answer(&mut self, option: usize) -> Result<(), QuizError> {
        self.require_in_progress("select an answer")?;

        if !self.questions.accepts(self.current_index, option) {
            tracing::warn!(
                question = self.current_index,
                option,
                "ignoring out-of-range answer"
            );
            return Ok(());
        }

        self.answers.record(self.current_index, option);
        self.store.save(&self.snapshot());
        Ok(())
    }

    /// Move to question `index`. Out-of-range indices are ignored.
    pub fn navigate_to(&mut self, index: usize) -> Result<(), QuizError> {
        self.require_in_progress("navigate")?;
        if self.questions.contains_index(index) {
            self.current_index = index;
        }
        Ok(())
    }

    /// Move to the next question, if there is one.
    pub fn next_question(&mut self) -> Result<(), QuizError> {
        self.navigate_to(self.current_index.saturating_add(1))
    }

    /// Move to the previous question, if there is one.
    pub fn previous_question(&mut self) -> Result<(), QuizError> {
        match self.current_index.checked_sub(1) {
            Some(index) => self.navigate_to(index),
            None => self.require_in_progress("navigate"),
        }
    }

    /// Submit the quiz. `confirmed` is the answer of the caller's yes/no
    /// gate; when it is `false` nothing happens.
    pub fn submit(&mut self, confirmed: bool) -> Result<SubmitOutcome, QuizError> {
        self.require_in_progress("submit")?;
        if !confirmed {
            return Ok(SubmitOutcome::Cancelled);
        }

        self.clock.stop();
        self.status = SessionStatus::Submitted;
        self.store.clear();
        tracing::debug!(
            answered = self.answers.len(),
            elapsed = self.clock.elapsed_seconds(),
            "quiz submitted"
        );
        Ok(SubmitOutcome::Submitted)
    }

    /// Return to `NotStarted` with fresh values. Valid from any state.
    pub fn restart(&mut self) {
        self.clock.reset();
        self.store.clear();
        self.answers = AnswerMap::new();
        self.current_index = 0;
        self.status = SessionStatus::NotStarted;
        tracing::debug!("quiz restarted");
    }

    /// Count one elapsed second. Ticks outside `InProgress` are dropped.
    pub fn tick(&mut self) -> Option<u64> {
        if self.status != SessionStatus::InProgress {
            return None;
        }
        let elapsed = self.clock.tick()?;
        self.observer.on_tick(elapsed);
        Some(elapsed)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_submitted(&self) -> bool {
        self.status == SessionStatus::Submitted
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.elapsed_seconds()
    }

    pub fn clock(&self) -> &TimerClock {
        &self.clock
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answers.contains(index)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Share of questions answered, `0.0..=100.0`.
    pub fn progress_percent(&self) -> f64 {
        self.answers.len() as f64 / self.questions.len() as f64 * 100.0
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// Whether the store holds progress that `start(Resume)` would restore.
    pub fn has_saved_progress(&self) -> bool {
        self.store.exists()
    }

    /// Plain-data copy of the public state.
    pub fn state(&self) -> SessionState {
        SessionState {
            status: self.status,
            current_index: self.current_index,
            answers: self.answers.clone(),
            elapsed_seconds: self.clock.elapsed_seconds(),
            question_count: self.questions.len(),
        }
    }

    /// The persisted projection of this session.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            answers: self.answers.clone(),
            current_index: self.current_index,
            elapsed_seconds: self.clock.elapsed_seconds(),
            started: self.status != SessionStatus::NotStarted,
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn require_in_progress(&self, operation: &'static str) -> Result<(), QuizError> {
        if self.status == SessionStatus::InProgress {
            Ok(())
        } else {
            Err(QuizError::InvalidState {
                operation,
                status: self.status,
            })
        }
    }

    /// Merge a snapshot into this session, clamping anything that no longer
    /// fits the current question set.
    fn apply_snapshot(&mut self, snapshot: ProgressSnapshot) {
        let ProgressSnapshot {
            mut answers,
            current_index,
            elapsed_seconds,
            started: _,
        } = snapshot;

        let dropped = answers.retain_valid(&self.questions);
        if dropped > 0 {
            tracing::warn!(dropped, "dropped saved answers that do not fit the question set");
        }

        let last = self.questions.len() - 1;
        if current_index > last {
            tracing::warn!(current_index, last, "clamping saved question index");
        }

        self.answers = answers;
        self.current_index = current_index.min(last);
        self.clock.restore(elapsed_seconds);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("status", &self.status)
            .field("current_index", &self.current_index)
            .field("answers", &self.answers)
            .field("clock", &self.clock)
            .field("questions", &self.questions.len())
            .finish_non_exhaustive()
    }
}

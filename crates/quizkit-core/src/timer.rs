//! Elapsed-time tracking for a quiz session.
//!
//! `TimerClock` counts whole seconds. It does not own a real timer; it asks a
//! [`Ticker`] to deliver ticks and the host calls [`TimerClock::tick`] each
//! time one arrives. Tests use [`ManualTicker`] and tick by hand.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Tick period. Each tick counts as one elapsed second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Port for "notify me every `period`".
pub trait Ticker: Send {
    /// Start delivering ticks every `period`, replacing any earlier schedule.
    fn schedule(&mut self, period: Duration);

    /// Stop delivering ticks. Must be safe to call when nothing is scheduled.
    fn cancel(&mut self);
}

/// Wall-clock elapsed-time tracker with start/stop/restore semantics.
pub struct TimerClock {
    elapsed_seconds: u64,
    running: bool,
    started_at: Option<DateTime<Utc>>,
    ticker: Box<dyn Ticker>,
}

impl TimerClock {
    pub fn new(ticker: Box<dyn Ticker>) -> Self {
        Self {
            elapsed_seconds: 0,
            running: false,
            started_at: None,
            ticker,
        }
    }

    /// Start ticking. Calling this while already running cancels the current
    /// schedule first, so there is never more than one tick source.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        if self.running {
            self.ticker.cancel();
        }
        self.ticker.schedule(TICK_PERIOD);
        self.running = true;
        tracing::debug!(elapsed = self.elapsed_seconds, "timer started");
    }

    /// Count one elapsed second. Ignored when the clock is stopped, which
    /// covers ticks that were already in flight when `stop` was called.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.elapsed_seconds += 1;
        Some(self.elapsed_seconds)
    }

    /// Stop ticking. Elapsed time is kept.
    pub fn stop(&mut self) {
        if self.running {
            self.ticker.cancel();
            self.running = false;
            tracing::debug!(elapsed = self.elapsed_seconds, "timer stopped");
        }
    }

    /// Set elapsed time to a previously persisted value.
    pub fn restore(&mut self, seconds: u64) {
        self.elapsed_seconds = seconds;
    }

    /// Stop and clear all accumulated state.
    pub fn reset(&mut self) {
        self.stop();
        self.elapsed_seconds = 0;
        self.started_at = None;
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// When the clock was first started since construction or the last reset.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}

impl std::fmt::Debug for TimerClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerClock")
            .field("elapsed_seconds", &self.elapsed_seconds)
            .field("running", &self.running)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

/// Format seconds as `MM:SS`.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// A ticker that never fires on its own; the test drives ticks directly.
///
/// Clones share counters, so a test can keep a handle after boxing one into
/// a `TimerClock`.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    active: Arc<AtomicBool>,
    schedules: Arc<AtomicU32>,
    overlaps: Arc<AtomicU32>,
    cancels: Arc<AtomicU32>,
    last_period: Arc<Mutex<Option<Duration>>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a schedule is currently active.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Number of times `schedule` has been called.
    pub fn schedule_count(&self) -> u32 {
        self.schedules.load(Ordering::Relaxed)
    }

    /// Number of times `schedule` was called while a schedule was still active.
    pub fn overlap_count(&self) -> u32 {
        self.overlaps.load(Ordering::Relaxed)
    }

    /// Period passed to the most recent `schedule` call.
    pub fn last_period(&self) -> Option<Duration> {
        *self
            .last_period
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of times an active schedule was cancelled.
    pub fn cancel_count(&self) -> u32 {
        self.cancels.load(Ordering::Relaxed)
    }
}

impl Ticker for ManualTicker {
    fn schedule(&mut self, period: Duration) {
        if self.active.swap(true, Ordering::Relaxed) {
            self.overlaps.fetch_add(1, Ordering::Relaxed);
        }
        self.schedules.fetch_add(1, Ordering::Relaxed);
        *self
            .last_period
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(period);
    }

    fn cancel(&mut self) {
        if self.active.swap(false, Ordering::Relaxed) {
            self.cancels.fetch_add(1, Ordering::Relaxed);
        }
    }
}

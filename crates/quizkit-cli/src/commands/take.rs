//! The `quizkit take` command.
//!
//! Runs a single-threaded event loop: timer ticks and input lines arrive on
//! one channel and are applied to the session one at a time.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use quizkit_core::config::{load_config_from, QuizConfig};
use quizkit_core::session::SessionObserver;
use quizkit_core::timer::format_time;
use quizkit_core::{
    loader, score, QuizSession, SessionStatus, StartMode, SubmitOutcome, Ticker, TimerClock,
};

use crate::render;

/// Something the loop has to react to.
#[derive(Debug)]
enum Event {
    /// A tick from the schedule with the given generation.
    Tick(u64),
    Input(String),
    InputClosed,
}

/// Identifies the live tick schedule. Ticks from older schedules can still be
/// queued after a cancel and must be dropped.
#[derive(Debug, Clone, Default)]
struct TickGeneration(Arc<AtomicU64>);

impl TickGeneration {
    fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::SeqCst) == generation
    }
}

/// Ticker backed by a tokio interval task that posts `Event::Tick`.
struct ChannelTicker {
    tx: UnboundedSender<Event>,
    generation: TickGeneration,
    task: Option<JoinHandle<()>>,
}

impl ChannelTicker {
    fn new(tx: UnboundedSender<Event>, generation: TickGeneration) -> Self {
        Self {
            tx,
            generation,
            task: None,
        }
    }
}

impl Ticker for ChannelTicker {
    fn schedule(&mut self, period: Duration) {
        self.cancel();
        let generation = self.generation.advance();
        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick(generation)).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.generation.advance();
        }
    }
}

impl Drop for ChannelTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Prints the elapsed time once per full minute.
struct MinuteBanner;

impl SessionObserver for MinuteBanner {
    fn on_tick(&self, elapsed_seconds: u64) {
        tracing::trace!(elapsed_seconds, "tick");
        if elapsed_seconds % 60 == 0 {
            println!("  [{} elapsed]", format_time(elapsed_seconds));
        }
    }
}

/// What the loop is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Start,
    Question,
    ConfirmSubmit,
    Results,
}

/// A parsed line of input while a question is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Answer(usize),
    Next,
    Previous,
    GoTo(usize),
    Time,
    Submit,
    Restart,
    Quit,
    Help,
    Show,
    Unknown(String),
}

fn parse_command(line: &str, option_count: usize) -> Command {
    let line = line.trim();
    let lower = line.to_lowercase();
    let mut parts = lower.split_whitespace();
    let Some(head) = parts.next() else {
        return Command::Show;
    };
    let arg = parts.next();

    match (head, arg) {
        ("n" | "next", None) => Command::Next,
        ("p" | "prev" | "previous", None) => Command::Previous,
        ("g" | "go", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Command::GoTo(n - 1),
            _ => Command::Unknown(line.to_string()),
        },
        ("t" | "time", None) => Command::Time,
        ("s" | "submit", None) => Command::Submit,
        ("r" | "restart", None) => Command::Restart,
        ("q" | "quit", None) => Command::Quit,
        ("h" | "help" | "?", None) => Command::Help,
        (word, None) => parse_answer(word, option_count)
            .map(Command::Answer)
            .unwrap_or_else(|| Command::Unknown(line.to_string())),
        _ => Command::Unknown(line.to_string()),
    }
}

/// `1`-based number or option letter to a zero-based option index.
fn parse_answer(word: &str, option_count: usize) -> Option<usize> {
    if let Ok(n) = word.parse::<usize>() {
        return n.checked_sub(1).filter(|i| *i < option_count);
    }
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => {
            Some((c as u8 - b'a') as usize).filter(|i| *i < option_count)
        }
        _ => None,
    }
}

fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Read stdin on a plain thread so a pending read never holds up shutdown.
fn spawn_input_reader(tx: UnboundedSender<Event>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::InputClosed);
    });
}

pub async fn execute(
    questions_path: PathBuf,
    fresh: bool,
    resume: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let questions = Arc::new(loader::load_file(&questions_path)?);

    let (tx, rx) = mpsc::unbounded_channel();
    let generation = TickGeneration::default();
    let clock = TimerClock::new(Box::new(ChannelTicker::new(
        tx.clone(),
        generation.clone(),
    )));
    let session = QuizSession::new(questions, config.progress_store(), clock)
        .with_observer(Arc::new(MinuteBanner));

    spawn_input_reader(tx);

    let title = questions_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Quiz".to_string());

    let mut app = TakeLoop {
        session,
        config,
        generation,
        title,
        screen: Screen::Start,
    };
    app.begin(fresh, resume)?;
    app.run(rx).await
}

struct TakeLoop {
    session: QuizSession,
    config: QuizConfig,
    generation: TickGeneration,
    title: String,
    screen: Screen,
}

impl TakeLoop {
    fn begin(&mut self, fresh: bool, resume: bool) -> Result<()> {
        let saved = self.session.has_saved_progress();
        render::start_screen(
            &self.title,
            self.session.questions().len(),
            saved && !fresh && !resume,
        );

        if fresh || !saved {
            self.start(StartMode::Fresh)
        } else if resume {
            self.start(StartMode::Resume)
        } else {
            self.screen = Screen::Start;
            Ok(())
        }
    }

    fn start(&mut self, mode: StartMode) -> Result<()> {
        self.session.start(mode)?;
        self.screen = Screen::Question;
        render::question(&self.session);
        Ok(())
    }

    async fn run(&mut self, mut rx: UnboundedReceiver<Event>) -> Result<()> {
        while let Some(event) = rx.recv().await {
            match event {
                Event::Tick(generation) if self.generation.is_current(generation) => {
                    self.session.tick();
                }
                Event::Tick(generation) => {
                    tracing::trace!(generation, "dropping stale tick");
                }
                Event::Input(line) => {
                    if !self.handle_line(&line)? {
                        break;
                    }
                }
                Event::InputClosed => {
                    tracing::debug!("input closed");
                    break;
                }
            }
        }

        if self.session.status() == SessionStatus::InProgress {
            if self.session.has_saved_progress() {
                println!(
                    "\nProgress saved: {} of {} answered.",
                    self.session.answered_count(),
                    self.session.questions().len()
                );
            } else {
                println!("\nNo answers saved.");
            }
        }
        Ok(())
    }

    /// Apply one line of input. Returns `false` when the user quits.
    fn handle_line(&mut self, line: &str) -> Result<bool> {
        match self.screen {
            Screen::Start => match line.trim().to_lowercase().as_str() {
                "c" | "continue" => self.start(StartMode::Resume)?,
                "n" | "new" => self.start(StartMode::Fresh)?,
                "q" | "quit" => return Ok(false),
                _ => println!("Type c to continue or n to start over."),
            },
            Screen::ConfirmSubmit => {
                let outcome = self.session.submit(is_yes(line))?;
                match outcome {
                    SubmitOutcome::Submitted => self.show_results()?,
                    SubmitOutcome::Cancelled => {
                        self.screen = Screen::Question;
                        render::question(&self.session);
                    }
                }
            }
            Screen::Results => match line.trim().to_lowercase().as_str() {
                "r" | "restart" => {
                    self.session.restart();
                    self.start(StartMode::Fresh)?;
                }
                "q" | "quit" => return Ok(false),
                _ => println!("Type r to restart or q to quit."),
            },
            Screen::Question => {
                let option_count = self.session.current_question().options.len();
                match parse_command(line, option_count) {
                    Command::Answer(option) => {
                        self.session.select_answer(option)?;
                        render::question(&self.session);
                    }
                    Command::Next => {
                        self.session.next_question()?;
                        render::question(&self.session);
                    }
                    Command::Previous => {
                        self.session.previous_question()?;
                        render::question(&self.session);
                    }
                    Command::GoTo(index) => {
                        self.session.navigate_to(index)?;
                        render::question(&self.session);
                    }
                    Command::Time => {
                        println!("Elapsed: {}", format_time(self.session.elapsed_seconds()));
                    }
                    Command::Submit => {
                        if self.config.confirm_submit {
                            self.screen = Screen::ConfirmSubmit;
                            render::confirm_submit(&self.session);
                        } else {
                            self.session.submit(true)?;
                            self.show_results()?;
                        }
                    }
                    Command::Restart => {
                        self.session.restart();
                        self.start(StartMode::Fresh)?;
                    }
                    Command::Quit => return Ok(false),
                    Command::Help => render::help(),
                    Command::Show => render::question(&self.session),
                    Command::Unknown(input) => {
                        println!("Unrecognised input '{input}'. Type h for help.");
                    }
                }
            }
        }
        Ok(true)
    }

    fn show_results(&mut self) -> Result<()> {
        let results = score(&self.session)?;
        self.screen = Screen::Results;
        render::results(&self.session, &results);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation() {
        assert_eq!(parse_command("n", 4), Command::Next);
        assert_eq!(parse_command(" Prev ", 4), Command::Previous);
        assert_eq!(parse_command("g 3", 4), Command::GoTo(2));
        assert_eq!(parse_command("", 4), Command::Show);
    }

    #[test]
    fn parses_answers_by_number_and_letter() {
        assert_eq!(parse_command("1", 4), Command::Answer(0));
        assert_eq!(parse_command("4", 4), Command::Answer(3));
        assert_eq!(parse_command("B", 4), Command::Answer(1));
        assert_eq!(parse_command("d", 4), Command::Answer(3));
    }

    #[test]
    fn rejects_out_of_range_answers() {
        assert!(matches!(parse_command("5", 4), Command::Unknown(_)));
        assert!(matches!(parse_command("0", 4), Command::Unknown(_)));
        assert!(matches!(parse_command("e", 4), Command::Unknown(_)));
        assert!(matches!(parse_command("g 0", 4), Command::Unknown(_)));
    }

    #[test]
    fn command_letters_take_precedence() {
        assert_eq!(parse_command("s", 20), Command::Submit);
        assert_eq!(parse_command("q", 20), Command::Quit);
    }

    #[tokio::test]
    async fn ticks_from_a_cancelled_schedule_are_stale() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let generation = TickGeneration::default();
        let mut ticker = ChannelTicker::new(tx, generation.clone());

        ticker.schedule(Duration::from_millis(5));
        let Some(Event::Tick(first)) = rx.recv().await else {
            panic!("expected a tick");
        };
        assert!(generation.is_current(first));

        ticker.cancel();
        assert!(!generation.is_current(first));

        ticker.schedule(Duration::from_secs(3600));
        assert!(!generation.is_current(first));
        assert!(generation.is_current(first + 2));
    }

    #[test]
    fn yes_is_explicit() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
    }
}

//! Terminal rendering of session state and results.

use comfy_table::{Cell, Color, Table};

use quizkit_core::timer::format_time;
use quizkit_core::{Question, QuizSession, ResultsSummary};

pub fn start_screen(title: &str, question_count: usize, has_saved_progress: bool) {
    println!("{title}");
    println!("{question_count} questions. Answer in any order, then submit.");
    if has_saved_progress {
        println!("\nSaved progress found. [c]ontinue or start [n]ew?");
    }
}

pub fn question(session: &QuizSession) {
    let index = session.current_index();
    let total = session.questions().len();
    let question = session.current_question();
    let selected = session.answers().get(index);

    println!();
    println!(
        "[{}] Question {} of {}  ({} of {} answered, {:.0}%)",
        format_time(session.elapsed_seconds()),
        index + 1,
        total,
        session.answered_count(),
        total,
        session.progress_percent()
    );
    println!("{}", scroller(session));
    println!();
    println!("{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(i) { '*' } else { ' ' };
        println!(" {marker} {}. {option}", Question::option_label(i));
    }
}

/// One cell per question: `>` current, `#` answered, `.` unanswered.
fn scroller(session: &QuizSession) -> String {
    (0..session.questions().len())
        .map(|i| {
            if i == session.current_index() {
                '>'
            } else if session.is_answered(i) {
                '#'
            } else {
                '.'
            }
        })
        .collect()
}

pub fn help() {
    println!("Commands:");
    println!("  1-9 or a-f   choose an answer (options past F by number)");
    println!("  n / p        next / previous question");
    println!("  g <number>   go to question");
    println!("  t            show elapsed time");
    println!("  s            submit");
    println!("  r            restart");
    println!("  q            quit (answers are kept)");
}

pub fn confirm_submit(session: &QuizSession) {
    let unanswered = session.questions().len() - session.answered_count();
    if unanswered > 0 {
        println!("{unanswered} question(s) are unanswered.");
    }
    println!(
        "Are you sure you want to submit the quiz? You will not be able to change answers after submission. [y/N]"
    );
}

pub fn results(session: &QuizSession, results: &ResultsSummary) {
    println!("\nQuiz Completed!");

    let mut summary = Table::new();
    summary.set_header(vec!["Correct", "Incorrect", "Unanswered", "Time Taken", "Score"]);
    summary.add_row(vec![
        Cell::new(results.correct_count).fg(Color::Green),
        Cell::new(results.incorrect_count).fg(Color::Red),
        Cell::new(results.unanswered_count),
        Cell::new(results.time_taken()),
        Cell::new(format!(
            "{}/{} ({}%)",
            results.correct_count,
            results.total(),
            results.accuracy_percent()
        )),
    ]);
    println!("{summary}");

    println!("\nDetailed Review");
    let mut review = Table::new();
    review.set_header(vec!["#", "Question", "Your Answer", "Correct Answer", "Result"]);
    for entry in &results.review {
        let question = &session.questions()[entry.question_index];
        let yours = entry
            .user_answer_index
            .map(|i| option_text(question, i))
            .unwrap_or_else(|| "(not answered)".to_string());
        let verdict = match (entry.is_answered(), entry.is_correct) {
            (false, _) => Cell::new("Unanswered"),
            (true, true) => Cell::new("Correct").fg(Color::Green),
            (true, false) => Cell::new("Incorrect").fg(Color::Red),
        };
        review.add_row(vec![
            Cell::new(entry.question_index + 1),
            Cell::new(&question.text),
            Cell::new(yours),
            Cell::new(option_text(question, entry.correct_answer_index)),
            verdict,
        ]);
    }
    println!("{review}");

    for entry in &results.review {
        let question = &session.questions()[entry.question_index];
        if let Some(explanation) = &question.explanation {
            println!("{}. {explanation}", entry.question_index + 1);
        }
    }

    println!("\n[r]estart or [q]uit?");
}

fn option_text(question: &Question, index: usize) -> String {
    format!(
        "{}. {}",
        Question::option_label(index),
        question.options.get(index).map(String::as_str).unwrap_or("?")
    )
}

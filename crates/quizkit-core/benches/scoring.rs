use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizkit_core::model::{AnswerMap, Question, QuestionSet};
use quizkit_core::scoring::score_answers;

fn make_questions(n: usize) -> QuestionSet {
    let questions = (0..n)
        .map(|i| Question {
            text: format!("Question {i}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer_index: i % 4,
            explanation: None,
        })
        .collect();
    QuestionSet::new(questions).unwrap()
}

fn make_answers(n: usize, answered_every: usize) -> AnswerMap {
    (0..n)
        .step_by(answered_every)
        .map(|i| (i, (i * 7) % 4))
        .collect()
}

fn bench_score_answers(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_answers");

    for n in [10, 100, 1000] {
        let questions = make_questions(n);

        group.bench_function(format!("n={n},all_answered"), |b| {
            let answers = make_answers(n, 1);
            b.iter(|| score_answers(black_box(&questions), black_box(&answers), 60))
        });

        group.bench_function(format!("n={n},half_answered"), |b| {
            let answers = make_answers(n, 2);
            b.iter(|| score_answers(black_box(&questions), black_box(&answers), 60))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_score_answers);
criterion_main!(benches);

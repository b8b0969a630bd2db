use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizkit_core::loader::{decode_entities, load_str};

fn bench_decode_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_entities");

    let plain = "Which of the following is the capital of Australia?";
    let escaped = "Is &lt;b&gt;bold&lt;/b&gt; &amp; &quot;quoted&quot; it&#039;s &#x2014; fine?";

    group.bench_function("plain", |b| b.iter(|| decode_entities(black_box(plain))));
    group.bench_function("escaped", |b| b.iter(|| decode_entities(black_box(escaped))));

    group.finish();
}

fn bench_load_questions(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_questions");

    for n in [10, 100, 1000] {
        let json = generate_questions(n);
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| load_str(black_box(&json)).unwrap())
        });
    }

    group.finish();
}

fn generate_questions(n: usize) -> String {
    let items: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"question":"Question {i} &amp; more","options":["a","b","c","d"],"correctAnswerIndex":{},"explanation":"Because {i}"}}"#,
                i % 4
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}

criterion_group!(benches, bench_decode_entities, bench_load_questions);
criterion_main!(benches);

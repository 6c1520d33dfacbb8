//! Inference benchmark: training fit and per-URL scoring.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use phishguard::model::Label;
use phishguard::storage::MemoryDecisionLog;
use phishguard::training::{LabeledUrl, TrainingPipeline};
use phishguard::{RiskEngine, VerdictService};
use std::sync::Arc;

fn make_corpus(n: usize) -> Vec<LabeledUrl> {
    (0..n)
        .map(|i| {
            if i % 2 == 0 {
                LabeledUrl::new(format!("https://site{}.example.org/docs", i), Label::Legitimate)
            } else {
                LabeledUrl::new(format!("http://secure-login{}.bank-verify.example/update", i), Label::Phishing)
            }
        })
        .collect()
}

fn bench_training(c: &mut Criterion) {
    let pipeline = TrainingPipeline::default();
    let mut g = c.benchmark_group("training_by_corpus_size");
    for n in [100, 1_000, 10_000] {
        let corpus = make_corpus(n);
        g.bench_function(format!("n_{}", n).as_str(), |b| {
            b.iter(|| pipeline.run(black_box(&corpus)).unwrap())
        });
    }
    g.finish();
}

fn bench_score(c: &mut Criterion) {
    let (model, _) = TrainingPipeline::default().run(&make_corpus(1_000)).unwrap();
    let service = VerdictService::new(
        Arc::new(model),
        RiskEngine::default(),
        Arc::new(MemoryDecisionLog::new()),
    );

    c.bench_function("score_url", |b| {
        b.iter(|| service.score(black_box("http://paypa1-secure-verify.com/login")).unwrap())
    });
}

criterion_group!(benches, bench_training, bench_score);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use latentid_search::TopK;

/// Deterministic pseudo-random score stream.
fn scores(n: usize, seed: u64) -> Vec<f32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) as f32) / (u32::MAX as f32) * 100.0
        })
        .collect()
}

fn bench_topk_push(c: &mut Criterion) {
    let stream = scores(100_000, 42);
    let ids: Vec<String> = (0..stream.len()).map(|i| format!("rec{i}")).collect();

    c.bench_function("topk_100k_into_100", |b| {
        b.iter(|| {
            let mut tk = TopK::new(100);
            for (id, &s) in ids.iter().zip(&stream) {
                tk.push(black_box(id), black_box(s));
            }
            tk.len()
        })
    });
}

fn bench_topk_drain(c: &mut Criterion) {
    let stream = scores(10_000, 7);

    c.bench_function("topk_10k_drain_sorted", |b| {
        b.iter(|| {
            let mut tk = TopK::new(50);
            for (i, &s) in stream.iter().enumerate() {
                tk.push(&format!("r{i}"), s);
            }
            black_box(tk.into_descending())
        })
    });
}

criterion_group!(benches, bench_topk_push, bench_topk_drain);
criterion_main!(benches);

//! Benchmarks for move resolution and full-game replay.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dots_boxes::board::all_edges;
use dots_boxes::{apply, legal_moves, replay, GameState};

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    for size in [6usize, 10, 20] {
        let moves: Vec<_> = all_edges(size).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &moves, |b, moves| {
            b.iter(|| replay(black_box(size), moves.iter().copied()));
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let size = 10;
    let state = replay(size, all_edges(size).step_by(2));
    let edge = legal_moves(&state)[0];

    c.bench_function("apply_midgame", |b| {
        b.iter(|| apply(black_box(&state), black_box(edge)));
    });
    c.bench_function("clone_state", |b| {
        b.iter(|| black_box(&state).clone());
    });
    c.bench_function("legal_moves_fresh", |b| {
        let fresh = GameState::new(size);
        b.iter(|| legal_moves(black_box(&fresh)));
    });
}

criterion_group!(benches, bench_replay, bench_apply);
criterion_main!(benches);

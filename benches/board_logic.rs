use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_match3::core::{BoardEngine, BoardSnapshot, Grid};
use tui_match3::types::{BoardConfig, Position};

fn bench_new_board(c: &mut Criterion) {
    let mut seed = 0u32;

    c.bench_function("new_board_8x8", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            BoardEngine::with_seed(black_box(BoardConfig::default()), seed)
        })
    });
}

fn bench_stable_sweep(c: &mut Criterion) {
    let mut engine = BoardEngine::with_seed(BoardConfig::new(16, 16, 5), 12345).unwrap();

    c.bench_function("detect_and_clear_stable_16x16", |b| {
        b.iter(|| black_box(engine.detect_and_clear(true)))
    });
}

fn bench_swap_and_resolve(c: &mut Criterion) {
    let mut engine = BoardEngine::with_seed(BoardConfig::default(), 12345).unwrap();
    let a = Position::new(4, 4);
    let b_pos = Position::new(4, 5);

    c.bench_function("swap_and_resolve", |b| {
        b.iter(|| {
            engine.select(a).unwrap();
            engine.swap(b_pos).unwrap();
            black_box(engine.resolve_until_stable(true).unwrap())
        })
    });
}

fn bench_column_collapse(c: &mut Criterion) {
    let mut grid = Grid::filled(8, 8, 1);

    c.bench_function("collapse_column_3", |b| {
        b.iter(|| grid.collapse_column_segment(black_box(3), 5, 7, || 2))
    });
}

fn bench_snapshot_into(c: &mut Criterion) {
    let engine = BoardEngine::with_seed(BoardConfig::default(), 12345).unwrap();
    let mut snap = BoardSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            engine.snapshot_into(&mut snap);
            black_box(snap.board_hash)
        })
    });
}

criterion_group!(
    benches,
    bench_new_board,
    bench_stable_sweep,
    bench_swap_and_resolve,
    bench_column_collapse,
    bench_snapshot_into
);
criterion_main!(benches);

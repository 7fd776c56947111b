//! Per-tick cost of the full schedule.
//!
//! Run with: cargo bench --bench step

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shooter_sim::{FrameTable, InputState, LevelGrid, SimConfig, SimWorld};

/// 150 columns with an enemy every third tile and scattered walls.
fn crowded_level() -> LevelGrid {
    let mut grid = LevelGrid::empty(16, 150);
    grid.fill_row(15, 1);
    grid.set(14, 1, 15);
    for col in (6..150).step_by(3) {
        grid.set(14, col, 16);
    }
    for col in (10..150).step_by(25) {
        grid.set(13, col, 0);
    }
    grid
}

fn bench_tick(c: &mut Criterion) {
    let grid = crowded_level();

    c.bench_function("tick_crowded_level", |b| {
        let mut sim = match SimWorld::load(&grid, SimConfig::default(), FrameTable::default()) {
            Ok(sim) => sim,
            Err(err) => panic!("bench level failed to load: {err}"),
        };
        sim.set_input(InputState {
            move_right: true,
            shoot: true,
            ..Default::default()
        });
        b.iter(|| {
            sim.tick();
            black_box(sim.current_tick());
        })
    });

    c.bench_function("snapshot_json", |b| {
        let mut sim = match SimWorld::load(&grid, SimConfig::default(), FrameTable::default()) {
            Ok(sim) => sim,
            Err(err) => panic!("bench level failed to load: {err}"),
        };
        for _ in 0..60 {
            sim.tick();
        }
        b.iter(|| black_box(sim.snapshot_json()))
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);

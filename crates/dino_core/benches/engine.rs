//! Engine benchmarks for dino_core.
//!
//! Run with: `cargo bench -p dino_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dino_core::prelude::*;

fn crowded_battle(size: i64) -> (Battle, EntityId) {
    let robot = EntityId::new(EntityKind::Robot, 1);
    let center = size / 2;
    let mut battle = Battle::new(BattleId::new(1000).unwrap(), size)
        .unwrap()
        .with_robot(robot, Position::new(center, center), Direction::North)
        .unwrap();
    let mut n = 1;
    for row in 1..=size {
        for col in 1..=size {
            if (row + col) % 3 == 0 && (row, col) != (center, center) && row != center - 1 {
                battle = battle
                    .with_dinosaur(EntityId::new(EntityKind::Dinosaur, n), Position::new(row, col))
                    .unwrap();
                n += 1;
            }
        }
    }
    (battle, robot)
}

/// Benchmarks single commands and blob round trips on a crowded 50x50 board.
pub fn engine_benchmark(c: &mut Criterion) {
    let (battle, robot) = crowded_battle(50);

    c.bench_function("apply_move_forward", |b| {
        b.iter(|| battle.apply(black_box(robot), Action::MoveForward).unwrap())
    });

    c.bench_function("apply_attack", |b| {
        b.iter(|| battle.apply(black_box(robot), Action::Attack).unwrap())
    });

    c.bench_function("serialize_round_trip", |b| {
        b.iter(|| {
            let bytes = black_box(&battle).serialize().unwrap();
            Battle::deserialize(&bytes).unwrap()
        })
    });
}

criterion_group!(benches, engine_benchmark);
criterion_main!(benches);

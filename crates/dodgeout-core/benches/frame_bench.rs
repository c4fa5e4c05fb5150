use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use dodgeout_core::difficulty::Difficulty;
use dodgeout_core::entity::HazardSpawn;
use dodgeout_core::geometry::Position;
use dodgeout_core::resolver::{CollisionResolver, Resolver};
use dodgeout_core::simulation::GameSpace;
use glam::DVec2;

const FRAME: i64 = 16_667;

/// A run with `count` hazards scattered over the arena.
fn crowded_game(count: u32) -> GameSpace {
    let mut game = GameSpace::new(Difficulty::Hard, true, 1);
    for i in 0..count {
        game.spawn_hazard(HazardSpawn {
            position: Position::new(f64::from((i * 37) % 100), f64::from((i * 17) % 50)),
            velocity: DVec2::new(f64::from(i % 7) - 3.0, f64::from(i % 5) - 2.0),
            ..HazardSpawn::default()
        });
    }
    game
}

fn bench_frame(c: &mut Criterion) {
    c.bench_function("frame_update_empty", |b| {
        b.iter_batched(
            || GameSpace::new(Difficulty::Easy, false, 1),
            |mut game| black_box(game.update(FRAME)),
            BatchSize::SmallInput,
        );
    });

    c.bench_function("frame_update_200_hazards", |b| {
        b.iter_batched(
            || crowded_game(200),
            |mut game| black_box(game.update(FRAME)),
            BatchSize::SmallInput,
        );
    });
}

fn bench_collision_pass(c: &mut Criterion) {
    let game = crowded_game(300);
    let mut resolver = CollisionResolver::new();

    c.bench_function("collision_pass_300", |b| {
        b.iter_batched(
            || game.arena().clone(),
            |mut arena| {
                resolver.resolve(&mut arena, FRAME / 4);
                black_box(arena.entity_count())
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_long_run(c: &mut Criterion) {
    c.bench_function("ten_seconds_medium", |b| {
        b.iter(|| {
            let mut game = GameSpace::new(Difficulty::Medium, true, 7);
            for _ in 0..600 {
                game.update(FRAME);
            }
            black_box(game.arena().entity_count())
        });
    });
}

criterion_group!(benches, bench_frame, bench_collision_pass, bench_long_run);
criterion_main!(benches);

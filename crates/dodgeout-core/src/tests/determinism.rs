//! Determinism verification tests.
//!
//! These tests verify that a run produces identical results when:
//! - Started with the same seed and difficulty
//! - Given identical frame times and inputs
//!
//! This is critical for:
//! - Replays
//! - Debug reproducibility

use glam::DVec2;

use crate::difficulty::Difficulty;
use crate::geometry::Position;
use crate::hash::hash_game_space;
use crate::input::Direction;
use crate::simulation::GameSpace;

use super::helpers::{get_position, spawn_moving_hazard, FRAME};

/// Scripted input for frame `i`.
fn inputs_for(i: usize) -> Vec<Direction> {
    match i % 40 {
        0..=9 => vec![Direction::Left],
        10..=14 => vec![Direction::Up, Direction::Right],
        15..=29 => vec![Direction::Right],
        _ => vec![],
    }
}

/// Plays `frames` frames with scripted input, returning the hash after each.
fn scripted_run(seed: u64, frames: usize) -> Vec<u64> {
    let mut game = GameSpace::new(Difficulty::Medium, false, seed);
    let mut hashes = Vec::with_capacity(frames);
    for i in 0..frames {
        game.move_player(&inputs_for(i));
        game.update(FRAME);
        hashes.push(hash_game_space(&game));
    }
    hashes
}

#[test]
fn same_seed_same_run() {
    let a = scripted_run(42, 300);
    let b = scripted_run(42, 300);
    assert_eq!(a, b);
}

#[test]
fn different_seeds_diverge_once_spawning_starts() {
    let run = |seed| {
        let mut game = GameSpace::new(Difficulty::Medium, false, seed);
        for i in 0..120 {
            game.move_player(&inputs_for(i));
            game.update(FRAME);
        }
        game.arena()
            .entities_sorted()
            .filter(|e| e.is_hazard())
            .map(|e| e.body().position)
            .collect::<Vec<_>>()
    };
    let a = run(1);
    let b = run(2);
    assert!(!a.is_empty());
    assert_ne!(a, b);
}

#[test]
fn reset_replays_the_same_run() {
    let mut game = GameSpace::new(Difficulty::Hard, false, 9);
    for _ in 0..180 {
        game.update(FRAME);
    }
    let first = hash_game_space(&game);
    let first_count = game.arena().entity_count();

    game.reset(Difficulty::Hard, false);
    let mut replay = GameSpace::new(Difficulty::Hard, false, 9);
    for _ in 0..180 {
        game.update(FRAME);
        replay.update(FRAME);
    }

    // ids keep counting after a reset, so compare observable state instead
    assert_eq!(game.arena().entity_count(), first_count);
    assert_eq!(game.arena().entity_count(), replay.arena().entity_count());
    let positions = |g: &GameSpace| -> Vec<DVec2> {
        g.arena().entities_sorted().map(|e| e.body().position).collect()
    };
    assert_eq!(positions(&game), positions(&replay));
    assert_eq!(hash_game_space(&replay), first);
}

#[test]
fn uneven_frames_carry_their_remainder() {
    let mut a = GameSpace::new(Difficulty::Easy, false, 5);
    let mut b = GameSpace::new(Difficulty::Easy, false, 5);
    let id_a = spawn_moving_hazard(&mut a, DVec2::new(30.0, 5.0), 3, DVec2::new(1.0, 2.0));
    let id_b = spawn_moving_hazard(&mut b, DVec2::new(30.0, 5.0), 3, DVec2::new(1.0, 2.0));

    // 3 × 5 µs vs one 15 µs frame: the same total elapsed time
    for _ in 0..3 {
        a.update(5);
    }
    b.update(15);

    assert_eq!(a.elapsed() + a.carried_micros(), 15);
    assert_eq!(b.elapsed() + b.carried_micros(), 15);
    assert!(get_position(&a, id_a).is_some());
    assert!(get_position(&b, id_b).is_some());
}

#[test]
fn manual_spawns_are_deterministic() {
    let build = || {
        let mut game = GameSpace::new(Difficulty::Easy, true, 3);
        game.spawn_hazard_at(Position::new(40.0, 20.0));
        game.spawn_hazard_random();
        for _ in 0..60 {
            game.update(FRAME);
        }
        hash_game_space(&game)
    };
    assert_eq!(build(), build());
}

//! Proptest strategies for battle inputs.

use dino_core::battle::Action;
use dino_core::entity::Position;
use dino_core::turning::{Direction, Turn};
use proptest::prelude::*;

/// Any facing direction.
pub fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::CLOCKWISE.to_vec())
}

/// Any turn.
pub fn turn() -> impl Strategy<Value = Turn> {
    prop_oneof![Just(Turn::Left), Just(Turn::Right)]
}

/// Any robot action.
pub fn action() -> impl Strategy<Value = Action> {
    prop::sample::select(Action::ALL.to_vec())
}

/// One-based position on a `size` x `size` board.
pub fn position_on(size: i64) -> impl Strategy<Value = Position> {
    (1..=size, 1..=size).prop_map(|(row, col)| Position::new(row, col))
}

/// One-based position strictly inside a `size` x `size` board, so a step
/// in any direction stays on it.
pub fn interior_position(size: i64) -> impl Strategy<Value = Position> {
    (2..size, 2..size).prop_map(|(row, col)| Position::new(row, col))
}

/// Position that is off a `size` x `size` board.
pub fn position_off(size: i64) -> impl Strategy<Value = Position> {
    prop_oneof![
        (-size..=0, -size..=2 * size),
        (size + 1..=2 * size, -size..=2 * size),
        (1..=size, prop_oneof![-size..=0, size + 1..=2 * size]),
    ]
    .prop_map(|(row, col)| Position::new(row, col))
}

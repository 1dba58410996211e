//! Single-step robot movement.
//!
//! A robot moves one cell along the axis it faces. Forward follows the
//! facing, backwards goes the opposite way; the other axis never changes.

use serde::{Deserialize, Serialize};

use crate::battle::Battle;
use crate::entity::{EntityId, Position};
use crate::error::{BattleError, Result};
use crate::turning::Direction;

/// Direction of travel relative to the robot's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Along the facing.
    Forward,
    /// Against the facing.
    Backward,
}

impl Direction {
    /// `(row, col)` delta of one forward step.
    #[must_use]
    pub const fn forward_delta(self) -> (i64, i64) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

/// Position reached by taking `step` from `from` while facing `facing`.
#[must_use]
pub const fn step_target(from: Position, facing: Direction, step: Step) -> Position {
    let (d_row, d_col) = facing.forward_delta();
    match step {
        Step::Forward => from.offset(d_row, d_col),
        Step::Backward => from.offset(-d_row, -d_col),
    }
}

/// Move a robot one cell, returning the next battle state.
///
/// # Errors
///
/// - [`BattleError::RobotNotFound`] if `robot_id` is not a robot in the battle.
/// - [`BattleError::Blocked`] if the target cell is occupied or off the board.
///
/// The input battle is never modified.
pub fn move_robot(battle: &Battle, robot_id: EntityId, step: Step) -> Result<Battle> {
    let robot = battle.robot(robot_id)?;
    let facing = robot
        .direction
        .ok_or_else(|| BattleError::CorruptState(format!("robot {robot_id} has no direction")))?;
    let from = robot.position;
    let target = step_target(from, facing, step);

    let blocked = || BattleError::Blocked {
        entity: robot_id,
        target,
    };
    let from_cell = battle.board.cell_at(from)?;
    let to_cell = battle.board.cell_at(target).map_err(|_| blocked())?;
    if battle.board.is_occupied(to_cell) {
        tracing::debug!(entity = %robot_id, %target, "Move blocked by occupied cell");
        return Err(blocked());
    }

    let mut updated = battle.clone();
    updated.board.clear(from_cell);
    updated.board.place(to_cell, robot_id);
    if let Some(entity) = updated.entities.get_mut(&robot_id) {
        entity.position = target;
    }
    tracing::debug!(entity = %robot_id, %from, to = %target, "Robot moved");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::BattleId;
    use crate::entity::EntityKind;

    fn robot_id() -> EntityId {
        EntityId::new(EntityKind::Robot, 1)
    }

    fn battle_with_robot(position: Position, facing: Direction) -> Battle {
        Battle::new(BattleId::new(4321).unwrap(), 9)
            .unwrap()
            .with_robot(robot_id(), position, facing)
            .unwrap()
    }

    #[test]
    fn test_step_deltas() {
        let start = Position::new(5, 5);
        assert_eq!(
            step_target(start, Direction::North, Step::Forward),
            Position::new(4, 5)
        );
        assert_eq!(
            step_target(start, Direction::North, Step::Backward),
            Position::new(6, 5)
        );
        assert_eq!(
            step_target(start, Direction::South, Step::Forward),
            Position::new(6, 5)
        );
        assert_eq!(
            step_target(start, Direction::East, Step::Forward),
            Position::new(5, 6)
        );
        assert_eq!(
            step_target(start, Direction::East, Step::Backward),
            Position::new(5, 4)
        );
        assert_eq!(
            step_target(start, Direction::West, Step::Forward),
            Position::new(5, 4)
        );
        assert_eq!(
            step_target(start, Direction::West, Step::Backward),
            Position::new(5, 6)
        );
    }

    #[test]
    fn test_move_forward_north() {
        let battle = battle_with_robot(Position::new(3, 3), Direction::North);

        let moved = move_robot(&battle, robot_id(), Step::Forward).unwrap();

        assert_eq!(moved.entities[&robot_id()].position, Position::new(2, 3));
        let old_cell = moved.board.cell_at(Position::new(3, 3)).unwrap();
        let new_cell = moved.board.cell_at(Position::new(2, 3)).unwrap();
        assert!(!moved.board.is_occupied(old_cell));
        assert_eq!(moved.board.occupant(new_cell), Some(robot_id()));
        assert!(moved.check_invariants().is_ok());
    }

    #[test]
    fn test_move_into_occupied_cell_is_blocked() {
        let dino = EntityId::new(EntityKind::Dinosaur, 2);
        let battle = battle_with_robot(Position::new(3, 3), Direction::North)
            .with_dinosaur(dino, Position::new(4, 3))
            .unwrap();

        let result = move_robot(&battle, robot_id(), Step::Backward);

        assert_eq!(
            result,
            Err(BattleError::Blocked {
                entity: robot_id(),
                target: Position::new(4, 3),
            })
        );
    }

    #[test]
    fn test_move_off_board_is_blocked() {
        let battle = battle_with_robot(Position::new(1, 9), Direction::East);

        assert!(matches!(
            move_robot(&battle, robot_id(), Step::Forward),
            Err(BattleError::Blocked { .. })
        ));
        let north_edge = battle_with_robot(Position::new(1, 1), Direction::South);
        assert!(matches!(
            move_robot(&north_edge, robot_id(), Step::Backward),
            Err(BattleError::Blocked { .. })
        ));
    }

    #[test]
    fn test_dinosaurs_cannot_be_moved() {
        let dino = EntityId::new(EntityKind::Dinosaur, 2);
        let battle = Battle::new(BattleId::new(4321).unwrap(), 9)
            .unwrap()
            .with_dinosaur(dino, Position::new(4, 3))
            .unwrap();

        assert_eq!(
            move_robot(&battle, dino, Step::Forward),
            Err(BattleError::RobotNotFound(dino))
        );
    }
}

//! Facing directions and the turn state machine.
//!
//! Directions form a cycle: turning right walks it clockwise
//! (north, east, south, west), turning left walks it counter-clockwise.
//! Four identical turns always return to the starting direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::battle::Battle;
use crate::entity::EntityId;
use crate::error::{BattleError, Result};

/// Compass direction a robot faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards row 1.
    North,
    /// Towards the last column.
    East,
    /// Towards the last row.
    South,
    /// Towards column 1.
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction after a quarter turn clockwise.
    #[must_use]
    pub const fn turned_right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Direction after a quarter turn counter-clockwise.
    #[must_use]
    pub const fn turned_left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// Apply a turn.
    #[must_use]
    pub const fn turned(self, turn: Turn) -> Self {
        match turn {
            Turn::Left => self.turned_left(),
            Turn::Right => self.turned_right(),
        }
    }

    /// Lower-case name, as accepted by `FromStr`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "north" => Ok(Direction::North),
            "east" => Ok(Direction::East),
            "south" => Ok(Direction::South),
            "west" => Ok(Direction::West),
            other => Err(BattleError::InvalidDirection(other.to_string())),
        }
    }
}

/// Quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    /// Counter-clockwise.
    Left,
    /// Clockwise.
    Right,
}

/// Turn a robot in place, returning the next battle state.
///
/// The input battle is left untouched.
pub fn turn_robot(battle: &Battle, robot_id: EntityId, turn: Turn) -> Result<Battle> {
    let robot = battle.robot(robot_id)?;
    let facing = robot
        .direction
        .ok_or_else(|| BattleError::CorruptState(format!("robot {robot_id} has no direction")))?;
    let next = facing.turned(turn);

    let mut updated = battle.clone();
    if let Some(entity) = updated.entities.get_mut(&robot_id) {
        entity.direction = Some(next);
    }
    tracing::debug!(entity = %robot_id, from = %facing, to = %next, "Robot turned");
    Ok(updated)
}

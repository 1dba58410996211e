//! Error types for the battle engine.

use thiserror::Error;

use crate::battle::BattleId;
use crate::entity::{EntityId, Position};

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Broad category of a [`BattleError`].
///
/// Callers that only need to decide how to react (reject input, report a
/// missing resource, ask the user to retry elsewhere) can match on this
/// instead of every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: ids, directions, actions, positions, sizes.
    Validation,
    /// A battle or entity does not exist.
    NotFound,
    /// The request collides with current state (occupied cell, blocked move).
    Conflict,
    /// A position lies outside the board.
    Range,
    /// Store or state failures the caller cannot fix by changing input.
    Internal,
}

/// Top-level error type for all battle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// Battle id is not a 4-digit number.
    #[error("The battle ID should be 4 digits long, got {0}")]
    InvalidBattleId(String),

    /// Entity id is not of the form `R-NNNN` or `D-NNNN`.
    #[error("Invalid entity ID: {0}")]
    InvalidEntityId(String),

    /// Direction is not one of north, south, east or west.
    #[error("The direction must be north, south, east or west, got {0}")]
    InvalidDirection(String),

    /// Robot action is not one of the supported commands.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Position is not a pair of positive coordinates.
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// Board size must be positive.
    #[error("Invalid board size: {0}")]
    InvalidSize(i64),

    /// No battle is stored under this id.
    #[error("Battle not found: {0}")]
    BattleNotFound(BattleId),

    /// No robot with this id exists in the battle.
    #[error("Robot not found: {0}")]
    RobotNotFound(EntityId),

    /// No entity with this id exists in the battle.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Target cell already holds an entity.
    #[error("Position {0} is not empty")]
    PositionOccupied(Position),

    /// Move target is occupied or off the board.
    #[error("Robot {entity} cannot move to {target}")]
    Blocked {
        /// Robot that tried to move.
        entity: EntityId,
        /// Position it tried to reach.
        target: Position,
    },

    /// A battle is already stored under this id.
    #[error("Battle already exists: {0}")]
    BattleExists(BattleId),

    /// Position lies outside the board.
    #[error("Position {position} is out of range for a {board_size}x{board_size} board")]
    OutOfRange {
        /// Requested position.
        position: Position,
        /// Side length of the board.
        board_size: usize,
    },

    /// Every candidate id collided with an existing one.
    #[error("No free ID found after {attempts} attempts")]
    IdSpaceExhausted {
        /// Number of ids generated before giving up.
        attempts: u32,
    },

    /// Stored state violates the board/registry invariants.
    #[error("Corrupt battle state: {0}")]
    CorruptState(String),

    /// Failed to encode or decode a battle.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Store kept failing after all retries.
    #[error("Store unavailable after {attempts} attempts: {message}")]
    StoreUnavailable {
        /// Attempts made, including the first one.
        attempts: u32,
        /// Last error reported by the store.
        message: String,
    },
}

impl BattleError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBattleId(_)
            | Self::InvalidEntityId(_)
            | Self::InvalidDirection(_)
            | Self::InvalidAction(_)
            | Self::InvalidPosition(_)
            | Self::InvalidSize(_) => ErrorKind::Validation,
            Self::BattleNotFound(_) | Self::RobotNotFound(_) | Self::EntityNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::PositionOccupied(_) | Self::Blocked { .. } | Self::BattleExists(_) => {
                ErrorKind::Conflict
            }
            Self::OutOfRange { .. } => ErrorKind::Range,
            Self::IdSpaceExhausted { .. }
            | Self::CorruptState(_)
            | Self::Serialization(_)
            | Self::StoreUnavailable { .. } => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidBattleId(_) => "invalid_battle_id",
            Self::InvalidEntityId(_) => "invalid_entity_id",
            Self::InvalidDirection(_) => "invalid_direction",
            Self::InvalidAction(_) => "invalid_action",
            Self::InvalidPosition(_) => "invalid_position",
            Self::InvalidSize(_) => "invalid_size",
            Self::BattleNotFound(_) => "battle_not_found",
            Self::RobotNotFound(_) => "robot_not_found",
            Self::EntityNotFound(_) => "entity_not_found",
            Self::PositionOccupied(_) => "position_occupied",
            Self::Blocked { .. } => "blocked",
            Self::BattleExists(_) => "battle_exists",
            Self::OutOfRange { .. } => "out_of_range",
            Self::IdSpaceExhausted { .. } => "id_space_exhausted",
            Self::CorruptState(_) => "corrupt_state",
            Self::Serialization(_) => "serialization",
            Self::StoreUnavailable { .. } => "store_unavailable",
        }
    }
}

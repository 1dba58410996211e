//! Entity identity and attributes.
//!
//! Every entity on a board is either a robot or a dinosaur. The kind is kept
//! as an explicit tag; the `R-NNNN` / `D-NNNN` string is only the external
//! form of an [`EntityId`], produced by `Display` and accepted by `FromStr`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::turning::Direction;

/// Largest number that fits the 4-digit id suffix.
pub const MAX_ID_NUMBER: u16 = 9999;

/// Default number of id draws before giving up on finding a free one.
pub const DEFAULT_ID_RETRY_LIMIT: u32 = 64;

/// Kind of entity occupying a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Player-controlled unit that can turn, move and attack.
    Robot,
    /// Static target.
    Dinosaur,
}

impl EntityKind {
    /// Two-character prefix of ids of this kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            EntityKind::Robot => "R",
            EntityKind::Dinosaur => "D",
        }
    }

    /// Upper-case label used in views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Robot => "ROBOT",
            EntityKind::Dinosaur => "DINOSAUR",
        }
    }
}

/// Identifier of an entity inside a battle.
///
/// Serialized as its string form so stored blobs and views keep the
/// `R-0042` format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    kind: EntityKind,
    number: u16,
}

impl EntityId {
    /// Create an id. `number` is clamped to four digits.
    #[must_use]
    pub fn new(kind: EntityKind, number: u16) -> Self {
        Self {
            kind,
            number: number.min(MAX_ID_NUMBER),
        }
    }

    /// Kind encoded in the id prefix.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        self.kind
    }

    /// Numeric suffix.
    #[must_use]
    pub const fn number(self) -> u16 {
        self.number
    }

    /// Draw a random id of the given kind.
    pub fn random<R: Rng + ?Sized>(kind: EntityKind, rng: &mut R) -> Self {
        Self::new(kind, rng.gen_range(0..=MAX_ID_NUMBER))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}", self.kind.prefix(), self.number)
    }
}

impl FromStr for EntityId {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BattleError::InvalidEntityId(s.to_string());
        let (prefix, digits) = s.split_once('-').ok_or_else(invalid)?;
        let kind = match prefix {
            "R" => EntityKind::Robot,
            "D" => EntityKind::Dinosaur,
            _ => return Err(invalid()),
        };
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = digits.parse().map_err(|_| invalid())?;
        Ok(Self { kind, number })
    }
}

impl TryFrom<String> for EntityId {
    type Error = BattleError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}

/// One-based `(row, col)` board coordinate as seen by callers.
///
/// Converted to a zero-based [`Cell`](crate::board::Cell) only by
/// [`Board::cell_at`](crate::board::Board::cell_at).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row, counted from 1 at the northern edge.
    pub row: i64,
    /// Column, counted from 1 at the western edge.
    pub col: i64,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Position shifted by the given row and column deltas.
    #[must_use]
    pub const fn offset(self, d_row: i64, d_col: i64) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Parse a `"row,col"` pair.
    pub fn parse_pair(s: &str) -> Result<Self> {
        let invalid = || BattleError::InvalidPosition(s.to_string());
        let (row, col) = s.split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse().map_err(|_| invalid())?;
        let col = col.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(row, col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An entity placed in a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier, unique within the battle.
    pub id: EntityId,
    /// Robot or dinosaur.
    pub kind: EntityKind,
    /// Current position.
    pub position: Position,
    /// Facing direction. Always `Some` for robots, `None` for dinosaurs.
    pub direction: Option<Direction>,
}

impl Entity {
    /// Create a robot facing `direction`.
    #[must_use]
    pub fn robot(id: EntityId, position: Position, direction: Direction) -> Self {
        debug_assert_eq!(id.kind(), EntityKind::Robot);
        Self {
            id,
            kind: EntityKind::Robot,
            position,
            direction: Some(direction),
        }
    }

    /// Create a dinosaur.
    #[must_use]
    pub fn dinosaur(id: EntityId, position: Position) -> Self {
        debug_assert_eq!(id.kind(), EntityKind::Dinosaur);
        Self {
            id,
            kind: EntityKind::Dinosaur,
            position,
            direction: None,
        }
    }

    /// Whether this entity is a robot.
    #[must_use]
    pub fn is_robot(&self) -> bool {
        self.kind == EntityKind::Robot
    }

    /// Whether this entity is a dinosaur.
    #[must_use]
    pub fn is_dinosaur(&self) -> bool {
        self.kind == EntityKind::Dinosaur
    }
}

/// Entity registry of a battle, ordered by id.
pub type EntityMap = BTreeMap<EntityId, Entity>;

/// Draw a random id of `kind` that is not yet used in `entities`.
///
/// Gives up with [`BattleError::IdSpaceExhausted`] after `max_attempts` draws.
pub fn generate_entity_id<R: Rng + ?Sized>(
    kind: EntityKind,
    entities: &EntityMap,
    rng: &mut R,
    max_attempts: u32,
) -> Result<EntityId> {
    for attempt in 1..=max_attempts {
        let id = EntityId::random(kind, rng);
        if !entities.contains_key(&id) {
            return Ok(id);
        }
        tracing::debug!(entity = %id, attempt, "Generated entity id collides, retrying");
    }
    Err(BattleError::IdSpaceExhausted {
        attempts: max_attempts,
    })
}

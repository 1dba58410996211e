//! The battle aggregate.
//!
//! A [`Battle`] owns its [`Board`] and entity registry and is loaded, changed
//! and stored as one unit. Every operation here takes `&self` and returns a
//! new battle, so a failed operation can never leave a half-applied change
//! behind: the caller simply keeps the old value.
//!
//! # Example
//!
//! ```
//! use dino_core::battle::{Action, Battle, BattleId};
//! use dino_core::entity::{EntityId, EntityKind, Position};
//! use dino_core::turning::Direction;
//!
//! let robot = EntityId::new(EntityKind::Robot, 1);
//! let battle = Battle::new(BattleId::new(1234)?, 9)?
//!     .with_robot(robot, Position::new(3, 3), Direction::North)?;
//!
//! let (moved, _) = battle.apply(robot, Action::MoveForward)?;
//! assert_eq!(moved.entities[&robot].position, Position::new(2, 3));
//! # Ok::<(), dino_core::error::BattleError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::combat;
use crate::entity::{Entity, EntityId, EntityKind, EntityMap, Position};
use crate::error::{BattleError, Result};
use crate::movement::{self, Step};
use crate::turning::{self, Direction, Turn};

/// Smallest valid battle id.
pub const MIN_BATTLE_ID: u16 = 1000;

/// Largest valid battle id.
pub const MAX_BATTLE_ID: u16 = 9999;

/// Identifier of a battle: a number with exactly four decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct BattleId(u16);

impl BattleId {
    /// Validate and wrap a raw id.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidBattleId`] unless `raw` has exactly
    /// four digits.
    pub fn new(raw: i64) -> Result<Self> {
        u16::try_from(raw)
            .ok()
            .filter(|id| (MIN_BATTLE_ID..=MAX_BATTLE_ID).contains(id))
            .map(Self)
            .ok_or_else(|| BattleError::InvalidBattleId(raw.to_string()))
    }

    /// Draw a random valid id.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(MIN_BATTLE_ID..=MAX_BATTLE_ID))
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BattleId {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BattleError::InvalidBattleId(s.to_string()));
        }
        let raw: i64 = s
            .parse()
            .map_err(|_| BattleError::InvalidBattleId(s.to_string()))?;
        Self::new(raw)
    }
}

impl TryFrom<u16> for BattleId {
    type Error = BattleError;

    fn try_from(raw: u16) -> Result<Self> {
        Self::new(i64::from(raw))
    }
}

impl From<BattleId> for u16 {
    fn from(id: BattleId) -> Self {
        id.0
    }
}

/// Command a robot can be given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Quarter turn counter-clockwise.
    TurnLeft,
    /// Quarter turn clockwise.
    TurnRight,
    /// One step along the facing.
    MoveForward,
    /// One step against the facing.
    MoveBackwards,
    /// Destroy adjacent dinosaurs.
    Attack,
}

impl Action {
    /// Every action, in protocol order.
    pub const ALL: [Action; 5] = [
        Action::TurnLeft,
        Action::TurnRight,
        Action::MoveForward,
        Action::MoveBackwards,
        Action::Attack,
    ];

    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::TurnLeft => "turn-left",
            Action::TurnRight => "turn-right",
            Action::MoveForward => "move-forward",
            Action::MoveBackwards => "move-backwards",
            Action::Attack => "attack",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| BattleError::InvalidAction(s.to_string()))
    }
}

/// What a successful robot command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReport {
    /// Action that was applied.
    pub action: Action,
    /// The commanded robot after the action.
    pub robot: Entity,
    /// Dinosaurs destroyed by an attack, sorted by id.
    pub destroyed: Vec<EntityId>,
}

/// A complete battle: board plus entity registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    /// Store key of this battle.
    pub id: BattleId,
    /// Grid of entity ids.
    pub board: Board,
    /// All entities on the board, keyed by id.
    pub entities: EntityMap,
}

impl Battle {
    /// Create an empty battle on a `size` x `size` board.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidSize`] if `size` is not positive.
    pub fn new(id: BattleId, size: i64) -> Result<Self> {
        Ok(Self {
            id,
            board: Board::new(size)?,
            entities: EntityMap::new(),
        })
    }

    /// Look up an entity of any kind.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::EntityNotFound`] if `id` is not registered.
    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(&id).ok_or(BattleError::EntityNotFound(id))
    }

    /// Look up a robot.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::RobotNotFound`] if there is no entity with this
    /// id or it is not a robot.
    pub fn robot(&self, id: EntityId) -> Result<&Entity> {
        self.entity(id)
            .ok()
            .filter(|entity| entity.is_robot())
            .ok_or(BattleError::RobotNotFound(id))
    }

    /// Robots, ordered by id.
    pub fn robots(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.is_robot())
    }

    /// Dinosaurs, ordered by id.
    pub fn dinosaurs(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.is_dinosaur())
    }

    /// Place `entity` on its recorded position, returning the next state.
    ///
    /// # Errors
    ///
    /// - [`BattleError::OutOfRange`] if the position is off the board.
    /// - [`BattleError::PositionOccupied`] if the cell is taken.
    /// - [`BattleError::CorruptState`] if the id is already registered or a
    ///   robot has no direction.
    pub fn place_entity(&self, entity: Entity) -> Result<Self> {
        let cell = self.board.cell_at(entity.position)?;
        if self.board.is_occupied(cell) {
            return Err(BattleError::PositionOccupied(entity.position));
        }
        if self.entities.contains_key(&entity.id) {
            return Err(BattleError::CorruptState(format!(
                "entity {} is already registered",
                entity.id
            )));
        }
        if entity.kind != entity.id.kind() || entity.is_robot() != entity.direction.is_some() {
            return Err(BattleError::CorruptState(format!(
                "entity {} has inconsistent attributes",
                entity.id
            )));
        }

        let mut updated = self.clone();
        updated.board.place(cell, entity.id);
        updated.entities.insert(entity.id, entity);
        Ok(updated)
    }

    /// Place a robot. See [`Battle::place_entity`].
    pub fn with_robot(self, id: EntityId, position: Position, direction: Direction) -> Result<Self> {
        self.place_entity(Entity::robot(id, position, direction))
    }

    /// Place a dinosaur. See [`Battle::place_entity`].
    pub fn with_dinosaur(self, id: EntityId, position: Position) -> Result<Self> {
        self.place_entity(Entity::dinosaur(id, position))
    }

    /// Apply a robot command, returning the next state and a report.
    ///
    /// # Errors
    ///
    /// - [`BattleError::RobotNotFound`] if `robot_id` is not a robot here.
    /// - [`BattleError::Blocked`] for a move into an occupied or off-board cell.
    pub fn apply(&self, robot_id: EntityId, action: Action) -> Result<(Self, CommandReport)> {
        let (next, destroyed) = match action {
            Action::TurnLeft => (turning::turn_robot(self, robot_id, Turn::Left)?, Vec::new()),
            Action::TurnRight => (turning::turn_robot(self, robot_id, Turn::Right)?, Vec::new()),
            Action::MoveForward => (
                movement::move_robot(self, robot_id, Step::Forward)?,
                Vec::new(),
            ),
            Action::MoveBackwards => (
                movement::move_robot(self, robot_id, Step::Backward)?,
                Vec::new(),
            ),
            Action::Attack => {
                let outcome = combat::attack(self, robot_id)?;
                (outcome.battle, outcome.destroyed)
            }
        };
        let robot = next.robot(robot_id)?.clone();
        Ok((
            next,
            CommandReport {
                action,
                robot,
                destroyed,
            },
        ))
    }

    /// Check that the board and the registry describe the same placement.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::CorruptState`] describing the first mismatch.
    pub fn check_invariants(&self) -> Result<()> {
        let corrupt = |msg: String| Err(BattleError::CorruptState(msg));
        if !self.board.is_well_formed() {
            return corrupt("board grid does not match its size".to_string());
        }
        for (id, entity) in &self.entities {
            if entity.id != *id {
                return corrupt(format!("entity {} is registered under {id}", entity.id));
            }
            if entity.kind != id.kind() {
                return corrupt(format!("entity {id} has kind {:?}", entity.kind));
            }
            if entity.is_robot() != entity.direction.is_some() {
                return corrupt(format!("entity {id} has an invalid direction"));
            }
            let cell = self.board.cell_at(entity.position)?;
            if self.board.occupant(cell) != Some(*id) {
                return corrupt(format!(
                    "entity {id} is not on its cell {}",
                    entity.position
                ));
            }
        }
        let occupied = self.board.occupied_cells().count();
        if occupied != self.entities.len() {
            return corrupt(format!(
                "board holds {occupied} entities but registry has {}",
                self.entities.len()
            ));
        }
        Ok(())
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| BattleError::Serialization(format!("Failed to serialize battle: {e}")))
    }

    /// Deserialize a stored battle and check its invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a battle or the battle is corrupt.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let battle: Self = bincode::deserialize(data).map_err(|e| {
            BattleError::Serialization(format!("Failed to deserialize battle: {e}"))
        })?;
        battle.check_invariants()?;
        Ok(battle)
    }

    /// Number of entities of `kind`.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }
}

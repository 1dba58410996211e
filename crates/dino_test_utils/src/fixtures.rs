//! Test fixtures and helpers.
//!
//! Pre-built battles and entity ids for consistent testing.

use dino_core::battle::{Battle, BattleId};
use dino_core::entity::{EntityId, EntityKind, Position};
use dino_core::turning::Direction;

/// Battle id used by fixtures.
pub const FIXTURE_BATTLE_ID: i64 = 1234;

/// Board size used by most scenarios.
pub const FIXTURE_BOARD_SIZE: i64 = 9;

/// Robot id with the given number.
#[must_use]
pub fn robot(n: u16) -> EntityId {
    EntityId::new(EntityKind::Robot, n)
}

/// Dinosaur id with the given number.
#[must_use]
pub fn dino(n: u16) -> EntityId {
    EntityId::new(EntityKind::Dinosaur, n)
}

/// Fixture battle id.
#[must_use]
pub fn battle_id() -> BattleId {
    BattleId::new(FIXTURE_BATTLE_ID).expect("fixture battle id is valid")
}

/// Builder for battles in tests.
///
/// Panics on invalid placements, since a broken fixture is a broken test.
#[derive(Debug, Clone)]
pub struct BattleBuilder {
    battle: Battle,
    next_robot: u16,
    next_dino: u16,
}

impl BattleBuilder {
    /// Start from an empty board of `size`.
    #[must_use]
    pub fn new(size: i64) -> Self {
        Self {
            battle: Battle::new(battle_id(), size).expect("fixture board size is valid"),
            next_robot: 1,
            next_dino: 1,
        }
    }

    /// Use a different battle id.
    #[must_use]
    pub fn id(mut self, id: BattleId) -> Self {
        self.battle.id = id;
        self
    }

    /// Add a robot with the next free fixture id.
    #[must_use]
    pub fn robot(mut self, row: i64, col: i64, direction: Direction) -> Self {
        let id = robot(self.next_robot);
        self.next_robot += 1;
        self.robot_with_id(id, row, col, direction)
    }

    /// Add a robot with an explicit id.
    #[must_use]
    pub fn robot_with_id(mut self, id: EntityId, row: i64, col: i64, direction: Direction) -> Self {
        self.battle = self
            .battle
            .with_robot(id, Position::new(row, col), direction)
            .expect("fixture robot placement is valid");
        self
    }

    /// Add a dinosaur with the next free fixture id.
    #[must_use]
    pub fn dinosaur(mut self, row: i64, col: i64) -> Self {
        let id = dino(self.next_dino);
        self.next_dino += 1;
        self.dinosaur_with_id(id, row, col)
    }

    /// Add a dinosaur with an explicit id.
    #[must_use]
    pub fn dinosaur_with_id(mut self, id: EntityId, row: i64, col: i64) -> Self {
        self.battle = self
            .battle
            .with_dinosaur(id, Position::new(row, col))
            .expect("fixture dinosaur placement is valid");
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Battle {
        self.battle
    }
}

/// 9x9 board with robot `R-0001` at (3, 3) facing north.
#[must_use]
pub fn lone_robot() -> Battle {
    BattleBuilder::new(FIXTURE_BOARD_SIZE)
        .robot(3, 3, Direction::North)
        .build()
}

/// 9x9 board with robot `R-0001` at (3, 3) and dinosaurs at (4, 3) and (4, 4).
#[must_use]
pub fn robot_beside_dinosaurs() -> Battle {
    BattleBuilder::new(FIXTURE_BOARD_SIZE)
        .robot(3, 3, Direction::North)
        .dinosaur_with_id(dino(1111), 4, 3)
        .dinosaur_with_id(dino(2222), 4, 4)
        .build()
}

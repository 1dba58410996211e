//! Read-only snapshot of a battle for callers outside the engine.

use serde::{Deserialize, Serialize};

use crate::battle::{Battle, BattleId};
use crate::entity::{Entity, EntityId, Position};
use crate::turning::Direction;

/// One entity as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    /// External id, e.g. `R-0042`.
    pub id: EntityId,
    /// `ROBOT` or `DINOSAUR`.
    #[serde(rename = "type")]
    pub kind: String,
    /// One-based position.
    pub position: Position,
    /// Facing, robots only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub direction: Option<Direction>,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind.label().to_string(),
            position: entity.position,
            direction: entity.direction,
        }
    }
}

/// Snapshot of a whole battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleView {
    /// Battle id.
    pub id: BattleId,
    /// Side length of the board.
    pub board_size: usize,
    /// Robots, ordered by id.
    pub robots: Vec<EntityView>,
    /// Dinosaurs, ordered by id.
    pub dinosaurs: Vec<EntityView>,
}

impl From<&Battle> for BattleView {
    fn from(battle: &Battle) -> Self {
        Self {
            id: battle.id,
            board_size: battle.board.size(),
            robots: battle.robots().map(EntityView::from).collect(),
            dinosaurs: battle.dinosaurs().map(EntityView::from).collect(),
        }
    }
}

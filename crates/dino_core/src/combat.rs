//! Adjacency-based attack resolution.
//!
//! A robot attack destroys every dinosaur in the eight cells around the
//! robot. Robots in those cells are never harmed, and an attack with no
//! dinosaur in reach is simply a no-op.

use serde::{Deserialize, Serialize};

use crate::battle::Battle;
use crate::entity::{EntityId, EntityKind};
use crate::error::Result;

/// Result of a resolved attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// Battle state after the attack.
    pub battle: Battle,
    /// Destroyed dinosaurs, sorted by id.
    pub destroyed: Vec<EntityId>,
}

/// Resolve an attack by `robot_id`.
///
/// # Errors
///
/// - [`BattleError::RobotNotFound`](crate::error::BattleError::RobotNotFound)
///   if `robot_id` is not a robot in the battle.
/// - [`BattleError::EntityNotFound`](crate::error::BattleError::EntityNotFound)
///   if a neighbouring cell holds an id missing from the registry.
pub fn attack(battle: &Battle, robot_id: EntityId) -> Result<AttackOutcome> {
    let robot = battle.robot(robot_id)?;
    let origin = battle.board.cell_at(robot.position)?;

    let mut updated = battle.clone();
    let mut destroyed = Vec::new();
    for cell in battle.board.neighbors(origin) {
        let Some(target) = battle.board.occupant(cell) else {
            continue;
        };
        if !battle.entity(target)?.is_dinosaur() {
            continue;
        }
        updated.board.clear(cell);
        updated.entities.remove(&target);
        tracing::debug!(
            attacker = %robot_id,
            entity = %target,
            position = %cell.position(),
            "Dinosaur destroyed"
        );
        destroyed.push(target);
    }
    destroyed.sort_unstable();

    if destroyed.is_empty() {
        tracing::debug!(entity = %robot_id, "Attack found no dinosaurs in reach");
    } else {
        tracing::debug!(
            entity = %robot_id,
            destroyed = destroyed.len(),
            remaining = updated.count(EntityKind::Dinosaur),
            "Attack destroyed dinosaurs"
        );
    }
    Ok(AttackOutcome {
        battle: updated,
        destroyed,
    })
}

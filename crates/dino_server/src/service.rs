//! Battle service with per-battle serialization.
//!
//! The store offers no compare-and-swap, so two load-modify-store cycles on
//! the same battle could interleave and the second write would silently drop
//! the first. [`BattleService`] holds one async mutex per battle id and runs
//! every repository call for that battle under it. Different battles never
//! wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dino_core::battle::{Action, BattleId, CommandReport};
use dino_core::entity::{EntityId, Position};
use dino_core::error::Result;
use dino_core::repository::BattleRepository;
use dino_core::store::BattleStore;
use dino_core::turning::Direction;
use dino_core::view::{BattleView, EntityView};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::config::ServerConfig;
use crate::protocol::{Request, Response};

/// Summary of a created battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedBattle {
    /// New battle id.
    pub id: BattleId,
    /// Side length of its board.
    pub board_size: usize,
}

/// One async mutex per battle id, created on first use and dropped once no
/// task holds or waits for it.
#[derive(Debug, Default)]
struct BattleLocks {
    locks: Mutex<HashMap<BattleId, Arc<AsyncMutex<()>>>>,
}

impl BattleLocks {
    async fn acquire(&self, id: BattleId) -> BattleGuard<'_> {
        let lock = Arc::clone(self.table().entry(id).or_default());
        BattleGuard {
            guard: Some(lock.lock_owned().await),
            locks: self,
            id,
        }
    }

    fn table(&self) -> MutexGuard<'_, HashMap<BattleId, Arc<AsyncMutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, id: BattleId) {
        let mut table = self.table();
        // Clones are only made under the table lock, so a count of one means
        // nobody else holds or waits for this mutex.
        if table.get(&id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            table.remove(&id);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table().len()
    }
}

/// Holds a battle's mutex and prunes the lock table on drop.
struct BattleGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a BattleLocks,
    id: BattleId,
}

impl Drop for BattleGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.release(self.id);
    }
}

/// Entry point for request handlers.
#[derive(Debug)]
pub struct BattleService<S> {
    repository: BattleRepository<S>,
    config: ServerConfig,
    locks: BattleLocks,
    creation: AsyncMutex<()>,
}

impl<S: BattleStore> BattleService<S> {
    /// Create a service over `store`.
    pub fn new(store: S, config: ServerConfig) -> Self {
        Self {
            repository: BattleRepository::with_config(store, config.repository()),
            config,
            locks: BattleLocks::default(),
            creation: AsyncMutex::new(()),
        }
    }

    /// Underlying repository, for read-only inspection.
    pub fn repository(&self) -> &BattleRepository<S> {
        &self.repository
    }

    /// Configuration in use.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Create an empty battle; `size` defaults to the configured board size.
    ///
    /// # Errors
    ///
    /// `BattleError::InvalidSize`, id exhaustion and store failures.
    pub async fn create_battle(&self, size: Option<i64>) -> Result<CreatedBattle> {
        let size = size.unwrap_or(self.config.default_board_size);
        // Id choice and first write must not interleave with another creation.
        let _guard = self.creation.lock().await;
        let battle = self.repository.create_battle(size)?;
        Ok(CreatedBattle {
            id: battle.id,
            board_size: battle.board.size(),
        })
    }

    /// Place a robot.
    ///
    /// # Errors
    ///
    /// `BattleError::BattleNotFound`, `BattleError::OutOfRange`,
    /// `BattleError::PositionOccupied` and store failures.
    pub async fn place_robot(
        &self,
        battle_id: BattleId,
        position: Position,
        direction: Direction,
    ) -> Result<EntityId> {
        let _guard = self.locks.acquire(battle_id).await;
        self.repository
            .place_robot(battle_id, position, direction)
            .map(|entity| entity.id)
    }

    /// Place a dinosaur.
    ///
    /// # Errors
    ///
    /// Same as [`Self::place_robot`].
    pub async fn place_dinosaur(&self, battle_id: BattleId, position: Position) -> Result<EntityId> {
        let _guard = self.locks.acquire(battle_id).await;
        self.repository
            .place_dinosaur(battle_id, position)
            .map(|entity| entity.id)
    }

    /// Command a robot.
    ///
    /// # Errors
    ///
    /// `BattleError::BattleNotFound`, `BattleError::RobotNotFound`,
    /// `BattleError::Blocked` and store failures.
    pub async fn command_robot(
        &self,
        battle_id: BattleId,
        robot_id: EntityId,
        action: Action,
    ) -> Result<CommandReport> {
        let _guard = self.locks.acquire(battle_id).await;
        self.repository.command(battle_id, robot_id, action)
    }

    /// Snapshot a battle.
    ///
    /// # Errors
    ///
    /// `BattleError::BattleNotFound` and store failures.
    pub async fn get_state(&self, battle_id: BattleId) -> Result<BattleView> {
        let _guard = self.locks.acquire(battle_id).await;
        self.repository.state(battle_id)
    }

    /// Handle one protocol request. Never fails; errors become responses.
    pub async fn handle(&self, request: Request) -> Response {
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(code = err.code(), error = %err, "Request failed");
                Response::from(err)
            }
        }
    }

    async fn dispatch(&self, request: Request) -> Result<Response> {
        let response = match request {
            Request::CreateBattle { size } => {
                let created = self.create_battle(size).await?;
                Response::BattleCreated {
                    id: created.id.get(),
                    board_size: created.board_size,
                }
            }
            Request::PlaceRobot {
                battle_id,
                at,
                direction,
            } => {
                let battle_id = BattleId::new(battle_id)?;
                let position = at.resolve()?;
                let direction: Direction = direction.parse()?;
                let id = self.place_robot(battle_id, position, direction).await?;
                Response::EntityPlaced {
                    entity_id: id.to_string(),
                }
            }
            Request::PlaceDinosaur { battle_id, at } => {
                let battle_id = BattleId::new(battle_id)?;
                let id = self.place_dinosaur(battle_id, at.resolve()?).await?;
                Response::EntityPlaced {
                    entity_id: id.to_string(),
                }
            }
            Request::Command {
                battle_id,
                robot,
                action,
            } => {
                let battle_id = BattleId::new(battle_id)?;
                let action: Action = action.parse()?;
                let robot: EntityId = robot.parse()?;
                let report = self.command_robot(battle_id, robot, action).await?;
                Response::Ack {
                    action: report.action.to_string(),
                    robot: EntityView::from(&report.robot),
                    destroyed: report.destroyed.iter().map(ToString::to_string).collect(),
                }
            }
            Request::State { battle_id } => {
                let battle = self.get_state(BattleId::new(battle_id)?).await?;
                Response::State { battle }
            }
            Request::Health => Response::Health {
                status: "pass".to_string(),
            },
        };
        Ok(response)
    }
}

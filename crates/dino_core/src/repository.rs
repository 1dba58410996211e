//! Battle persistence and command orchestration.
//!
//! [`BattleRepository`] is the only component that talks to the store. Each
//! operation loads the whole battle, computes the next state with the pure
//! engine functions, and writes the whole battle back only if that succeeded.
//!
//! # Concurrency
//!
//! The repository does not serialize concurrent load-modify-store cycles on
//! the same battle; two commands racing on one id can lose an update. Callers
//! that share a repository between tasks must hold a per-battle lock around
//! each mutating call (see `dino_server::BattleService`).

use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::battle::{Action, Battle, BattleId, CommandReport};
use crate::board::Board;
use crate::entity::{
    generate_entity_id, Entity, EntityId, EntityKind, Position, DEFAULT_ID_RETRY_LIMIT,
};
use crate::error::{BattleError, Result};
use crate::store::{BattleStore, StoreError};
use crate::turning::Direction;
use crate::view::BattleView;

/// Default number of attempts for each store call.
pub const DEFAULT_STORE_ATTEMPTS: u32 = 3;

/// Tunables for a [`BattleRepository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Attempts per store call before reporting the store unavailable.
    pub store_attempts: u32,
    /// Random draws per id before giving up.
    pub id_retry_limit: u32,
    /// Seed for id generation; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            store_attempts: DEFAULT_STORE_ATTEMPTS,
            id_retry_limit: DEFAULT_ID_RETRY_LIMIT,
            rng_seed: None,
        }
    }
}

/// Loads, changes and stores battles through an injected [`BattleStore`].
#[derive(Debug)]
pub struct BattleRepository<S> {
    store: S,
    config: RepositoryConfig,
    rng: Mutex<ChaCha8Rng>,
}

impl<S: BattleStore> BattleRepository<S> {
    /// Create a repository with default settings.
    pub fn new(store: S) -> Self {
        Self::with_config(store, RepositoryConfig::default())
    }

    /// Create a repository with explicit settings.
    pub fn with_config(store: S, config: RepositoryConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            store,
            config,
            rng: Mutex::new(rng),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Settings in use.
    pub fn config(&self) -> RepositoryConfig {
        self.config
    }

    /// Load a battle. `Ok(None)` means no battle is stored under `id`.
    ///
    /// # Errors
    ///
    /// Store failures and corrupt blobs.
    pub fn get_battle(&self, id: BattleId) -> Result<Option<Battle>> {
        let Some(bytes) = self.with_retry("get", id, |store| store.get(id))? else {
            return Ok(None);
        };
        let battle = Battle::deserialize(&bytes)?;
        if battle.id != id {
            return Err(BattleError::CorruptState(format!(
                "blob under {id} belongs to battle {}",
                battle.id
            )));
        }
        Ok(Some(battle))
    }

    /// Load a battle that must exist.
    ///
    /// # Errors
    ///
    /// [`BattleError::BattleNotFound`] if absent, plus [`Self::get_battle`]'s errors.
    pub fn load(&self, id: BattleId) -> Result<Battle> {
        self.get_battle(id)?.ok_or(BattleError::BattleNotFound(id))
    }

    /// Write the whole battle, replacing what is stored.
    ///
    /// # Errors
    ///
    /// Serialization or store failures.
    pub fn update_battle(&self, battle: &Battle) -> Result<()> {
        let bytes = battle.serialize()?;
        self.with_retry("set", battle.id, |store| store.set(battle.id, bytes.clone()))
    }

    /// Create and store an empty battle under a fresh random id.
    ///
    /// # Errors
    ///
    /// [`BattleError::InvalidSize`], [`BattleError::IdSpaceExhausted`] if no
    /// unused id was drawn, and store failures.
    pub fn create_battle(&self, size: i64) -> Result<Battle> {
        Board::new(size)?;
        for _ in 0..self.config.id_retry_limit {
            let id = BattleId::random(&mut *self.rng());
            if self.blob_exists(id)? {
                tracing::debug!(battle_id = %id, "Battle id taken, retrying");
                continue;
            }
            let battle = Battle::new(id, size)?;
            self.update_battle(&battle)?;
            tracing::info!(battle_id = %id, size, "Battle created");
            return Ok(battle);
        }
        Err(BattleError::IdSpaceExhausted {
            attempts: self.config.id_retry_limit,
        })
    }

    /// Create and store an empty battle under `id`.
    ///
    /// # Errors
    ///
    /// [`BattleError::BattleExists`] if `id` is taken, plus
    /// [`Self::create_battle`]'s errors.
    pub fn create_battle_with_id(&self, id: BattleId, size: i64) -> Result<Battle> {
        let battle = Battle::new(id, size)?;
        if self.blob_exists(id)? {
            return Err(BattleError::BattleExists(id));
        }
        self.update_battle(&battle)?;
        tracing::info!(battle_id = %id, size, "Battle created");
        Ok(battle)
    }

    /// Place a new robot and store the battle.
    ///
    /// # Errors
    ///
    /// [`BattleError::BattleNotFound`], [`BattleError::OutOfRange`],
    /// [`BattleError::PositionOccupied`], id exhaustion and store failures.
    pub fn place_robot(
        &self,
        id: BattleId,
        position: Position,
        direction: Direction,
    ) -> Result<Entity> {
        self.place(id, EntityKind::Robot, position, Some(direction))
    }

    /// Place a new dinosaur and store the battle.
    ///
    /// # Errors
    ///
    /// Same as [`Self::place_robot`].
    pub fn place_dinosaur(&self, id: BattleId, position: Position) -> Result<Entity> {
        self.place(id, EntityKind::Dinosaur, position, None)
    }

    /// Apply `action` to a robot and store the battle.
    ///
    /// # Errors
    ///
    /// [`BattleError::BattleNotFound`], [`BattleError::RobotNotFound`],
    /// [`BattleError::Blocked`] and store failures. On error nothing is written.
    pub fn command(
        &self,
        id: BattleId,
        robot_id: EntityId,
        action: Action,
    ) -> Result<CommandReport> {
        let battle = self.load(id)?;
        let (next, report) = battle.apply(robot_id, action).map_err(|e| {
            tracing::warn!(battle_id = %id, entity = %robot_id, %action, error = %e, "Command rejected");
            e
        })?;
        self.update_battle(&next)?;
        tracing::debug!(battle_id = %id, entity = %robot_id, %action, "Command applied");
        Ok(report)
    }

    /// Snapshot of a stored battle.
    ///
    /// # Errors
    ///
    /// [`BattleError::BattleNotFound`] and store failures.
    pub fn state(&self, id: BattleId) -> Result<BattleView> {
        self.load(id).map(|battle| BattleView::from(&battle))
    }

    fn place(
        &self,
        id: BattleId,
        kind: EntityKind,
        position: Position,
        direction: Option<Direction>,
    ) -> Result<Entity> {
        let battle = self.load(id)?;
        battle.board.cell_at(position)?;
        let entity_id = generate_entity_id(
            kind,
            &battle.entities,
            &mut *self.rng(),
            self.config.id_retry_limit,
        )?;
        let entity = match direction {
            Some(direction) => Entity::robot(entity_id, position, direction),
            None => Entity::dinosaur(entity_id, position),
        };
        let next = battle.place_entity(entity.clone())?;
        self.update_battle(&next)?;
        tracing::info!(battle_id = %id, entity = %entity_id, %position, "Entity placed");
        Ok(entity)
    }

    fn blob_exists(&self, id: BattleId) -> Result<bool> {
        self.with_retry("get", id, |store| store.get(id))
            .map(|blob| blob.is_some())
    }

    fn rng(&self) -> std::sync::MutexGuard<'_, ChaCha8Rng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_retry<T>(
        &self,
        op: &str,
        id: BattleId,
        mut call: impl FnMut(&S) -> std::result::Result<T, StoreError>,
    ) -> Result<T> {
        let attempts = self.config.store_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match call(&self.store) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < attempts => {
                    tracing::warn!(battle_id = %id, op, attempt, error = %err, "Store call failed, retrying");
                }
                Err(err) => {
                    tracing::error!(battle_id = %id, op, attempt, error = %err, "Store unavailable");
                    return Err(BattleError::StoreUnavailable {
                        attempts: attempt,
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}

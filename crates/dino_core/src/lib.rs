//! # Dino Core
//!
//! Battle state engine for Dino Extinction.
//!
//! Robots and dinosaurs share a square board. Robots can turn, step forward
//! or backwards, and attack the dinosaurs around them. Every battle is stored
//! as a single blob in an external key-value store.
//!
//! This crate contains:
//! - Pure state transitions on a [`battle::Battle`] value (no IO)
//! - The [`store::BattleStore`] contract and an in-memory implementation
//! - [`repository::BattleRepository`], which loads, changes and stores battles
//!
//! ## Crate Structure
//!
//! - [`board`] - Grid of cells and coordinate conversion
//! - [`entity`] - Entity ids, kinds, positions and id generation
//! - [`turning`] - Facing directions and turns
//! - [`movement`] - Single-step movement
//! - [`combat`] - Adjacency attacks
//! - [`battle`] - The battle aggregate and robot commands
//! - [`view`] - Read-only battle snapshots
//! - [`store`] - Key-value store contract
//! - [`repository`] - Persistence and command orchestration

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle;
pub mod board;
pub mod combat;
pub mod entity;
pub mod error;
pub mod movement;
pub mod repository;
pub mod store;
pub mod turning;
pub mod view;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battle::{Action, Battle, BattleId, CommandReport};
    pub use crate::board::{Board, Cell};
    pub use crate::entity::{Entity, EntityId, EntityKind, Position};
    pub use crate::error::{BattleError, ErrorKind, Result};
    pub use crate::repository::{BattleRepository, RepositoryConfig};
    pub use crate::store::{BattleStore, InMemoryStore, StoreError};
    pub use crate::turning::{Direction, Turn};
    pub use crate::view::{BattleView, EntityView};
}

//! Key-value store contract.
//!
//! Battles are persisted as opaque byte blobs keyed by [`BattleId`]. The
//! engine only needs `get` and `set`; anything else (eviction, replication,
//! connection pooling) belongs to the store implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::battle::BattleId;

/// Error reported by a [`BattleStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached. Worth retrying.
    #[error("Store connection failed: {0}")]
    Connection(String),
    /// The store refused the operation. Retrying will not help.
    #[error("Store rejected the operation: {0}")]
    Rejected(String),
}

impl StoreError {
    /// Whether a retry may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }
}

/// Opaque blob store for battles.
///
/// Implementations must be safe to share between threads.
pub trait BattleStore: Send + Sync {
    /// Read the blob stored under `key`, or `None` if there is none.
    fn get(&self, key: BattleId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing anything already there.
    fn set(&self, key: BattleId, value: Vec<u8>) -> Result<(), StoreError>;
}

impl<S: BattleStore + ?Sized> BattleStore for Arc<S> {
    fn get(&self, key: BattleId) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: BattleId, value: Vec<u8>) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    blobs: RwLock<HashMap<BattleId, Vec<u8>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored battles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().map_or(0, |blobs| blobs.len())
    }

    /// Whether no battle is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BattleStore for InMemoryStore {
    fn get(&self, key: BattleId) -> Result<Option<Vec<u8>>, StoreError> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| StoreError::Rejected("store lock poisoned".to_string()))?;
        Ok(blobs.get(&key).cloned())
    }

    fn set(&self, key: BattleId, value: Vec<u8>) -> Result<(), StoreError> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| StoreError::Rejected("store lock poisoned".to_string()))?;
        blobs.insert(key, value);
        Ok(())
    }
}

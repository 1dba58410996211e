//! Store fakes.
//!
//! Wrappers around [`InMemoryStore`] that misbehave in controlled ways.

use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use dino_core::battle::BattleId;
use dino_core::store::{BattleStore, InMemoryStore, StoreError};

/// Store whose first `failures` calls fail with a connection error.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    remaining_failures: AtomicU32,
    calls: AtomicU32,
}

impl FlakyStore {
    /// Fail the next `failures` calls, then behave.
    #[must_use]
    pub fn failing(failures: u32) -> Self {
        Self {
            inner: InMemoryStore::new(),
            remaining_failures: AtomicU32::new(failures),
            calls: AtomicU32::new(0),
        }
    }

    /// Fail the next `failures` calls from now on.
    pub fn fail_next(&self, failures: u32) {
        self.remaining_failures.store(failures, Ordering::SeqCst);
    }

    /// Total calls seen, failed ones included.
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn trip(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            tracing::debug!("FlakyStore dropping call");
            Err(StoreError::Connection("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

impl BattleStore for FlakyStore {
    fn get(&self, key: BattleId) -> Result<Option<Vec<u8>>, StoreError> {
        self.trip()?;
        self.inner.get(key)
    }

    fn set(&self, key: BattleId, value: Vec<u8>) -> Result<(), StoreError> {
        self.trip()?;
        self.inner.set(key, value)
    }
}

/// Store that sleeps on every read, widening the window between a
/// load and the following write.
#[derive(Debug)]
pub struct SlowStore {
    inner: InMemoryStore,
    delay: Duration,
}

impl SlowStore {
    /// Sleep `delay` before every `get`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryStore::new(),
            delay,
        }
    }
}

impl BattleStore for SlowStore {
    fn get(&self, key: BattleId) -> Result<Option<Vec<u8>>, StoreError> {
        thread::sleep(self.delay);
        self.inner.get(key)
    }

    fn set(&self, key: BattleId, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.set(key, value)
    }
}

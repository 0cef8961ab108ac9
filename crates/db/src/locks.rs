//! In-process write locks per pool and currency.
//!
//! A balance check reads the whole ledger of the source pool and then inserts.
//! Two writers debiting the same pool could both pass the check before either
//! commits, so writers hold the pool's lock from the check until the commit.
//! Locks are only shared by repositories that share a [`PoolLocks`].
//! A pool's entry is dropped from the registry once no writer holds or
//! awaits it.

use std::collections::BTreeSet;
use std::sync::Arc;

use caja_core::ledger::Pool;
use caja_shared::types::{Currency, UserId};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Identifies one balance: a user's pool in one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolKey {
    /// Owner.
    pub user: UserId,
    /// Pool.
    pub pool: Pool,
    /// Currency of the balance.
    pub currency: Currency,
}

impl PoolKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(user: UserId, pool: Pool, currency: Currency) -> Self {
        Self {
            user,
            pool,
            currency,
        }
    }
}

/// Registry of per-pool async mutexes.
#[derive(Debug, Clone, Default)]
pub struct PoolLocks {
    inner: Arc<DashMap<PoolKey, Arc<Mutex<()>>>>,
}

/// Holds the locks of every pool a write touches; released on drop.
#[derive(Debug)]
pub struct PoolGuard {
    guards: Vec<OwnedMutexGuard<()>>,
    keys: Vec<PoolKey>,
    registry: Arc<DashMap<PoolKey, Arc<Mutex<()>>>>,
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        self.guards.clear();
        for key in &self.keys {
            // The map's own reference is the only one left when nobody waits.
            self.registry.remove_if(key, |_, mutex| Arc::strong_count(mutex) == 1);
        }
    }
}

impl PoolLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks every key, in key order, waiting as needed.
    ///
    /// Duplicate keys are locked once. Acquiring in a fixed order keeps two
    /// writers touching the same pair of pools from deadlocking.
    pub async fn lock(&self, keys: impl IntoIterator<Item = PoolKey>) -> PoolGuard {
        let keys: BTreeSet<PoolKey> = keys.into_iter().collect();
        let keys: Vec<PoolKey> = keys.into_iter().collect();
        let mut guards = Vec::with_capacity(keys.len());
        for key in &keys {
            let mutex = self.mutex(*key);
            guards.push(mutex.lock_owned().await);
        }
        PoolGuard {
            guards,
            keys,
            registry: Arc::clone(&self.inner),
        }
    }

    /// Number of pools currently locked or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no pool is locked or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn mutex(&self, key: PoolKey) -> Arc<Mutex<()>> {
        Arc::clone(self.inner.entry(key).or_default().value())
    }
}

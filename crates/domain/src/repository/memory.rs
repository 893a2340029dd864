use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use crate::aggregate::{Aggregate, Record};
use crate::error::RepositoryError;
use crate::player::Player;

use super::{CollectionRepository, PlayerRepository, Repository, Result};

/// In-memory repository for testing and for the composition root.
///
/// Stores one record per identity, the same shape a file or database adapter
/// would persist. Clones share storage.
pub struct InMemoryRepository<A: Aggregate> {
    records: Arc<RwLock<BTreeMap<A::Id, Value>>>,
    saves: Arc<AtomicUsize>,
}

impl<A: Aggregate> InMemoryRepository<A> {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the number of stored aggregates.
    pub fn len(&self) -> usize {
        self.read().map_or(0, |records| records.len())
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every stored aggregate.
    pub fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    /// Returns how many times `save` has succeeded.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<A::Id, Value>>> {
        self.records
            .read()
            .map_err(|_| RepositoryError::Storage("repository lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<A::Id, Value>>> {
        self.records
            .write()
            .map_err(|_| RepositoryError::Storage("repository lock poisoned".to_string()))
    }
}

impl<A: Aggregate> Clone for InMemoryRepository<A> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            saves: Arc::clone(&self.saves),
        }
    }
}

impl<A: Aggregate> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> std::fmt::Debug for InMemoryRepository<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("aggregate_type", &A::aggregate_type())
            .field("len", &self.len())
            .finish()
    }
}

impl<A> Repository<A> for InMemoryRepository<A>
where
    A: Aggregate + Record,
{
    fn get(&self, id: A::Id) -> Result<Option<A>> {
        let record = self.read()?.get(&id).cloned();
        record.map(A::from_record).transpose()
    }

    fn save(&self, aggregate: &A) -> Result<()> {
        let record = aggregate.to_record()?;
        self.write()?.insert(aggregate.id(), record);
        self.saves.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(
            aggregate_type = A::aggregate_type(),
            id = %aggregate.id(),
            "record stored"
        );
        Ok(())
    }
}

impl<A> CollectionRepository<A> for InMemoryRepository<A>
where
    A: Aggregate + Record,
{
    fn get_all(&self) -> Result<Vec<A>> {
        let records: Vec<Value> = self.read()?.values().cloned().collect();
        records.into_iter().map(A::from_record).collect()
    }
}

impl PlayerRepository for InMemoryRepository<Player> {
    fn get_by_name(&self, name: &str) -> Result<Option<Player>> {
        Ok(self.get_all()?.into_iter().find(|player| player.name() == name))
    }
}

//! PRECINCT Storage - Entity Store Trait and In-Memory Implementation
//!
//! Each record type lives in its own collection, kept in insertion order.
//! Data lives for the lifetime of the process only.

use precinct_core::{
    new_entity_id, Agent, Case, EntityId, Record, StorageError, StorageResult,
};
use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Ordered id-to-record collection for one record type.
///
/// Lookup-then-mutate happens under a single lock acquisition, so concurrent
/// writers never observe each other half-way.
pub trait EntityStore<R: Record>: Send + Sync {
    /// Snapshot of every record, in insertion order.
    fn list(&self) -> StorageResult<Vec<R>>;

    fn get(&self, id: EntityId) -> StorageResult<Option<R>>;

    fn exists(&self, id: EntityId) -> StorageResult<bool>;

    /// Store a new record under a freshly issued identifier.
    fn create(&self, input: R::Input) -> StorageResult<R>;

    /// Overwrite every mutable field. `None` when the id is unknown.
    fn replace(&self, id: EntityId, input: R::Input) -> StorageResult<Option<R>>;

    /// Overwrite the fields present in `patch`. `None` when the id is unknown.
    fn merge(&self, id: EntityId, patch: R::Patch) -> StorageResult<Option<R>>;

    /// Remove a record. Returns whether it existed.
    fn delete(&self, id: EntityId) -> StorageResult<bool>;

    fn len(&self) -> StorageResult<usize>;

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug)]
struct Collection<R> {
    records: Vec<R>,
    /// Every identifier ever handed out, including deleted ones. Grows by one
    /// entry per create and is never pruned, so a deleted id stays reserved
    /// for the life of the process.
    issued: HashSet<EntityId>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            issued: HashSet::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    fn position(&self, id: EntityId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn issue_id(&mut self) -> EntityId {
        loop {
            let id = new_entity_id();
            if self.issued.insert(id) {
                return id;
            }
        }
    }
}

/// Process-local store guarded by one `RwLock`.
#[derive(Debug)]
pub struct InMemoryStore<R> {
    inner: RwLock<Collection<R>>,
}

impl<R> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Collection::default()),
        }
    }
}

impl<R: Record> InMemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StorageError {
        StorageError::LockPoisoned {
            collection: R::ENTITY_NAME,
        }
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Collection<R>>> {
        self.inner.read().map_err(|_| Self::poisoned())
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Collection<R>>> {
        self.inner.write().map_err(|_| Self::poisoned())
    }
}

impl<R: Record> EntityStore<R> for InMemoryStore<R> {
    fn list(&self) -> StorageResult<Vec<R>> {
        Ok(self.read()?.records.clone())
    }

    fn get(&self, id: EntityId) -> StorageResult<Option<R>> {
        let collection = self.read()?;
        Ok(collection.position(id).map(|idx| collection.records[idx].clone()))
    }

    fn exists(&self, id: EntityId) -> StorageResult<bool> {
        Ok(self.read()?.position(id).is_some())
    }

    fn create(&self, input: R::Input) -> StorageResult<R> {
        let mut collection = self.write()?;
        let record = R::from_input(collection.issue_id(), input);
        collection.records.push(record.clone());
        Ok(record)
    }

    fn replace(&self, id: EntityId, input: R::Input) -> StorageResult<Option<R>> {
        let mut collection = self.write()?;
        let Some(idx) = collection.position(id) else {
            return Ok(None);
        };
        let record = &mut collection.records[idx];
        record.replace(input);
        Ok(Some(record.clone()))
    }

    fn merge(&self, id: EntityId, patch: R::Patch) -> StorageResult<Option<R>> {
        let mut collection = self.write()?;
        let Some(idx) = collection.position(id) else {
            return Ok(None);
        };
        let record = &mut collection.records[idx];
        record.merge(patch);
        Ok(Some(record.clone()))
    }

    fn delete(&self, id: EntityId) -> StorageResult<bool> {
        let mut collection = self.write()?;
        match collection.position(id) {
            Some(idx) => {
                collection.records.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.read()?.records.len())
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// The collections owned by one running service.
#[derive(Debug, Default)]
pub struct Stores {
    pub agents: InMemoryStore<Agent>,
    pub cases: InMemoryStore<Case>,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// TESTS
// ============================================================================

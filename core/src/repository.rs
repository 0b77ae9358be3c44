//! Repository capability over entity collections.
//!
//! RULE: Lookups by unknown id are errors, never silent no-ops.
//! InMemoryRepository is the only working adapter. SqlRepository
//! exists so callers can be written against the trait; every call
//! on it fails with UnsupportedBackend.

use crate::{
    error::{SimError, SimResult},
    model::Entity,
    types::EntityId,
};
use std::collections::BTreeMap;
use std::marker::PhantomData;

pub trait Repository<T: Entity> {
    fn get(&self, id: EntityId) -> SimResult<T>;
    fn all(&self) -> SimResult<Vec<T>>;
    fn add(&mut self, item: T) -> SimResult<()>;
    fn update(&mut self, item: T) -> SimResult<()>;
    fn delete(&mut self, id: EntityId) -> SimResult<T>;
    fn clear(&mut self) -> SimResult<()>;
    fn count(&self) -> SimResult<usize>;
}

/// Entities keyed by id, iterated in ascending id order.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryRepository<T: Entity> {
    items: BTreeMap<EntityId, T>,
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self { items: BTreeMap::new() }
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_ref(&self, id: EntityId) -> SimResult<&T> {
        self.items
            .get(&id)
            .ok_or(SimError::NotFound { kind: T::KIND, id })
    }

    pub fn get_mut(&mut self, id: EntityId) -> SimResult<&mut T> {
        self.items
            .get_mut(&id)
            .ok_or(SimError::NotFound { kind: T::KIND, id })
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.items.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build from a list, rejecting duplicate ids.
    pub fn from_items(items: Vec<T>) -> SimResult<Self> {
        let mut repo = Self::new();
        for item in items {
            repo.add(item)?;
        }
        Ok(repo)
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    fn get(&self, id: EntityId) -> SimResult<T> {
        self.get_ref(id).cloned()
    }

    fn all(&self) -> SimResult<Vec<T>> {
        Ok(self.items.values().cloned().collect())
    }

    fn add(&mut self, item: T) -> SimResult<()> {
        let id = item.id();
        if self.items.contains_key(&id) {
            return Err(SimError::DuplicateKey { kind: T::KIND, id });
        }
        self.items.insert(id, item);
        Ok(())
    }

    fn update(&mut self, item: T) -> SimResult<()> {
        let slot = self.get_mut(item.id())?;
        *slot = item;
        Ok(())
    }

    fn delete(&mut self, id: EntityId) -> SimResult<T> {
        self.items
            .remove(&id)
            .ok_or(SimError::NotFound { kind: T::KIND, id })
    }

    fn clear(&mut self) -> SimResult<()> {
        self.items.clear();
        Ok(())
    }

    fn count(&self) -> SimResult<usize> {
        Ok(self.items.len())
    }
}

/// Placeholder for a database-backed repository. Not implemented.
#[derive(Debug, Clone)]
pub struct SqlRepository<T: Entity> {
    pub url: String,
    _entity: PhantomData<T>,
}

impl<T: Entity> SqlRepository<T> {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), _entity: PhantomData }
    }

    fn unsupported<R>(operation: &'static str) -> SimResult<R> {
        Err(SimError::UnsupportedBackend { backend: "sql", operation })
    }
}

impl<T: Entity> Repository<T> for SqlRepository<T> {
    fn get(&self, _id: EntityId) -> SimResult<T> { Self::unsupported("get") }
    fn all(&self) -> SimResult<Vec<T>> { Self::unsupported("all") }
    fn add(&mut self, _item: T) -> SimResult<()> { Self::unsupported("add") }
    fn update(&mut self, _item: T) -> SimResult<()> { Self::unsupported("update") }
    fn delete(&mut self, _id: EntityId) -> SimResult<T> { Self::unsupported("delete") }
    fn clear(&mut self) -> SimResult<()> { Self::unsupported("clear") }
    fn count(&self) -> SimResult<usize> { Self::unsupported("count") }
}

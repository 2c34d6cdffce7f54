use std::{hash::Hash, sync::Arc};

use parking_lot::RwLock;

use crate::{CappedSet, SetError, ZeroCapacity};

/// Cloneable handle to a [`CappedSet`] shared across threads.
///
/// Mutations take the write lock, queries take the read lock. Each call is
/// one critical section, so no caller ever sees a half-applied operation.
/// Use [`read`](Self::read) to look at several fields under a single guard.
pub struct SharedCappedSet<K, S> {
    inner: Arc<RwLock<CappedSet<K, S>>>,
}

impl<K, S> Clone for SharedCappedSet<K, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, S> From<CappedSet<K, S>> for SharedCappedSet<K, S> {
    fn from(set: CappedSet<K, S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(set)),
        }
    }
}

impl<K, S> SharedCappedSet<K, S>
where
    K: Hash + Eq + Clone,
    S: Ord + Copy + Default,
{
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        CappedSet::with_capacity(capacity).into()
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, ZeroCapacity> {
        CappedSet::try_with_capacity(capacity).map(Self::from)
    }

    pub fn insert(&self, key: K, score: S) -> Result<Option<(K, S)>, SetError> {
        self.inner.write().insert(key, score)
    }

    pub fn update(&self, key: &K, score: S) -> Result<S, SetError> {
        self.inner.write().update(key, score)
    }

    pub fn remove(&self, key: &K) -> Result<S, SetError> {
        self.inner.write().remove(key)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn get_score(&self, key: &K) -> Option<S> {
        self.inner.read().get_score(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    pub fn lowest(&self) -> Option<(K, S)> {
        self.inner
            .read()
            .lowest()
            .map(|(key, score)| (key.clone(), score))
    }

    pub fn lowest_key(&self) -> Option<K> {
        self.inner.read().lowest_key().cloned()
    }

    pub fn lowest_score(&self) -> S {
        self.inner.read().lowest_score()
    }

    pub fn element_at(&self, position: usize) -> Option<K> {
        self.inner.read().element_at(position).cloned()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` against the set under one read guard.
    pub fn read<R>(&self, f: impl FnOnce(&CappedSet<K, S>) -> R) -> R {
        f(&*self.inner.read())
    }
}

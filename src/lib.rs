//! Fixed-capacity score registry with exact minimum tracking.
//!
//! A [`CappedSet`] maps unique keys to scores, never holds more than its
//! capacity, and always knows its lowest-scored entry. Inserting a new key
//! while full evicts that lowest entry first, which makes the set a cheap way
//! to keep the top K participants by score.
//!
//! All operations are `O(log K)`. The lowest entry is tracked by an ordered
//! index kept in lockstep with the key map, so no operation rescans scores.
//!
//! [`SharedCappedSet`] wraps a set behind a read/write lock for use across
//! threads.

mod comparisons;
mod index;
mod set;
mod shared;
mod slot;

pub use set::CappedSet;
pub use shared::SharedCappedSet;

/// Capacity used by `CappedSet::default()`.
pub const DEFAULT_CAPACITY: usize = 32;

/// Failure of a mutating operation. The set is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum SetError {
    /// `insert` was given a key that is already in the set.
    #[error("key already exists")]
    AlreadyExists,
    /// `update` or `remove` was given a key that is not in the set.
    #[error("key is not in the set")]
    InvalidKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("capacity must be at least 1")]
pub struct ZeroCapacity;

/// Common surface of capped score registries.
///
/// Lets generic code (harnesses, model checks) drive any implementation.
pub trait Registry<K, S> {
    /// Insert a new key, evicting the lowest entry if full.
    ///
    /// Returns the evicted entry, or fails with [`SetError::AlreadyExists`].
    fn insert(&mut self, key: K, score: S) -> Result<Option<(K, S)>, SetError>;

    /// Replace the score of an active key, returning the previous one.
    fn update(&mut self, key: &K, score: S) -> Result<S, SetError>;

    /// Remove an active key, returning its score.
    fn remove(&mut self, key: &K) -> Result<S, SetError>;

    fn get_score(&self, key: &K) -> Option<S>;

    /// `None` when empty.
    fn lowest_key(&self) -> Option<&K>;

    /// The zero score when empty.
    fn lowest_score(&self) -> S;

    fn element_at(&self, position: usize) -> Option<&K>;

    fn capacity(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill<R: Registry<u32, u64>>(registry: &mut R, entries: &[(u32, u64)]) {
        for &(key, score) in entries {
            registry.insert(key, score).unwrap();
        }
    }

    #[test]
    fn test_registry_trait_drives_capped_set() {
        let mut set: CappedSet<u32, u64> = CappedSet::with_capacity(3);

        fill(&mut set, &[(1, 30), (2, 10), (3, 20)]);

        let registry: &mut dyn Registry<u32, u64> = &mut set;
        assert_eq!(registry.lowest_key(), Some(&2));
        assert_eq!(registry.insert(4, 40), Ok(Some((2, 10))));
        assert_eq!(registry.lowest_score(), 20);
        assert_eq!(registry.element_at(1), Some(&4));
        assert_eq!(registry.capacity(), 3);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(SetError::AlreadyExists.to_string(), "key already exists");
        assert_eq!(SetError::InvalidKey.to_string(), "key is not in the set");
        assert_eq!(ZeroCapacity.to_string(), "capacity must be at least 1");
    }
}

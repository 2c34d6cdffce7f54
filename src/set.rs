use std::{collections::HashMap, hash::Hash};

use crate::{DEFAULT_CAPACITY, Registry, SetError, ZeroCapacity, index::MinIndex, slot::Slots};

#[derive(Debug, Clone, Copy)]
struct Member<S> {
    score: S,
    seq: u64,
    slot: usize,
}

/// Fixed-capacity set of scored keys that always knows its lowest entry.
///
/// Inserting a new key into a full set evicts the current lowest entry first,
/// so the set never holds more than `capacity` keys.
///
/// # Positions
///
/// Every active key occupies one position in `0..capacity`. A fresh set fills
/// positions in insertion order. A position freed by `remove` or by eviction
/// is reused by the next `insert`, most recently freed first, so an evicting
/// insert lands on the evicted key's position. Positions of other keys never
/// move.
///
/// # Ties
///
/// Among entries with equal scores the earliest inserted one is the lowest.
/// `update` keeps an entry's place in that order.
///
/// # Example
///
/// ```
/// use cappedset::CappedSet;
///
/// let mut bids: CappedSet<&str, u64> = CappedSet::with_capacity(2);
///
/// bids.insert("alice", 150).unwrap();
/// bids.insert("bob", 140).unwrap();
/// assert_eq!(bids.lowest(), Some((&"bob", 140)));
///
/// // Full: bob is evicted even though carol bids less.
/// let evicted = bids.insert("carol", 120).unwrap();
/// assert_eq!(evicted, Some(("bob", 140)));
/// assert_eq!(bids.lowest(), Some((&"carol", 120)));
/// assert_eq!(bids.element_at(1), Some(&"carol"));
/// ```
pub struct CappedSet<K, S> {
    members: HashMap<K, Member<S>>,
    slots: Slots<K>,
    index: MinIndex<S>,
    next_seq: u64,
}

impl<K, S> CappedSet<K, S>
where
    K: Hash + Eq + Clone,
    S: Ord + Copy + Default,
{
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(set) => set,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, ZeroCapacity> {
        if capacity == 0 {
            return Err(ZeroCapacity);
        }

        Ok(Self {
            members: HashMap::with_capacity(capacity),
            slots: Slots::with_capacity(capacity),
            index: MinIndex::new(),
            next_seq: 0,
        })
    }

    /// Insert a new key, evicting the lowest entry first if the set is full.
    ///
    /// Returns the evicted entry, if any. The eviction is unconditional: it
    /// happens even when `score` is lower than the evicted score, in which
    /// case the new entry becomes the lowest.
    pub fn insert(&mut self, key: K, score: S) -> Result<Option<(K, S)>, SetError> {
        if self.members.contains_key(&key) {
            return Err(SetError::AlreadyExists);
        }

        let evicted = if self.slots.is_full() {
            self.evict_lowest()
        } else {
            None
        };

        // Not full here: either it wasn't, or eviction just freed a slot.
        let Ok(slot) = self.slots.insert(key.clone()) else {
            unreachable!("no free slot after eviction");
        };

        let seq = self.next_seq;
        self.next_seq += 1;

        self.index.insert(score, seq, slot);
        self.members.insert(key, Member { score, seq, slot });

        tracing::trace!(slot, len = self.len(), "inserted entry");

        Ok(evicted)
    }

    /// Replace the score of an active key. Returns the previous score.
    pub fn update(&mut self, key: &K, score: S) -> Result<S, SetError> {
        let member = self.members.get_mut(key).ok_or(SetError::InvalidKey)?;
        let old = member.score;

        let moved = self.index.rescore(old, score, member.seq);
        debug_assert_eq!(moved, Some(member.slot), "index out of sync with members");

        member.score = score;

        tracing::trace!(slot = member.slot, "updated entry");

        Ok(old)
    }

    /// Remove an active key. Returns its score.
    pub fn remove(&mut self, key: &K) -> Result<S, SetError> {
        let member = self.members.remove(key).ok_or(SetError::InvalidKey)?;

        let slot = self.index.remove(member.score, member.seq);
        debug_assert_eq!(slot, Some(member.slot), "index out of sync with members");

        let freed = self.slots.remove(member.slot);
        debug_assert!(freed.is_some(), "slot {} already vacant", member.slot);

        tracing::trace!(slot = member.slot, len = self.len(), "removed entry");

        Ok(member.score)
    }

    fn evict_lowest(&mut self) -> Option<(K, S)> {
        let (score, slot) = self.index.pop_first()?;
        let key = self.slots.remove(slot)?;
        let member = self.members.remove(&key);
        debug_assert!(member.is_some(), "evicted key missing from members");

        tracing::debug!(slot, capacity = self.capacity(), "evicted lowest entry");

        Some((key, score))
    }

    /// Drop every entry. Capacity is unchanged and positions restart at 0.
    pub fn clear(&mut self) {
        let dropped = self.len();

        self.members.clear();
        self.slots.clear();
        self.index.clear();

        tracing::debug!(dropped, "cleared set");
    }

    #[inline(always)]
    pub fn get_score(&self, key: &K) -> Option<S> {
        self.members.get(key).map(|m| m.score)
    }

    #[inline(always)]
    pub fn contains(&self, key: &K) -> bool {
        self.members.contains_key(key)
    }

    /// Lowest entry, `None` when empty.
    #[inline(always)]
    pub fn lowest(&self) -> Option<(&K, S)> {
        let (score, slot) = self.index.first()?;
        self.slots.get(slot).map(|key| (key, score))
    }

    #[inline(always)]
    pub fn lowest_key(&self) -> Option<&K> {
        self.lowest().map(|(key, _)| key)
    }

    /// Lowest score, or `S::default()` when empty.
    #[inline(always)]
    pub fn lowest_score(&self) -> S {
        self.lowest().map(|(_, score)| score).unwrap_or_default()
    }

    /// Key at `position`, `None` if out of range or vacant.
    #[inline(always)]
    pub fn element_at(&self, position: usize) -> Option<&K> {
        self.slots.get(position)
    }

    /// Active entries in position order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, S)> {
        self.slots
            .iter()
            .filter_map(move |(_, key)| self.members.get(key).map(|m| (key, m.score)))
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    /// Check that members, slots and index agree.
    ///
    /// # Panics
    /// Panics on the first inconsistency found.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.len() <= self.capacity(), "len exceeds capacity");
        assert_eq!(self.slots.len(), self.len(), "slot count mismatch");
        assert_eq!(self.index.len(), self.len(), "index size mismatch");

        for (key, member) in &self.members {
            assert!(
                self.slots.get(member.slot) == Some(key),
                "member slot {} does not hold its key",
                member.slot
            );
            assert!(member.seq < self.next_seq, "sequence from the future");
        }

        let mut prev_score = None;
        for (score, seq, slot) in self.index.iter() {
            let key = self.slots.get(slot).expect("index points at vacant slot");
            let member = &self.members[key];
            assert!(member.score == score && member.seq == seq, "stale index entry");
            assert!(prev_score.is_none_or(|p| p <= score), "index out of order");
            prev_score = Some(score);
        }

        match self.lowest() {
            Some((_, score)) => {
                let min = self.members.values().map(|m| m.score).min();
                assert!(min == Some(score), "lowest is not the minimum");
            }
            None => {
                assert!(self.is_empty(), "lowest missing on non-empty set");
                assert!(self.lowest_score() == S::default(), "empty sentinel score");
            }
        }
    }
}

impl<K, S> Default for CappedSet<K, S>
where
    K: Hash + Eq + Clone,
    S: Ord + Copy + Default,
{
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<K, S> Registry<K, S> for CappedSet<K, S>
where
    K: Hash + Eq + Clone,
    S: Ord + Copy + Default,
{
    #[inline(always)]
    fn insert(&mut self, key: K, score: S) -> Result<Option<(K, S)>, SetError> {
        CappedSet::insert(self, key, score)
    }

    #[inline(always)]
    fn update(&mut self, key: &K, score: S) -> Result<S, SetError> {
        CappedSet::update(self, key, score)
    }

    #[inline(always)]
    fn remove(&mut self, key: &K) -> Result<S, SetError> {
        CappedSet::remove(self, key)
    }

    #[inline(always)]
    fn get_score(&self, key: &K) -> Option<S> {
        CappedSet::get_score(self, key)
    }

    #[inline(always)]
    fn lowest_key(&self) -> Option<&K> {
        CappedSet::lowest_key(self)
    }

    #[inline(always)]
    fn lowest_score(&self) -> S {
        CappedSet::lowest_score(self)
    }

    #[inline(always)]
    fn element_at(&self, position: usize) -> Option<&K> {
        CappedSet::element_at(self, position)
    }

    #[inline(always)]
    fn capacity(&self) -> usize {
        CappedSet::capacity(self)
    }

    #[inline(always)]
    fn len(&self) -> usize {
        CappedSet::len(self)
    }
}

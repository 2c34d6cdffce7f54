use std::collections::BTreeMap;

/// Ordered secondary index over live entries.
///
/// Keyed by `(score, seq)` so equal scores order by insertion sequence and
/// every entry is unique. Values are slot positions.
pub struct MinIndex<S> {
    tree: BTreeMap<(S, u64), usize>,
}

#[allow(unused)]
impl<S: Ord + Copy> MinIndex<S> {
    pub fn new() -> Self {
        Self {
            tree: BTreeMap::new(),
        }
    }

    #[inline(always)]
    pub fn insert(&mut self, score: S, seq: u64, slot: usize) {
        let prev = self.tree.insert((score, seq), slot);
        debug_assert!(prev.is_none(), "duplicate index entry for seq {seq}");
    }

    #[inline(always)]
    pub fn remove(&mut self, score: S, seq: u64) -> Option<usize> {
        self.tree.remove(&(score, seq))
    }

    /// Move an entry to a new score, keeping its sequence number.
    #[inline(always)]
    pub fn rescore(&mut self, old: S, new: S, seq: u64) -> Option<usize> {
        let slot = self.tree.remove(&(old, seq))?;
        self.tree.insert((new, seq), slot);
        Some(slot)
    }

    /// Lowest `(score, slot)`.
    #[inline(always)]
    pub fn first(&self) -> Option<(S, usize)> {
        self.tree
            .first_key_value()
            .map(|(&(score, _), &slot)| (score, slot))
    }

    #[inline(always)]
    pub fn pop_first(&mut self) -> Option<(S, usize)> {
        self.tree
            .pop_first()
            .map(|((score, _), slot)| (score, slot))
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Every `(score, seq, slot)` in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64, usize)> + '_ {
        self.tree
            .iter()
            .map(|(&(score, seq), &slot)| (score, seq, slot))
    }
}

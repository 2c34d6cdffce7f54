const NONE: usize = usize::MAX;

enum Entry<K> {
    Vacant { next: usize },
    Occupied(K),
}

/// Fixed-size positional slab of keys.
///
/// Positions are handed out from an intrusive free list. A fresh slab fills
/// positions in ascending order; a freed position goes to the head of the
/// free list and is the next one handed out.
pub struct Slots<K> {
    entries: Box<[Entry<K>]>,
    free_head: usize,
    len: usize,
}

#[allow(unused)]
impl<K> Slots<K> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Self::fresh_entries(capacity),
            free_head: if capacity > 0 { 0 } else { NONE },
            len: 0,
        }
    }

    fn fresh_entries(capacity: usize) -> Box<[Entry<K>]> {
        (0..capacity)
            .map(|i| Entry::Vacant {
                next: if i + 1 < capacity { i + 1 } else { NONE },
            })
            .collect::<Vec<_>>()
            .into_boxed_slice()
    }

    /// Insert a key. Returns its position, or hands the key back if full.
    #[inline(always)]
    pub fn insert(&mut self, key: K) -> Result<usize, K> {
        let position = self.free_head;
        let Some(entry) = self.entries.get_mut(position) else {
            return Err(key);
        };

        let Entry::Vacant { next } = *entry else {
            debug_assert!(false, "free list points at occupied position {position}");
            return Err(key);
        };

        self.free_head = next;
        *entry = Entry::Occupied(key);
        self.len += 1;
        Ok(position)
    }

    /// Free a position. Returns `None` if out of range or already vacant.
    #[inline(always)]
    pub fn remove(&mut self, position: usize) -> Option<K> {
        let entry = self.entries.get_mut(position)?;

        if let Entry::Vacant { .. } = entry {
            return None;
        }

        let old = std::mem::replace(
            entry,
            Entry::Vacant {
                next: self.free_head,
            },
        );
        self.free_head = position;
        self.len -= 1;

        match old {
            Entry::Occupied(key) => Some(key),
            Entry::Vacant { .. } => None,
        }
    }

    #[inline(always)]
    pub fn get(&self, position: usize) -> Option<&K> {
        match self.entries.get(position)? {
            Entry::Occupied(key) => Some(key),
            Entry::Vacant { .. } => None,
        }
    }

    /// Occupied positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &K)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| match entry {
                Entry::Occupied(key) => Some((position, key)),
                Entry::Vacant { .. } => None,
            })
    }

    /// Drop every key and restore the fresh fill order.
    pub fn clear(&mut self) {
        let capacity = self.capacity();
        self.entries = Self::fresh_entries(capacity);
        self.free_head = if capacity > 0 { 0 } else { NONE };
        self.len = 0;
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len >= self.entries.len()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}

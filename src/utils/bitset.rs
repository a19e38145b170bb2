//! Fixed-capacity bit sets over dense node indices.
//!
//! Dominator sets, reachability marks and the synthesizer's visited set are
//! all keyed by [`NodeId`](crate::utils::graph::NodeId) indices, which are
//! dense and start at zero. A [`BitSet`] stores one bit per index, 64 per
//! word, so intersecting two dominator sets is a word-wise `&`.
//!
//! # Example
//!
//! ```rust
//! use flowscope::utils::BitSet;
//!
//! let mut set = BitSet::new(10);
//! set.insert(2);
//! set.insert(7);
//!
//! assert!(set.contains(7));
//! assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 7]);
//! ```

const WORD_BITS: usize = 64;

/// A set of small integers backed by a vector of 64-bit words.
///
/// The capacity is fixed at construction. Operations combining two sets
/// require both to have the same capacity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// Creates an empty set able to hold indices `0..capacity`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            len: capacity,
        }
    }

    /// Creates a set containing every index in `0..capacity`.
    #[must_use]
    pub fn full(capacity: usize) -> Self {
        let mut set = Self {
            words: vec![u64::MAX; capacity.div_ceil(WORD_BITS)],
            len: capacity,
        };
        set.clear_tail();
        set
    }

    /// Returns the capacity of this set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no index is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Adds `index`, returning `true` if it was not present before.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, mask) = self.locate(index);
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    /// Removes `index` from the set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn remove(&mut self, index: usize) {
        let (word, mask) = self.locate(index);
        self.words[word] &= !mask;
    }

    /// Returns `true` if `index` is present. Out of range indices are never present.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        let (word, mask) = self.locate(index);
        self.words[word] & mask != 0
    }

    /// Returns the number of indices present.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Adds every index of `other` to `self`. Returns `true` if `self` changed.
    pub fn union_with(&mut self, other: &Self) -> bool {
        self.combine(other, |a, b| a | b)
    }

    /// Keeps only indices also present in `other`. Returns `true` if `self` changed.
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        self.combine(other, |a, b| a & b)
    }

    /// Returns `true` if every index of `self` is also in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        assert_eq!(self.len, other.len, "bit sets must have same length");
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & !b == 0)
    }

    /// Iterates over present indices in ascending order.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    fn locate(&self, index: usize) -> (usize, u64) {
        assert!(index < self.len, "index out of bounds");
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }

    fn combine(&mut self, other: &Self, op: impl Fn(u64, u64) -> u64) -> bool {
        assert_eq!(self.len, other.len, "bit sets must have same length");
        let mut changed = false;
        for (a, &b) in self.words.iter_mut().zip(&other.words) {
            let next = op(*a, b);
            changed |= next != *a;
            *a = next;
        }
        changed
    }

    fn clear_tail(&mut self) {
        let used = self.len % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

impl std::fmt::Debug for BitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Ascending iterator over the indices of a [`BitSet`].
pub struct BitSetIter<'a> {
    words: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * WORD_BITS + bit);
            }
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_insert_contains() {
        let mut bs = BitSet::new(130);
        assert!(bs.is_empty());

        assert!(bs.insert(0));
        assert!(bs.insert(64));
        assert!(bs.insert(129));
        assert!(!bs.insert(64));

        assert_eq!(bs.count(), 3);
        assert!(bs.contains(129));
        assert!(!bs.contains(1));
        assert!(!bs.contains(500));

        bs.remove(64);
        assert!(!bs.contains(64));
    }

    #[test]
    fn test_bitset_full_respects_capacity() {
        let bs = BitSet::full(70);
        assert_eq!(bs.count(), 70);
        assert_eq!(bs.iter().last(), Some(69));
    }

    #[test]
    fn test_bitset_union_intersect_report_change() {
        let mut a = BitSet::new(8);
        let mut b = BitSet::new(8);
        a.insert(1);
        b.insert(1);
        b.insert(2);

        assert!(a.union_with(&b));
        assert!(!a.union_with(&b));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2]);

        let mut only_one = BitSet::new(8);
        only_one.insert(1);
        assert!(a.intersect_with(&only_one));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_bitset_subset() {
        let mut small = BitSet::new(4);
        small.insert(3);
        let full = BitSet::full(4);
        assert!(small.is_subset_of(&full));
        assert!(!full.is_subset_of(&small));
    }

    #[test]
    fn test_bitset_debug() {
        let mut bs = BitSet::new(10);
        bs.insert(4);
        bs.insert(9);
        assert_eq!(format!("{bs:?}"), "{4, 9}");
    }
}

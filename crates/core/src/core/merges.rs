//! Merge rule management for BPE.
//!
//! Merge rules are stored twice: as an ordered list (the training order is
//! the rule priority and the unit of persistence) and as a pair -> (rank,
//! new id) map for constant-time lookup while encoding.

use ahash::AHashMap;
use dary_heap::OctonaryHeap;

/// A pair of adjacent symbol IDs.
pub type Pair = (u32, u32);

/// Merge rule lookup: pair -> (rank, new_token_id).
///
/// Lower rank = higher merge priority.
pub type MergeMap = AHashMap<Pair, (u32, u32)>;

/// A single learned merge rule.
///
/// The rank is implicit: it is the rule's position in the ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRule {
    /// Left symbol of the merged pair
    pub left: u32,
    /// Right symbol of the merged pair
    pub right: u32,
    /// Symbol produced by the merge
    pub new_id: u32,
}

/// Collection of BPE merge rules with ordered storage and fast lookup.
#[derive(Debug, Clone, Default)]
pub struct MergeTable {
    /// Rules in training order; index == rank
    rules: Vec<MergeRule>,
    /// pair -> (rank, new_token_id)
    map: MergeMap,
}

impl MergeTable {
    /// Create an empty merge table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merge table with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
            map: MergeMap::with_capacity(capacity),
        }
    }

    /// Rebuild a table from rules in training order.
    pub fn from_rules(rules: Vec<MergeRule>) -> Self {
        let mut table = Self::with_capacity(rules.len());
        for rule in rules {
            table.push(rule);
        }
        table
    }

    /// Append a rule; its rank is the current rule count.
    pub fn push(&mut self, rule: MergeRule) {
        let rank = self.rules.len() as u32;
        self.map.insert((rule.left, rule.right), (rank, rule.new_id));
        self.rules.push(rule);
    }

    /// Look up the rule for a pair.
    ///
    /// Returns Some((rank, new_token_id)) if this pair merges, None otherwise.
    #[inline]
    pub fn get(&self, pair: Pair) -> Option<(u32, u32)> {
        self.map.get(&pair).copied()
    }

    /// Rules in training order.
    #[inline]
    pub fn rules(&self) -> &[MergeRule] {
        &self.rules
    }

    /// Get the number of merge rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no merge rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Contract a symbol sequence in place by applying merges in rank order.
    ///
    /// The adjacent pair with the lowest rank anywhere in the word is merged
    /// first; leftmost wins among occurrences of the same pair. Merged
    /// positions are threaded through a linked index rather than shifted, so
    /// each heap entry stays anchored to its site and stale entries are
    /// detected by re-checking the pair at that site.
    pub fn apply(&self, ids: &mut Vec<u32>) {
        if ids.len() < 2 || self.map.is_empty() {
            return;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct MergeOp {
            rank: u32,
            pos: usize,
            new_id: u32,
        }

        // Max-heap: lowest rank first, then leftmost site.
        impl Ord for MergeOp {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                other
                    .rank
                    .cmp(&self.rank)
                    .then_with(|| other.pos.cmp(&self.pos))
            }
        }

        impl PartialOrd for MergeOp {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        let n = ids.len();
        let mut next: Vec<usize> = (1..=n).collect();
        let mut prev: Vec<usize> = (0..n).map(|i| i.wrapping_sub(1)).collect();
        let mut alive = vec![true; n];

        let mut heap = OctonaryHeap::with_capacity(n);
        for i in 0..n - 1 {
            if let Some((rank, new_id)) = self.get((ids[i], ids[i + 1])) {
                heap.push(MergeOp { rank, pos: i, new_id });
            }
        }

        while let Some(op) = heap.pop() {
            let i = op.pos;
            if !alive[i] {
                continue;
            }
            let j = next[i];
            if j >= n {
                continue;
            }

            // The site may have been rewritten since the entry was pushed.
            match self.get((ids[i], ids[j])) {
                Some((rank, new_id)) if rank == op.rank && new_id == op.new_id => {
                    ids[i] = new_id;
                    alive[j] = false;
                    let k = next[j];
                    next[i] = k;
                    if k < n {
                        prev[k] = i;
                    }

                    let p = prev[i];
                    if p != usize::MAX {
                        if let Some((rank, new_id)) = self.get((ids[p], ids[i])) {
                            heap.push(MergeOp { rank, pos: p, new_id });
                        }
                    }
                    if k < n {
                        if let Some((rank, new_id)) = self.get((ids[i], ids[k])) {
                            heap.push(MergeOp { rank, pos: i, new_id });
                        }
                    }
                }
                _ => {}
            }
        }

        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            if alive[i] {
                out.push(ids[i]);
            }
        }
        *ids = out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut table = MergeTable::new();
        table.push(MergeRule { left: 0, right: 1, new_id: 100 });
        table.push(MergeRule { left: 1, right: 2, new_id: 101 });

        assert_eq!(table.get((0, 1)), Some((0, 100)));
        assert_eq!(table.get((1, 2)), Some((1, 101)));
        assert_eq!(table.get((2, 3)), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_from_rules_preserves_order() {
        let rules = vec![
            MergeRule { left: 5, right: 6, new_id: 10 },
            MergeRule { left: 10, right: 6, new_id: 11 },
        ];
        let table = MergeTable::from_rules(rules.clone());

        assert_eq!(table.rules(), rules.as_slice());
        assert_eq!(table.get((5, 6)), Some((0, 10)));
        assert_eq!(table.get((10, 6)), Some((1, 11)));
    }

    #[test]
    fn test_apply_single_merge() {
        let mut table = MergeTable::new();
        table.push(MergeRule { left: 1, right: 2, new_id: 9 });

        let mut ids = vec![1, 2, 3];
        table.apply(&mut ids);
        assert_eq!(ids, vec![9, 3]);
    }

    #[test]
    fn test_apply_is_left_to_right_non_overlapping() {
        let mut table = MergeTable::new();
        table.push(MergeRule { left: 1, right: 1, new_id: 9 });

        // Three adjacent occurrences overlap; only the leftmost pair merges,
        // then the leftover single symbol stays.
        let mut ids = vec![1, 1, 1];
        table.apply(&mut ids);
        assert_eq!(ids, vec![9, 1]);

        let mut ids = vec![1, 1, 1, 1];
        table.apply(&mut ids);
        assert_eq!(ids, vec![9, 9]);
    }

    #[test]
    fn test_apply_respects_rank_order() {
        let mut table = MergeTable::new();
        // Rank 0: (2, 3) -> 9.  Rank 1: (1, 2) -> 8.
        table.push(MergeRule { left: 2, right: 3, new_id: 9 });
        table.push(MergeRule { left: 1, right: 2, new_id: 8 });

        // (2, 3) wins even though (1, 2) is further left.
        let mut ids = vec![1, 2, 3];
        table.apply(&mut ids);
        assert_eq!(ids, vec![1, 9]);
    }

    #[test]
    fn test_apply_cascades_through_new_symbols() {
        let mut table = MergeTable::new();
        table.push(MergeRule { left: 1, right: 2, new_id: 8 });
        table.push(MergeRule { left: 8, right: 3, new_id: 9 });

        let mut ids = vec![1, 2, 3];
        table.apply(&mut ids);
        assert_eq!(ids, vec![9]);
    }

    #[test]
    fn test_apply_without_rules_is_identity() {
        let table = MergeTable::new();
        let mut ids = vec![4, 5, 6];
        table.apply(&mut ids);
        assert_eq!(ids, vec![4, 5, 6]);
    }

    #[test]
    fn test_apply_shifted_sites_still_merge() {
        let mut table = MergeTable::new();
        table.push(MergeRule { left: 1, right: 2, new_id: 8 });
        table.push(MergeRule { left: 3, right: 4, new_id: 9 });

        // The second site's position does not move when the first merges.
        let mut ids = vec![1, 2, 3, 4];
        table.apply(&mut ids);
        assert_eq!(ids, vec![8, 9]);
    }
}

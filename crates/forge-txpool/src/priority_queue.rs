//! Min-ordered fee priority queue
//!
//! Orders transaction ids by fee priority, lowest first, with an id index
//! for removal. Eviction scans walk the ascending order; among entries with
//! equal priority the newer transaction sorts first, so the older one is
//! evicted later.

use forge_primitives::{H256, U256};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct QueueEntry {
    priority: U256,
    received_at: u64,
    id: H256,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            // newer first, so the older entry is evicted later
            .then_with(|| other.received_at.cmp(&self.received_at))
            // id for total ordering
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-ordered priority structure over `(fee_priority, id)` entries
#[derive(Debug, Default)]
pub struct FeePriorityQueue {
    entries: BTreeSet<QueueEntry>,
    index: HashMap<H256, QueueEntry>,
}

impl FeePriorityQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the queue holds nothing
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// True when the id is present
    pub fn contains(&self, id: &H256) -> bool {
        self.index.contains_key(id)
    }

    /// Insert an entry. Returns false without modifying the queue when the
    /// id is already present.
    pub fn insert(&mut self, priority: U256, received_at: u64, id: H256) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        let entry = QueueEntry {
            priority,
            received_at,
            id,
        };
        self.entries.insert(entry);
        self.index.insert(id, entry);
        true
    }

    /// Remove an entry by id. Removing an absent id is a no-op returning
    /// false.
    pub fn remove(&mut self, id: &H256) -> bool {
        match self.index.remove(id) {
            Some(entry) => {
                self.entries.remove(&entry);
                true
            }
            None => false,
        }
    }

    /// The entry with the lowest fee priority
    pub fn peek_min(&self) -> Option<(U256, H256)> {
        self.entries.first().map(|e| (e.priority, e.id))
    }

    /// Ids in ascending priority order (eviction-scan order)
    pub fn iter_ascending(&self) -> impl Iterator<Item = H256> + '_ {
        self.entries.iter().map(|e| e.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> H256 {
        H256::from_bytes([n; 32])
    }

    #[test]
    fn test_peek_min() {
        let mut queue = FeePriorityQueue::new();
        queue.insert(U256::from(30u64), 0, id(3));
        queue.insert(U256::from(10u64), 0, id(1));
        queue.insert(U256::from(20u64), 0, id(2));

        assert_eq!(queue.peek_min(), Some((U256::from(10u64), id(1))));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_iter_ascending() {
        let mut queue = FeePriorityQueue::new();
        queue.insert(U256::from(5u64), 0, id(5));
        queue.insert(U256::from(1u64), 0, id(1));
        queue.insert(U256::from(3u64), 0, id(3));

        let order: Vec<H256> = queue.iter_ascending().collect();
        assert_eq!(order, vec![id(1), id(3), id(5)]);
    }

    #[test]
    fn test_equal_priority_newer_first() {
        let mut queue = FeePriorityQueue::new();
        queue.insert(U256::from(7u64), 100, id(1)); // older
        queue.insert(U256::from(7u64), 200, id(2)); // newer

        // the newer entry leads the ascending scan, so the older one is
        // evicted later
        let order: Vec<H256> = queue.iter_ascending().collect();
        assert_eq!(order, vec![id(2), id(1)]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut queue = FeePriorityQueue::new();
        queue.insert(U256::from(1u64), 0, id(1));
        queue.insert(U256::from(2u64), 0, id(2));

        assert!(queue.remove(&id(1)));
        assert!(!queue.contains(&id(1)));
        assert_eq!(queue.peek_min(), Some((U256::from(2u64), id(2))));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut queue = FeePriorityQueue::new();
        queue.insert(U256::from(1u64), 0, id(1));
        assert!(!queue.remove(&id(9)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut queue = FeePriorityQueue::new();
        assert!(queue.insert(U256::from(1u64), 0, id(1)));
        assert!(!queue.insert(U256::from(2u64), 5, id(1)));
        assert_eq!(queue.len(), 1);
        // original entry untouched
        assert_eq!(queue.peek_min(), Some((U256::from(1u64), id(1))));
    }

    #[test]
    fn test_empty_queue() {
        let queue = FeePriorityQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.peek_min(), None);
        assert_eq!(queue.iter_ascending().count(), 0);
    }
}

//! Indexable 4-ary min-heap used as a worker's open set.
//!
//! Alongside the heap array the queue keeps a hash index from each element
//! to its heap slot, so a structurally equal element can be found and
//! replaced in O(log n) without scanning the heap. Ties in priority are
//! broken by insertion order.

use crate::game::Board;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::sync::Arc;

const ARITY: usize = 4;
const LOG2_ARITY: usize = 2;

/// Elements ordered by a priority key; lower keys dequeue first.
pub trait Prioritized {
    type Priority: Ord + Copy;

    fn priority(&self) -> Self::Priority;
}

impl<T: Prioritized> Prioritized for Arc<T> {
    type Priority = T::Priority;

    fn priority(&self) -> Self::Priority {
        (**self).priority()
    }
}

impl Prioritized for Board {
    type Priority = u32;

    fn priority(&self) -> u32 {
        self.cost()
    }
}

struct Entry<T: Prioritized> {
    key: (T::Priority, u64),
    item: T,
}

pub struct PriorityQueue<T>
where
    T: Prioritized + Eq + Hash + Clone,
{
    nodes: Vec<Entry<T>>,
    index: FxHashMap<T, usize>,
    next_seq: u64,
}

impl<T> PriorityQueue<T>
where
    T: Prioritized + Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(4)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.nodes.first().map(|e| &e.item)
    }

    /// Whether an element equal to `item` is enqueued.
    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(item)
    }

    /// The enqueued element equal to `item`, if any.
    pub fn get(&self, item: &T) -> Option<&T> {
        self.index.get(item).map(|&slot| &self.nodes[slot].item)
    }

    pub fn enqueue(&mut self, item: T) {
        debug_assert!(!self.contains(&item), "element already enqueued");
        let slot = self.nodes.len();
        let entry = self.entry(item);
        self.index.insert(entry.item.clone(), slot);
        self.nodes.push(entry);
        self.move_up(slot);
        debug_assert_eq!(self.index.len(), self.nodes.len());
    }

    pub fn dequeue(&mut self) -> Option<T> {
        if self.nodes.is_empty() {
            return None;
        }
        let entry = self.nodes.swap_remove(0);
        self.index.remove(&entry.item);
        if !self.nodes.is_empty() {
            self.set_slot(0);
            self.move_down(0);
        }
        debug_assert_eq!(self.index.len(), self.nodes.len());
        Some(entry.item)
    }

    /// Swap the enqueued element equal to `existing` for `replacement`,
    /// restoring heap order around its slot.
    pub fn replace(&mut self, existing: &T, replacement: T) {
        let Some(slot) = self.index.remove(existing) else {
            panic!("replace of an element that is not enqueued");
        };
        debug_assert!(
            replacement == *existing || !self.contains(&replacement),
            "replacement already enqueued"
        );

        let entry = self.entry(replacement);
        self.index.insert(entry.item.clone(), slot);
        self.nodes[slot] = entry;

        if slot > 0 && self.nodes[slot].key < self.nodes[parent(slot)].key {
            self.move_up(slot);
        } else {
            self.move_down(slot);
        }
        debug_assert_eq!(self.index.len(), self.nodes.len());
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }

    /// Heap and index agree: every heap element is indexed at its own slot
    /// and the index holds nothing else.
    pub fn is_consistent(&self) -> bool {
        self.index.len() == self.nodes.len()
            && self
                .nodes
                .iter()
                .enumerate()
                .all(|(slot, e)| self.index.get(&e.item) == Some(&slot))
            && (1..self.nodes.len()).all(|i| self.nodes[parent(i)].key <= self.nodes[i].key)
    }

    fn entry(&mut self, item: T) -> Entry<T> {
        let seq = self.next_seq;
        self.next_seq += 1;
        Entry {
            key: (item.priority(), seq),
            item,
        }
    }

    fn set_slot(&mut self, slot: usize) {
        if let Some(s) = self.index.get_mut(&self.nodes[slot].item) {
            *s = slot;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.nodes.swap(a, b);
        self.set_slot(a);
        self.set_slot(b);
    }

    fn move_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let p = parent(slot);
            if self.nodes[slot].key >= self.nodes[p].key {
                break;
            }
            self.swap(slot, p);
            slot = p;
        }
    }

    fn move_down(&mut self, mut slot: usize) {
        let size = self.nodes.len();
        loop {
            let first = first_child(slot);
            if first >= size {
                break;
            }
            let last = (first + ARITY).min(size);
            let min_child = (first..last)
                .min_by_key(|&i| self.nodes[i].key)
                .unwrap_or(first);

            if self.nodes[slot].key <= self.nodes[min_child].key {
                break;
            }
            self.swap(slot, min_child);
            slot = min_child;
        }
    }
}

impl<T> Default for PriorityQueue<T>
where
    T: Prioritized + Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

fn parent(slot: usize) -> usize {
    (slot - 1) >> LOG2_ARITY
}

fn first_child(slot: usize) -> usize {
    (slot << LOG2_ARITY) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::hash::Hasher;

    /// Keyed element: equality and hash by `id`, ordering by `cost`.
    #[derive(Debug, Clone, Copy)]
    struct Node {
        id: u32,
        cost: u32,
    }

    impl PartialEq for Node {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    impl Eq for Node {}

    impl Hash for Node {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl Prioritized for Node {
        type Priority = u32;

        fn priority(&self) -> u32 {
            self.cost
        }
    }

    fn node(id: u32, cost: u32) -> Node {
        Node { id, cost }
    }

    #[test]
    fn test_dequeue_in_order() {
        let mut q = PriorityQueue::new();
        for (id, cost) in [(1, 50), (2, 10), (3, 30), (4, 20), (5, 40), (6, 5)] {
            q.enqueue(node(id, cost));
        }
        assert_eq!(q.len(), 6);
        assert_eq!(q.peek().map(|n| n.id), Some(6));

        let order: Vec<u32> = std::iter::from_fn(|| q.dequeue()).map(|n| n.id).collect();
        assert_eq!(order, vec![6, 2, 4, 3, 5, 1]);
        assert!(q.is_empty());
        assert!(q.dequeue().is_none());
    }

    #[test]
    fn test_ties_dequeue_in_insertion_order() {
        let mut q = PriorityQueue::new();
        for id in 0..10 {
            q.enqueue(node(id, 7));
        }
        let order: Vec<u32> = std::iter::from_fn(|| q.dequeue()).map(|n| n.id).collect();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_get_finds_structurally_equal() {
        let mut q = PriorityQueue::new();
        q.enqueue(node(1, 50));
        assert!(q.contains(&node(1, 0)));
        assert_eq!(q.get(&node(1, 0)).map(|n| n.cost), Some(50));
        assert!(q.get(&node(2, 50)).is_none());
    }

    #[test]
    fn test_replace_decreases_key() {
        let mut q = PriorityQueue::new();
        for (id, cost) in [(1, 10), (2, 20), (3, 30), (4, 40), (5, 50), (6, 60)] {
            q.enqueue(node(id, cost));
        }
        let existing = *q.get(&node(6, 0)).unwrap();
        q.replace(&existing, node(6, 1));
        assert!(q.is_consistent());
        assert_eq!(q.get(&node(6, 0)).map(|n| n.cost), Some(1));
        assert_eq!(q.dequeue().map(|n| n.id), Some(6));
    }

    #[test]
    fn test_replace_with_different_element() {
        let mut q = PriorityQueue::new();
        q.enqueue(node(1, 10));
        q.enqueue(node(2, 20));
        q.replace(&node(2, 20), node(3, 5));
        assert!(q.contains(&node(3, 0)));
        assert!(!q.contains(&node(2, 0)));
        assert_eq!(q.dequeue().map(|n| n.id), Some(3));
    }

    #[test]
    fn test_replace_increases_key() {
        let mut q = PriorityQueue::new();
        for (id, cost) in [(1, 10), (2, 20), (3, 30)] {
            q.enqueue(node(id, cost));
        }
        q.replace(&node(1, 10), node(1, 100));
        let order: Vec<u32> = std::iter::from_fn(|| q.dequeue()).map(|n| n.id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_clear() {
        let mut q = PriorityQueue::new();
        q.enqueue(node(1, 10));
        q.enqueue(node(2, 20));
        q.clear();
        assert!(q.is_empty());
        assert!(!q.contains(&node(1, 0)));
        assert!(q.is_consistent());
        q.enqueue(node(1, 3));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_random_operations_keep_order_and_index() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..50 {
            let mut q = PriorityQueue::new();
            let mut live: Vec<Node> = Vec::new();
            let mut next_id = 0;
            let mut last_dequeued = 0;

            for _ in 0..300 {
                match rng.gen_range(0..4) {
                    0 | 1 => {
                        let n = node(next_id, rng.gen_range(last_dequeued..last_dequeued + 100));
                        next_id += 1;
                        q.enqueue(n);
                        live.push(n);
                    }
                    2 if !live.is_empty() => {
                        let i = rng.gen_range(0..live.len());
                        let old = live[i];
                        let new = node(old.id, rng.gen_range(last_dequeued..last_dequeued + 100));
                        q.replace(&old, new);
                        live[i] = new;
                        assert_eq!(q.get(&old).map(|n| n.cost), Some(new.cost));
                    }
                    _ => {
                        if let Some(n) = q.dequeue() {
                            let min = live.iter().map(|l| l.cost).min().unwrap();
                            assert_eq!(n.cost, min);
                            assert!(n.cost >= last_dequeued);
                            last_dequeued = n.cost;
                            live.retain(|l| l.id != n.id);
                            assert!(!q.contains(&n));
                        }
                    }
                }
                assert!(q.is_consistent());
                assert_eq!(q.len(), live.len());
            }
        }
    }

    #[test]
    fn test_boards_ordered_by_cost() {
        let solved = Arc::new(Board::from_layout("", [13; 4], &[]).unwrap());
        let near = Arc::new(Board::from_layout("", [13, 13, 13, 12], &["KS"]).unwrap());
        let deal = Arc::new(Board::from_deal_number(1));

        let mut q = PriorityQueue::new();
        q.enqueue(Arc::clone(&deal));
        q.enqueue(Arc::clone(&solved));
        q.enqueue(Arc::clone(&near));
        assert!(q.contains(&Arc::new(Board::from_deal_number(1))));

        assert_eq!(q.dequeue(), Some(solved));
        assert_eq!(q.dequeue(), Some(near));
        assert_eq!(q.dequeue(), Some(deal));
    }
}

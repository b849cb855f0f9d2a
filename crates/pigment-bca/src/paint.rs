//! Pending-paint bookkeeping.
//!
//! A [`PaintedNode`] is wet paint waiting at a node: how much mass arrived,
//! through which predicate, and from which predecessor. The [`PaintQueue`]
//! holds every pending node of one job and always yields the smallest node id
//! first, never the largest paint, so processing order depends only on ids.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Diffusion mass waiting at a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintedNode {
    /// Output index of the node (vertex id or predicate slot).
    pub node: usize,
    /// Edge type the first inbound flow used; `None` for the bookmark.
    pub predicate: Option<usize>,
    /// Node the first inbound flow came from; `None` for the bookmark.
    pub prev: Option<usize>,
    /// Accumulated paint.
    pub paint: f64,
}

impl PaintedNode {
    /// The seed of a job: all the paint, no history.
    pub fn seed(node: usize) -> Self {
        Self {
            node,
            predicate: None,
            prev: None,
            paint: 1.0,
        }
    }

    /// Merge another inbound flow into this pending node.
    #[inline]
    pub fn add_paint(&mut self, paint: f64) {
        self.paint += paint;
    }
}

/// Pending nodes of a job, popped in ascending node id.
///
/// Stored as a flat slot array indexed by node plus a min-heap of occupied
/// slots. A node enters the heap once per stay in the queue; merges only
/// touch its slot. Popping empties the slot, so a drained queue is clean and
/// can be reused by the next job on the same worker.
#[derive(Debug, Default)]
pub struct PaintQueue {
    slots: Vec<Option<PaintedNode>>,
    dirty: BinaryHeap<Reverse<usize>>,
}

impl PaintQueue {
    /// Queue able to hold nodes `0..capacity` without growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            dirty: BinaryHeap::new(),
        }
    }

    /// Add `paint` at `node`, creating the entry if absent.
    ///
    /// An existing entry keeps its first predicate and predecessor.
    pub fn deposit(&mut self, node: usize, predicate: Option<usize>, prev: Option<usize>, paint: f64) {
        if node >= self.slots.len() {
            self.slots.resize(node + 1, None);
        }
        if let Some(pending) = self.slots[node].as_mut() {
            pending.add_paint(paint);
            return;
        }
        self.slots[node] = Some(PaintedNode {
            node,
            predicate,
            prev,
            paint,
        });
        self.dirty.push(Reverse(node));
    }

    /// Insert a fresh node (used for the seed).
    pub fn push(&mut self, painted: PaintedNode) {
        self.deposit(painted.node, painted.predicate, painted.prev, painted.paint);
    }

    /// Remove and return the pending node with the smallest id.
    pub fn pop_first(&mut self) -> Option<PaintedNode> {
        while let Some(Reverse(node)) = self.dirty.pop() {
            if let Some(painted) = self.slots[node].take() {
                return Some(painted);
            }
        }
        None
    }

    /// Paint currently pending at `node`.
    pub fn pending(&self, node: usize) -> Option<&PaintedNode> {
        self.slots.get(node).and_then(Option::as_ref)
    }

    /// Number of pending nodes.
    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Drop all pending nodes, touching only occupied slots.
    pub fn clear(&mut self) {
        while let Some(Reverse(node)) = self.dirty.pop() {
            self.slots[node] = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_id_order_not_paint_order() {
        let mut q = PaintQueue::with_capacity(8);
        q.deposit(5, Some(0), Some(1), 0.9);
        q.deposit(2, Some(0), Some(1), 0.01);
        q.deposit(7, Some(0), Some(1), 0.5);

        let order: Vec<usize> = std::iter::from_fn(|| q.pop_first()).map(|p| p.node).collect();
        assert_eq!(order, vec![2, 5, 7]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_merge_keeps_first_arrival() {
        let mut q = PaintQueue::with_capacity(4);
        q.deposit(3, Some(1), Some(0), 0.25);
        q.deposit(3, Some(2), Some(1), 0.5);

        assert_eq!(q.len(), 1);
        let p = q.pop_first().unwrap();
        assert_eq!(p.predicate, Some(1));
        assert_eq!(p.prev, Some(0));
        assert!((p.paint - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_requeue_after_pop_and_growth() {
        let mut q = PaintQueue::with_capacity(1);
        q.push(PaintedNode::seed(0));
        assert_eq!(q.pop_first().unwrap().paint, 1.0);

        q.deposit(0, None, Some(4), 0.1);
        q.deposit(10, None, Some(0), 0.2);
        assert_eq!(q.pending(10).map(|p| p.paint), Some(0.2));
        assert_eq!(q.pop_first().unwrap().node, 0);
        assert_eq!(q.pop_first().unwrap().node, 10);
        assert_eq!(q.pop_first(), None);
    }

    #[test]
    fn test_clear_resets_slots() {
        let mut q = PaintQueue::with_capacity(4);
        q.deposit(1, None, None, 1.0);
        q.deposit(3, None, None, 1.0);
        q.clear();
        assert!(q.is_empty());
        assert!(q.pending(1).is_none());
        q.deposit(1, Some(9), None, 0.5);
        assert_eq!(q.pop_first().unwrap().predicate, Some(9));
    }
}

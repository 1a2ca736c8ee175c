//! Global-to-local index scratch buffer
//!
//! One buffer of N slots is reused for every micro-table build. Each build
//! binds the slots of its own nodes and must release exactly those slots
//! afterwards; a stale slot would let the next micro tree see a parent
//! that does not belong to it.

use crate::NodeId;

/// Reusable `global id -> local index` map.
#[derive(Debug)]
pub struct LocalIndexBuffer {
    slots: Vec<Option<usize>>,
    bound: usize,
}

impl LocalIndexBuffer {
    /// Buffer covering ids `0..nodes_count`, all slots empty.
    pub fn new(nodes_count: usize) -> Self {
        Self {
            slots: vec![None; nodes_count],
            bound: 0,
        }
    }

    /// Assign local index `i` to `nodes[i]`.
    pub fn bind(&mut self, nodes: &[NodeId]) {
        debug_assert_eq!(self.bound, 0, "scratch buffer bound twice");
        for (local, &node) in nodes.iter().enumerate() {
            self.slots[node] = Some(local);
        }
        self.bound = nodes.len();
    }

    /// Local index of `node` in the current binding
    #[inline]
    pub fn local(&self, node: NodeId) -> Option<usize> {
        self.slots[node]
    }

    /// Clear exactly the slots set by the matching [`bind`](Self::bind).
    pub fn release(&mut self, nodes: &[NodeId]) {
        debug_assert_eq!(self.bound, nodes.len(), "release does not match bind");
        for &node in nodes {
            self.slots[node] = None;
        }
        self.bound = 0;
    }

    /// True when no slot is bound
    pub fn is_clear(&self) -> bool {
        self.bound == 0 && self.slots.iter().all(Option::is_none)
    }
}

//! Jump-node identification
//!
//! A node qualifies when `subtree_size >= B` and none of its children do.
//! Qualification depends only on precomputed subtree sizes; the post-order
//! pass fixes the order of the jump-node list.

use tracing::debug;

use crate::{
    tree::{DepthFirst, RootedTree, Visit},
    NodeId,
};

/// Jump-node membership plus the list in post-order.
#[derive(Debug, Clone)]
pub struct JumpNodes {
    flags: Vec<bool>,
    list: Vec<NodeId>,
    block_size: usize,
}

impl JumpNodes {
    /// Classify every node against block threshold `block_size`.
    pub fn identify(tree: &RootedTree, block_size: usize) -> Self {
        let mut flags = vec![false; tree.len()];
        let mut list = Vec::new();

        for visit in DepthFirst::new(tree.adjacency(), tree.root()) {
            let Visit::Exit(node) = visit else {
                continue;
            };

            let qualifies = tree.subtree_size(node) >= block_size;
            let maximal = tree
                .children(node)
                .iter()
                .all(|&child| tree.subtree_size(child) < block_size);

            if qualifies && maximal {
                flags[node] = true;
                list.push(node);
            }
        }

        debug!(block_size, jump_nodes = list.len(), "jump nodes identified");
        Self {
            flags,
            list,
            block_size,
        }
    }

    /// Is `node` a jump node?
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.flags[node]
    }

    /// Jump nodes in post-order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.list.iter().copied()
    }

    /// Number of jump nodes
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// True when no node reaches the block threshold
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Block threshold used for classification
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

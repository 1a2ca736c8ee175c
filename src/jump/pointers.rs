//! Sparse jump-pointer table
//!
//! For each jump node `v` and each `k < log_bits(N)`, stores the ancestor
//! `2^k` levels up. Rows are filled with ladder queries, so the whole table
//! costs O(#jump nodes · log N) = O(N) time.

use tracing::debug;

use super::JumpNodes;
use crate::{ladder::LadderDecomposition, tree::RootedTree, NodeId};

/// Binary-lifting rows, present only for jump nodes.
#[derive(Debug, Clone)]
pub struct JumpPointers {
    rows: Vec<Option<Box<[NodeId]>>>,
    levels: usize,
}

impl JumpPointers {
    /// Fill one row of `levels` entries per jump node.
    pub fn build(
        tree: &RootedTree,
        ladders: &LadderDecomposition,
        jump_nodes: &JumpNodes,
        levels: usize,
    ) -> Self {
        let mut rows = vec![None; tree.len()];

        for node in jump_nodes.iter() {
            let row: Box<[NodeId]> = (0..levels)
                .map(|k| ladders.ancestor(tree, node, 1usize << k))
                .collect();
            rows[node] = Some(row);
        }

        let pointers = Self { rows, levels };
        debug!(
            levels,
            cells = pointers.total_cells(),
            "jump pointers built"
        );
        pointers
    }

    /// Row of `node`: entry `k` is the ancestor at distance `2^k`.
    #[inline]
    pub fn row(&self, node: NodeId) -> Option<&[NodeId]> {
        self.rows[node].as_deref()
    }

    /// Ancestor `2^level` levels above the jump node `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a jump node or `level >= levels()`.
    #[inline]
    pub fn pointer(&self, node: NodeId, level: usize) -> NodeId {
        match self.rows[node].as_deref() {
            Some(row) => row[level],
            None => panic!("node {} has no jump-pointer row", node),
        }
    }

    /// Entries per row
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of stored pointers
    pub fn total_cells(&self) -> usize {
        self.rows.iter().flatten().map(|row| row.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jump::log_bits;
    use crate::tree::TreeBuilder;

    #[test]
    fn test_rows_match_powers_of_two() {
        let n = 20;
        let mut builder = TreeBuilder::new(n);
        for i in 0..n - 1 {
            builder.add_edge(i, i + 1).unwrap();
        }
        let tree = builder.into_tree(0).unwrap();
        let ladders = LadderDecomposition::build(&tree);
        let jumps = JumpNodes::identify(&tree, 1);
        let pointers = JumpPointers::build(&tree, &ladders, &jumps, log_bits(n));

        // Only the leaf qualifies on a chain with B = 1.
        assert_eq!(jumps.iter().collect::<Vec<_>>(), vec![19]);
        assert!(pointers.row(18).is_none());

        let row = pointers.row(19).unwrap();
        assert_eq!(row.len(), pointers.levels());
        assert_eq!(row, &[18, 17, 15, 11, 3]);
        assert_eq!(pointers.total_cells(), 5);
        assert_eq!(pointers.pointer(19, 3), 11);
    }

    #[test]
    #[should_panic(expected = "no jump-pointer row")]
    fn test_pointer_on_non_jump_node_panics() {
        let mut builder = TreeBuilder::new(3);
        builder.add_edge(0, 1).unwrap();
        builder.add_edge(1, 2).unwrap();
        let tree = builder.into_tree(0).unwrap();
        let ladders = LadderDecomposition::build(&tree);
        let jumps = JumpNodes::identify(&tree, 1);
        let pointers = JumpPointers::build(&tree, &ladders, &jumps, log_bits(3));

        pointers.pointer(1, 0);
    }

    #[test]
    fn test_pointer_past_root_is_root() {
        let mut builder = TreeBuilder::new(3);
        builder.add_edge(0, 1).unwrap();
        builder.add_edge(1, 2).unwrap();
        let tree = builder.into_tree(0).unwrap();
        let ladders = LadderDecomposition::build(&tree);
        let jumps = JumpNodes::identify(&tree, 1);
        let pointers = JumpPointers::build(&tree, &ladders, &jumps, log_bits(3));

        assert_eq!(pointers.row(2).unwrap(), &[1, 0]);
    }
}

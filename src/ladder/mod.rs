//! Ladder (long-path) decomposition
//!
//! The tree is cut into vertical paths that always continue into the
//! long-path child. Each path of length `h` is stored as a ladder of `2h`
//! cells: `h` ancestors above the path head, then the path itself.
//!
//! Ladder layout for a path `p_0 .. p_{h-1}` (p_0 = head):
//!   [a_h, ..., a_2, a_1, p_0, p_1, ..., p_{h-1}]
//!   ^ position 0        ^ position h
//!
//! Cell `p` holds the node at depth `depth(p_0) - (h - p)`. Ancestors
//! above the root are padded with the root; queries never read them
//! because they check `distance < depth(node)` first.

use tracing::debug;

use crate::{tree::RootedTree, NodeId};

/// All ladders plus each node's `(ladder id, position)`.
#[derive(Debug, Clone)]
pub struct LadderDecomposition {
    ladders: Vec<Box<[NodeId]>>,
    ladder_id: Vec<usize>,
    position: Vec<usize>,
}

impl LadderDecomposition {
    /// Build ladders for every long path. Time and space: O(N).
    pub fn build(tree: &RootedTree) -> Self {
        let n = tree.len();
        let root = tree.root();
        let mut ladders = Vec::new();
        let mut ladder_id = vec![0; n];
        let mut position = vec![0; n];
        let mut path = Vec::new();

        for head in 0..n {
            let is_head = head == root || tree.long_path_child(tree.parent(head)) != Some(head);
            if !is_head {
                continue;
            }

            path.clear();
            let mut current = Some(head);
            while let Some(node) = current {
                path.push(node);
                current = tree.long_path_child(node);
            }

            let length = path.len();
            let mut ladder = vec![root; 2 * length];

            let mut ancestor = tree.parent(head);
            for k in 0..length {
                ladder[length - 1 - k] = ancestor;
                ancestor = tree.parent(ancestor);
            }

            let id = ladders.len();
            for (k, &node) in path.iter().enumerate() {
                ladder[length + k] = node;
                ladder_id[node] = id;
                position[node] = length + k;
            }
            ladders.push(ladder.into_boxed_slice());
        }

        let decomposition = Self {
            ladders,
            ladder_id,
            position,
        };
        debug!(
            ladders = decomposition.ladder_count(),
            cells = decomposition.total_cells(),
            "ladder decomposition built"
        );
        decomposition
    }

    /// Ancestor `distance` levels above `node`.
    ///
    /// Returns the root when `distance >= depth(node)`. Within one ladder
    /// this is a single array read; otherwise the walk hops to the top of
    /// the current ladder and continues with the residual distance. Every
    /// hop strictly decreases depth, so the loop terminates.
    ///
    /// `tree` must be the tree these ladders were built from; outside the
    /// crate, climbs go through [`LevelAncestor`](crate::LevelAncestor),
    /// which owns both.
    ///
    /// ```compile_fail
    /// use level_ancestor::LevelAncestor;
    ///
    /// let la = LevelAncestor::new(1).preprocess(0).unwrap();
    /// la.ladders().ancestor(la.tree(), 0, 0);
    /// ```
    pub(crate) fn ancestor(&self, tree: &RootedTree, node: NodeId, distance: usize) -> NodeId {
        let mut node = node;
        let mut distance = distance;

        loop {
            if distance == 0 {
                return node;
            }
            if distance >= tree.depth(node) {
                return tree.root();
            }

            let ladder = &self.ladders[self.ladder_id[node]];
            let position = self.position[node];
            if distance <= position {
                return ladder[position - distance];
            }

            // Top cell is `position` levels up and below the root here.
            node = ladder[0];
            distance -= position;
        }
    }

    /// Number of ladders (= number of long paths)
    pub fn ladder_count(&self) -> usize {
        self.ladders.len()
    }

    /// Total number of cells over all ladders (exactly 2N).
    pub fn total_cells(&self) -> usize {
        self.ladders.iter().map(|ladder| ladder.len()).sum()
    }

    /// Ladder `id` as a slice
    pub fn ladder(&self, id: usize) -> &[NodeId] {
        &self.ladders[id]
    }

    /// `(ladder id, position)` of `node` inside its own ladder.
    pub fn location(&self, node: NodeId) -> (usize, usize) {
        (self.ladder_id[node], self.position[node])
    }
}

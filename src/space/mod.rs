//! Space accounting
//!
//! Counts the words held by each tier so the O(N) storage claims can be
//! checked on real inputs instead of taken on faith.

/// Per-component storage counts of a preprocessed structure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StorageProfile {
    /// Number of tree nodes N
    pub nodes: usize,

    /// Micro block threshold B
    pub block_size: usize,

    /// Entries per jump-pointer row
    pub log_n: usize,

    /// Number of ladders
    pub ladders: usize,

    /// Cells over all ladders
    pub ladder_cells: usize,

    /// Number of jump nodes
    pub jump_nodes: usize,

    /// Stored jump pointers
    pub jump_pointer_cells: usize,

    /// Nodes with a jump-node descendant
    pub macro_nodes: usize,

    /// Nodes inside micro trees
    pub micro_nodes: usize,

    /// Number of micro trees
    pub micro_trees: usize,

    /// Distinct micro-tree shapes
    pub unique_shapes: usize,

    /// Entries over all shared shape tables
    pub micro_table_cells: usize,
}

impl StorageProfile {
    /// Words stored by ladders, jump pointers, shape tables and the
    /// local-to-global maps (one word per micro node).
    pub fn total_cells(&self) -> usize {
        self.ladder_cells + self.jump_pointer_cells + self.micro_table_cells + self.micro_nodes
    }

    /// Ladders double each long path, and long paths partition the nodes.
    pub fn satisfies_linear_ladders(&self) -> bool {
        self.ladder_cells == 2 * self.nodes
    }

    /// Macro and micro regions partition the nodes.
    pub fn regions_partition_nodes(&self) -> bool {
        self.macro_nodes + self.micro_nodes == self.nodes
    }

    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "Nodes: {} (B = {}, log N = {})\n\
             Ladders: {} ({} cells)\n\
             Jump nodes: {} ({} pointers)\n\
             Macro nodes: {}\n\
             Micro nodes: {} in {} trees, {} shapes ({} table cells)\n\
             Total: {} cells",
            self.nodes,
            self.block_size,
            self.log_n,
            self.ladders,
            self.ladder_cells,
            self.jump_nodes,
            self.jump_pointer_cells,
            self.macro_nodes,
            self.micro_nodes,
            self.micro_trees,
            self.unique_shapes,
            self.micro_table_cells,
            self.total_cells()
        )
    }
}

//! Micro-tree shapes and their shared ancestor tables
//!
//! A shape is the DFS edge sequence of a micro tree: `0` when descending
//! into a child, `1` when returning from it, after a leading `1` anchor.
//! Children are walked in insertion order, so equal codes mean equal
//! ordered trees and equal pre-order numbering. One table per code is
//! enough for every micro tree with that code.

use std::collections::HashMap;

use bitvec::prelude::*;
use tracing::trace;

/// Canonical bit encoding of an ordered micro tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeCode {
    bits: BitVec<u64, Lsb0>,
}

impl ShapeCode {
    /// Code of the single-node tree (anchor bit only).
    pub fn anchor() -> Self {
        Self {
            bits: bitvec![u64, Lsb0; 1],
        }
    }

    /// Record a step down into a child.
    #[inline]
    pub fn descend(&mut self) {
        self.bits.push(false);
    }

    /// Record the return from a child.
    #[inline]
    pub fn ascend(&mut self) {
        self.bits.push(true);
    }

    /// Number of nodes described by this code (edges + 1).
    pub fn node_count(&self) -> usize {
        (self.bits.len() - 1) / 2 + 1
    }

    /// Raw bits, anchor first
    pub fn bits(&self) -> &BitSlice<u64, Lsb0> {
        &self.bits
    }
}

/// Brute-force ancestor table for one shape.
///
/// `table[local][distance]` is the local index of the ancestor `distance`
/// levels above `local`, for `distance < size`. Local indices follow
/// pre-order, so index 0 is the micro root.
#[derive(Debug, Clone)]
pub struct MicroTable {
    size: usize,
    cells: Box<[usize]>,
}

impl MicroTable {
    /// Fill the table from local parent links (the root links to itself).
    ///
    /// Time: O(size²), size < B.
    pub fn from_parents(local_parent: &[usize]) -> Self {
        let size = local_parent.len();
        let mut cells = vec![0; size * size];

        for local in 0..size {
            let mut current = local;
            for distance in 0..size {
                cells[local * size + distance] = current;
                current = local_parent[current];
            }
        }

        Self {
            size,
            cells: cells.into_boxed_slice(),
        }
    }

    /// Local ancestor of `local` at `distance` levels up.
    ///
    /// # Panics
    ///
    /// Panics unless `local < size` and `distance < size`.
    #[inline]
    pub fn ancestor(&self, local: usize, distance: usize) -> usize {
        self.row(local)[distance]
    }

    /// Row of `local`: entry `d` is its ancestor `d` levels up.
    #[inline]
    pub fn row(&self, local: usize) -> &[usize] {
        &self.cells[local * self.size..][..self.size]
    }

    /// Nodes in the shape
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stored entries
    pub fn cells(&self) -> usize {
        self.cells.len()
    }
}

/// Identifier of a table in the [`ShapeLibrary`]
pub type ShapeId = usize;

/// Deduplicated tables keyed by shape code.
#[derive(Debug, Default)]
pub struct ShapeLibrary {
    tables: Vec<MicroTable>,
    index: HashMap<ShapeCode, ShapeId>,
}

impl ShapeLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `code`, building its table with `build` on first sight.
    pub fn intern<F>(&mut self, code: ShapeCode, build: F) -> ShapeId
    where
        F: FnOnce() -> MicroTable,
    {
        if let Some(&id) = self.index.get(&code) {
            return id;
        }

        let id = self.tables.len();
        let table = build();
        debug_assert_eq!(table.size(), code.node_count());
        trace!(shape = id, nodes = table.size(), "new micro shape");
        self.tables.push(table);
        self.index.insert(code, id);
        id
    }

    /// Table for `id`
    #[inline]
    pub fn table(&self, id: ShapeId) -> &MicroTable {
        &self.tables[id]
    }

    /// Number of distinct shapes
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True before the first shape is interned
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Entries over all tables
    pub fn total_cells(&self) -> usize {
        self.tables.iter().map(MicroTable::cells).sum()
    }
}

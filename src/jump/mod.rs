//! Macro skeleton: jump nodes, sparse jump pointers, macro links
//!
//! A jump node is a maximally deep node whose subtree holds at least `B`
//! nodes. Only jump nodes carry binary-lifting tables, and there are
//! O(N / B) of them, so the tables cost O(N) words in total. Every other
//! node that has a jump node below it delegates to that jump node through
//! its macro link.

mod macro_link;
mod nodes;
mod pointers;

pub use macro_link::MacroLinks;
pub use nodes::JumpNodes;
pub use pointers::JumpPointers;

/// Bit length of `n` (`⌊log2 n⌋ + 1`), with 1 for `n <= 1`.
///
/// Also the number of jump-pointer levels: any distance below `n` has its
/// highest set bit below this value.
pub fn log_bits(n: usize) -> usize {
    if n > 1 {
        (usize::BITS - n.leading_zeros()) as usize
    } else {
        1
    }
}

/// Default micro block size: `B = max(1, log_bits(n) / 4)`.
pub fn block_threshold(n: usize) -> usize {
    (log_bits(n) / 4).max(1)
}

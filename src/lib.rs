//! Tetromino Stacking Optimizer Library
//!
//! Finds, for an ordered sequence of tetromino pieces, the per-piece drop
//! column and rotation that minimize the final stack height on a fixed-width
//! grid. The search enumerates every (column, rotation) permutation with a
//! mixed-radix counter, prunes subtrees whose prefix already matches the best
//! known height, reuses cached prefix states between neighboring
//! permutations, and splits the permutation space into contiguous ranges
//! solved by independent parallel workers.

pub mod counter;
pub mod grid;
pub mod pieces;
pub mod sequence;
pub mod solver;
pub mod space;

pub use sequence::{Sequence, SequenceError, MAX_SEQUENCE_LEN};
pub use solver::{solve, Solution, SolveError, DEFAULT_WORKERS};

//! Sizing of the drop permutation space and the per-piece weight table.
//!
//! Every piece contributes one choice per (rotation, legal column) pair; the
//! full space is the product of per-piece choice counts. The weight table
//! gives, for each piece, how many permutations one step of that piece's
//! counter spans; it is what converts "skip n permutations" into counter
//! increments for range partitioning and branch-and-bound jumps.

use thiserror::Error;

use crate::sequence::Sequence;

/// The permutation count does not fit the 64-bit counter.
///
/// Detected before any search begins; callers must not start a solve from a
/// wrapped count.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("permutation count overflows the 64-bit counter")]
pub struct Overflow;

/// Search-space model for one solve: a sequence dropped on a grid of a fixed
/// width. Immutable and shared read-only by all workers.
#[derive(Debug)]
pub struct Space<'a> {
    sequence: &'a Sequence,
    grid_width: usize,
    /// Per piece: permutations spanned by all pieces at or after that index.
    weights: Vec<u64>,
    total: u64,
}

impl<'a> Space<'a> {
    /// Sizes the space for `sequence` on a `grid_width`-column grid.
    ///
    /// Fails with [`Overflow`] when the total permutation count cannot be
    /// represented exactly; no partial model is produced. `grid_width` must
    /// be at least the widest variant of any piece in the sequence.
    pub fn new(sequence: &'a Sequence, grid_width: usize) -> Result<Self, Overflow> {
        let mut space = Self {
            sequence,
            grid_width,
            weights: Vec::new(),
            total: 0,
        };

        space.total = space.count_total()?;
        space.weights = space.build_weights();
        Ok(space)
    }

    #[inline]
    pub fn sequence(&self) -> &Sequence {
        self.sequence
    }

    #[inline]
    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    /// Total number of (column, rotation) permutations of the sequence.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[inline]
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Permutations spanned by one column step of the piece at `index`.
    #[inline]
    pub fn weight(&self, index: usize) -> u64 {
        self.weights[index]
    }

    /// Number of legal drop columns for piece `index` in `rotation`.
    #[inline]
    pub fn column_count(&self, index: usize, rotation: usize) -> usize {
        self.grid_width - self.sequence.kind(index).variant(rotation).width() + 1
    }

    /// Total (column, rotation) choices for piece `index`.
    pub fn choice_count(&self, index: usize) -> u64 {
        (0..self.sequence.rotation_count(index))
            .map(|rotation| self.column_count(index, rotation) as u64)
            .sum()
    }

    /// Multiplies per-piece choice counts, reporting overflow instead of
    /// wrapping. An empty sequence has zero permutations.
    fn count_total(&self) -> Result<u64, Overflow> {
        if self.sequence.is_empty() {
            return Ok(0);
        }

        let mut total = 1u64;
        for index in 0..self.sequence.len() {
            total = total
                .checked_mul(self.choice_count(index))
                .ok_or(Overflow)?;
        }
        Ok(total)
    }

    /// Builds the weight table right to left: the last piece weighs 1, each
    /// earlier piece weighs the next piece's choice count times its weight.
    fn build_weights(&self) -> Vec<u64> {
        let len = self.sequence.len();
        let mut weights = vec![0u64; len];
        if len == 0 {
            return weights;
        }

        weights[len - 1] = 1;
        for index in (0..len - 1).rev() {
            weights[index] = self.choice_count(index + 1) * weights[index + 1];
        }
        weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_without_rotation() {
        // Z, S: width 3 -> 4 columns; O: width 2 -> 5 columns
        let sequence = Sequence::parse("ZOZS", false).unwrap();
        let space = Space::new(&sequence, 6).unwrap();
        assert_eq!(space.total(), 4 * 5 * 4 * 4);
    }

    #[test]
    fn test_total_with_rotation() {
        // Z and S span 4 + 5 columns over their two rotations, I spans 6 + 3
        let sequence = Sequence::parse("ZISS", true).unwrap();
        let space = Space::new(&sequence, 6).unwrap();
        assert_eq!(space.choice_count(0), 9);
        assert_eq!(space.choice_count(1), 9);
        assert_eq!(space.total(), 9 * 9 * 9 * 9);
    }

    #[test]
    fn test_weight_invariants() {
        let sequence = Sequence::parse("SZLS", true).unwrap();
        let space = Space::new(&sequence, 6).unwrap();
        let weights = space.weights();

        assert_eq!(weights[sequence.len() - 1], 1);
        for index in 0..sequence.len() - 1 {
            assert_eq!(
                weights[index],
                space.choice_count(index + 1) * weights[index + 1]
            );
        }
        assert_eq!(space.total(), space.choice_count(0) * weights[0]);
    }

    #[test]
    fn test_empty_sequence_has_zero_permutations() {
        let sequence = Sequence::parse("", false).unwrap();
        let space = Space::new(&sequence, 6).unwrap();
        assert_eq!(space.total(), 0);
        assert!(space.weights().is_empty());
    }

    #[test]
    fn test_overflow_is_reported() {
        // a rotating T spans 18 choices; 18^16 exceeds u64::MAX
        let sequence = Sequence::parse(&"T".repeat(16), true).unwrap();
        assert_eq!(Space::new(&sequence, 6).unwrap_err(), Overflow);

        // one piece fewer still fits
        let sequence = Sequence::parse(&"T".repeat(15), true).unwrap();
        assert!(Space::new(&sequence, 6).is_ok());
    }
}

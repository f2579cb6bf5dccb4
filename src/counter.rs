//! The mixed-radix permutation cursor.
//!
//! One (column, rotation) counter pair per piece, incremented like an
//! odometer: the last piece's column counter is least significant, a full
//! cycle of columns steps the rotation, a full cycle of rotations carries
//! into the previous piece. The column radix depends on the piece's current
//! rotation (wider variants fit fewer columns), so it is recomputed whenever
//! the rotation counter moves.

use crate::space::Space;

/// Outcome of an odometer step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The earliest (leftmost) piece whose column or rotation changed;
    /// pieces before it are exactly as in the previous permutation.
    Changed(usize),
    /// Every piece wrapped; the counter is back at the first permutation.
    Exhausted,
}

/// Cursor state for one piece.
#[derive(Clone, Debug, PartialEq, Eq)]
struct PieceCursor {
    column: usize,
    rotation: usize,
    /// Radix of `column` for the current rotation.
    columns: usize,
    /// Radix of `rotation`.
    rotations: usize,
}

/// The enumeration cursor over a [`Space`]: identifies one permutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counter {
    cursors: Vec<PieceCursor>,
}

impl Counter {
    /// The first permutation: every piece at rotation 0, column 0.
    pub fn first(space: &Space) -> Self {
        let cursors = (0..space.sequence().len())
            .map(|index| PieceCursor {
                column: 0,
                rotation: 0,
                columns: space.column_count(index, 0),
                rotations: space.sequence().rotation_count(index),
            })
            .collect();
        Self { cursors }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Current column of the piece at `index`.
    #[inline]
    pub fn column(&self, index: usize) -> usize {
        self.cursors[index].column
    }

    /// Current rotation of the piece at `index`.
    #[inline]
    pub fn rotation(&self, index: usize) -> usize {
        self.cursors[index].rotation
    }

    /// Snapshot of all column counters.
    pub fn columns(&self) -> Vec<usize> {
        self.cursors.iter().map(|cursor| cursor.column).collect()
    }

    /// Snapshot of all rotation counters.
    pub fn rotations(&self) -> Vec<usize> {
        self.cursors.iter().map(|cursor| cursor.rotation).collect()
    }

    /// Steps to the next permutation.
    pub fn advance_one(&mut self, space: &Space) -> Advance {
        if self.cursors.is_empty() {
            return Advance::Exhausted;
        }
        self.increment_at(space, self.cursors.len() - 1)
    }

    /// Steps the column counter of the piece at `index`, with carry confined
    /// to that piece and earlier pieces. Later pieces are never touched.
    pub fn increment_at(&mut self, space: &Space, index: usize) -> Advance {
        for piece in (0..=index).rev() {
            let cursor = &mut self.cursors[piece];

            cursor.column += 1;
            if cursor.column < cursor.columns {
                return Advance::Changed(piece);
            }

            // all columns tried in this rotation
            cursor.column = 0;
            cursor.rotation += 1;
            if cursor.rotation < cursor.rotations {
                cursor.columns = space.column_count(piece, cursor.rotation);
                return Advance::Changed(piece);
            }

            // all rotations tried: reset the piece and carry left
            cursor.rotation = 0;
            cursor.columns = space.column_count(piece, 0);
        }

        Advance::Exhausted
    }

    /// Jumps forward by `n` permutations using the weight table, producing
    /// exactly the state `n` calls to [`Counter::advance_one`] would.
    ///
    /// Returns the earliest piece index changed by the jump, or the sequence
    /// length when `n` is zero. A jump past the end of the space wraps, like
    /// the single step; callers bound their loops by permutation counts, so
    /// the wrapped state is never evaluated.
    pub fn advance_by(&mut self, space: &Space, n: u64) -> usize {
        let mut consumed = 0u64;
        let mut earliest = self.cursors.len();

        for piece in 0..self.cursors.len() {
            let weight = space.weight(piece);
            while consumed + weight <= n {
                match self.increment_at(space, piece) {
                    Advance::Changed(index) => earliest = earliest.min(index),
                    Advance::Exhausted => earliest = 0,
                }
                consumed += weight;
            }
        }

        earliest
    }
}

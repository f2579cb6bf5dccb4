//! Piece sequences and input-boundary validation.

use std::fmt;

use thiserror::Error;

use crate::pieces::PieceKind;

/// Longest sequence accepted at the input boundary.
///
/// Longer sequences would overflow the 64-bit permutation counter long before
/// memory became a concern, so the bound mostly exists to give callers a
/// clear error up front.
pub const MAX_SEQUENCE_LEN: usize = 20;

/// Rejection reasons for a piece sequence.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("unknown piece symbol '{0}'")]
    UnknownSymbol(char),

    #[error("sequence has {0} pieces, the maximum is {MAX_SEQUENCE_LEN}")]
    TooLong(usize),
}

/// An ordered list of pieces to drop, plus the rotation policy.
///
/// Immutable once constructed; every search over it shares it read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    pieces: Vec<PieceKind>,
    allow_rotation: bool,
}

impl Sequence {
    /// Builds a sequence from piece kinds, enforcing the length bound.
    pub fn new(pieces: Vec<PieceKind>, allow_rotation: bool) -> Result<Self, SequenceError> {
        if pieces.len() > MAX_SEQUENCE_LEN {
            return Err(SequenceError::TooLong(pieces.len()));
        }
        Ok(Self {
            pieces,
            allow_rotation,
        })
    }

    /// Parses a sequence from its piece letters, e.g. `"ZOZS"`.
    pub fn parse(text: &str, allow_rotation: bool) -> Result<Self, SequenceError> {
        let pieces = text
            .chars()
            .map(|symbol| PieceKind::from_symbol(symbol).ok_or(SequenceError::UnknownSymbol(symbol)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(pieces, allow_rotation)
    }

    #[inline]
    pub fn pieces(&self) -> &[PieceKind] {
        &self.pieces
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[inline]
    pub fn allow_rotation(&self) -> bool {
        self.allow_rotation
    }

    /// The kind of the piece at `index`.
    #[inline]
    pub fn kind(&self, index: usize) -> PieceKind {
        self.pieces[index]
    }

    /// Number of rotations the piece at `index` may be dropped in: its
    /// natural rotation count, or 1 when rotation is disabled.
    #[inline]
    pub fn rotation_count(&self, index: usize) -> usize {
        if self.allow_rotation {
            self.pieces[index].rotation_count()
        } else {
            1
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            write!(f, "{}", piece.symbol())?;
        }
        Ok(())
    }
}

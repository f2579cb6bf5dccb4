//! Column-height stacking: gravity collision, drops, and text rendering.
//!
//! During search the grid is only ever a vector of per-column heights; the
//! full cell grid is reconstructed from a finished placement for display.

use crate::pieces::PieceVariant;
use crate::sequence::Sequence;

/// The row at which `variant`'s bottom row comes to rest when dropped into
/// `column`, given the current column heights.
///
/// The piece rests on whichever of its columns meets the tallest obstruction;
/// a column with clearance (an overhang) tucks over correspondingly lower
/// stacks.
pub fn landing_height(variant: &PieceVariant, column: usize, heights: &[u32]) -> u32 {
    let mut landing = 0;
    for col in 0..variant.width() {
        let supported = heights[column + col].saturating_sub(variant.clearance(col));
        if supported > landing {
            landing = supported;
        }
    }
    landing
}

/// Drops `variant` into `column`, updating the column heights. Returns the
/// landing row of the piece's bottom row.
pub fn drop_piece(variant: &PieceVariant, column: usize, heights: &mut [u32]) -> u32 {
    let landing = landing_height(variant, column, heights);
    for col in 0..variant.width() {
        heights[column + col] = landing + variant.contact(col);
    }
    landing
}

/// Height of the tallest column.
pub fn stack_height(heights: &[u32]) -> u32 {
    heights.iter().copied().max().unwrap_or(0)
}

/// Renders the stack produced by dropping `sequence` with the given per-piece
/// columns and rotations, as rows of piece letters from the top down, `.` for
/// empty cells. Returns an empty string for an empty sequence.
pub fn render(
    sequence: &Sequence,
    columns: &[usize],
    rotations: &[usize],
    grid_width: usize,
) -> String {
    let mut heights = vec![0u32; grid_width];
    let mut painted: Vec<(usize, u32, char)> = Vec::new();

    for (index, kind) in sequence.pieces().iter().enumerate() {
        let variant = kind.variant(rotations[index]);
        let landing = drop_piece(variant, columns[index], &mut heights);
        for &(col, row) in variant.cells() {
            painted.push((
                columns[index] + col as usize,
                landing + row as u32,
                kind.symbol(),
            ));
        }
    }

    let top = stack_height(&heights) as usize;
    let mut grid = vec![b'.'; grid_width * top];
    for (col, row, symbol) in painted {
        grid[row as usize * grid_width + col] = symbol as u8;
    }

    let mut output = String::with_capacity(top * (grid_width + 1));
    for row in (0..top).rev() {
        for col in 0..grid_width {
            output.push(grid[row * grid_width + col] as char);
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PieceKind;

    #[test]
    fn test_landing_on_flat_ground() {
        let heights = [0u32; 6];
        for kind in PieceKind::ALL {
            for variant in kind.variants() {
                assert_eq!(landing_height(variant, 0, &heights), 0);
            }
        }
    }

    #[test]
    fn test_landing_rests_on_tallest_obstruction() {
        // flat I across columns 0..4 with a spike in column 2
        let heights = [1, 0, 3, 0, 0, 0];
        let flat = PieceKind::I.variant(1);
        assert_eq!(landing_height(flat, 0, &heights), 3);
    }

    #[test]
    fn test_overhang_tucks_over_lower_stack() {
        // S has clearance 1 under its right column: a height-1 stack there
        // does not lift the piece
        let heights = [0, 0, 1, 0, 0, 0];
        let s = PieceKind::S.variant(0);
        assert_eq!(landing_height(s, 0, &heights), 0);

        // height 2 does
        let heights = [0, 0, 2, 0, 0, 0];
        assert_eq!(landing_height(s, 0, &heights), 1);
    }

    #[test]
    fn test_drop_updates_contact_profile() {
        let mut heights = [0u32; 6];
        drop_piece(PieceKind::Z.variant(0), 0, &mut heights);
        assert_eq!(heights, [2, 2, 1, 0, 0, 0]);

        // O lands on the Z's left columns
        let landing = drop_piece(PieceKind::O.variant(0), 0, &mut heights);
        assert_eq!(landing, 2);
        assert_eq!(heights, [4, 4, 1, 0, 0, 0]);
    }

    #[test]
    fn test_stack_height() {
        assert_eq!(stack_height(&[0, 0, 0]), 0);
        assert_eq!(stack_height(&[1, 4, 2]), 4);
        assert_eq!(stack_height(&[]), 0);
    }

    #[test]
    fn test_render_known_placement() {
        let sequence = Sequence::parse("ZOZS", false).unwrap();
        let rendered = render(&sequence, &[0, 0, 2, 2], &[0, 0, 0, 0], 6);
        assert_eq!(rendered, "OO.SS.\nOOSS..\nZZZZ..\n.ZZZZ.\n");
    }

    #[test]
    fn test_render_empty_sequence() {
        let sequence = Sequence::parse("", false).unwrap();
        assert_eq!(render(&sequence, &[], &[], 6), "");
    }
}

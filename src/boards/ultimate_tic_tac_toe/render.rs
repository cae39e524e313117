use std::fmt;

use super::UltimateBoard;

/// Maps a square of the 9x9 display grid to its `(board, cell)` indices.
pub(super) fn board_and_cell(row: usize, col: usize) -> (usize, usize) {
    let board = (row / 3) * 3 + col / 3;
    let cell = (row % 3) * 3 + col % 3;
    (board, cell)
}

impl fmt::Display for UltimateBoard {
    /// Renders the 81 cells as a 9x9 grid, sub-boards separated by `|` and `-` rules.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..9 {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for col in 0..9 {
                if col > 0 && col % 3 == 0 {
                    f.write_str(" |")?;
                }
                if col > 0 {
                    f.write_str(" ")?;
                }
                let (board, cell) = board_and_cell(row, col);
                write!(f, "{}", self.cells[board][cell].to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

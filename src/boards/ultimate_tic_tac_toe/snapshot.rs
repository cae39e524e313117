//! A flat, serde-friendly picture of a position.
//!
//! Only the cells, the side to move and the forced sub-board are stored; sub-board statuses and
//! the overall outcome are derived again when a snapshot is loaded.

use serde::{Deserialize, Serialize};

use super::render::board_and_cell;
use super::{ActiveSelection, Move, Outcome, UltimateBoard};
use crate::boards::grid::{Cell, Player, SubBoardStatus, grid_status};
use crate::error::BoardError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// 81 cells, sub-board major: index `board * 9 + cell`.
    pub cells: Vec<Cell>,
    pub current_player: Player,
    /// `None` means free choice among the sub-boards still in progress.
    pub forced_board: Option<usize>,
    #[serde(default)]
    pub previous_move: Option<Move>,
}

impl BoardSnapshot {
    /// Reads cells from a 9x9 text grid laid out like the board's `Display` output.
    ///
    /// `.`, `X` and `O` are cells; whitespace and the `|`, `-`, `+` separators are skipped.
    pub fn from_layout(
        layout: &str,
        current_player: Player,
        forced_board: Option<usize>,
    ) -> Result<Self, BoardError> {
        let mut cells = vec![Cell::Empty; 81];
        let mut position = 0;
        for c in layout.chars() {
            if c.is_whitespace() || matches!(c, '|' | '-' | '+') {
                continue;
            }
            let cell = Cell::from_char(c)
                .ok_or_else(|| BoardError::InvalidSnapshot(format!("unexpected character {c:?}")))?;
            if position >= 81 {
                return Err(BoardError::InvalidSnapshot(
                    "layout has more than 81 cells".to_string(),
                ));
            }
            let (board, idx) = board_and_cell(position / 9, position % 9);
            cells[board * 9 + idx] = cell;
            position += 1;
        }
        if position != 81 {
            return Err(BoardError::InvalidSnapshot(format!(
                "layout has {position} cells, expected 81"
            )));
        }

        Ok(Self {
            cells,
            current_player,
            forced_board,
            previous_move: None,
        })
    }
}

impl UltimateBoard {
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            cells: self.cells.iter().flatten().copied().collect(),
            current_player: self.current_player,
            forced_board: match self.selection {
                ActiveSelection::Forced(board) => Some(board),
                ActiveSelection::Free => None,
            },
            previous_move: self.previous_move,
        }
    }

    /// Rebuilds a position, deriving every sub-board status and the overall outcome.
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Result<Self, BoardError> {
        if snapshot.cells.len() != 81 {
            return Err(BoardError::InvalidSnapshot(format!(
                "expected 81 cells, got {}",
                snapshot.cells.len()
            )));
        }

        let mut cells = [[Cell::Empty; 9]; 9];
        for (idx, &cell) in snapshot.cells.iter().enumerate() {
            cells[idx / 9][idx % 9] = cell;
        }
        let meta = cells.map(|grid| grid_status(&grid));

        let selection = match snapshot.forced_board {
            Some(board) if board >= 9 => {
                return Err(BoardError::InvalidSnapshot(format!(
                    "forced board {board} is out of range"
                )));
            }
            Some(board) if meta[board].is_resolved() => {
                return Err(BoardError::InvalidSnapshot(format!(
                    "forced board {board} is already resolved"
                )));
            }
            Some(board) => ActiveSelection::Forced(board),
            None => ActiveSelection::Free,
        };

        if let Some(mv) = snapshot.previous_move {
            if mv.board >= 9 || mv.cell >= 9 || cells[mv.board][mv.cell].is_empty() {
                return Err(BoardError::InvalidSnapshot(format!(
                    "previous move {mv:?} does not point at a marked cell"
                )));
            }
        }

        let mut outcome = Outcome::from(grid_status(&meta));
        if outcome == Outcome::Ongoing && meta.iter().all(|s| *s != SubBoardStatus::InProgress) {
            outcome = Outcome::Draw;
        }

        Ok(Self {
            cells,
            meta,
            selection,
            current_player: snapshot.current_player,
            previous_move: snapshot.previous_move,
            outcome,
        })
    }
}

impl TryFrom<BoardSnapshot> for UltimateBoard {
    type Error = BoardError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self, Self::Error> {
        UltimateBoard::from_snapshot(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::ultimate_tic_tac_toe::fixtures::ONE_WINNING_MOVE;

    #[test]
    fn snapshot_survives_json() {
        // arrange
        let (board, _) = UltimateBoard::new().transition(Move::new(0, 4)).unwrap();
        let (board, _) = board.transition(Move::new(4, 8)).unwrap();

        // act
        let json = serde_json::to_string(&board.snapshot()).unwrap();
        let restored: BoardSnapshot = serde_json::from_str(&json).unwrap();
        let restored = UltimateBoard::try_from(restored).unwrap();

        // assert
        assert_eq!(restored, board);
        assert_eq!(restored.active_selection(), ActiveSelection::Forced(8));
        assert_eq!(restored.previous_move(), Some(Move::new(4, 8)));
    }

    #[test]
    fn layout_matches_display() {
        let (board, _) = UltimateBoard::new().transition(Move::new(5, 1)).unwrap();

        let snapshot = BoardSnapshot::from_layout(&board.to_string(), Player::O, Some(1)).unwrap();

        assert_eq!(snapshot.cells, board.snapshot().cells);
    }

    #[test]
    fn statuses_are_derived_from_cells() {
        let snapshot = BoardSnapshot::from_layout(ONE_WINNING_MOVE, Player::X, None).unwrap();

        let board = UltimateBoard::from_snapshot(&snapshot).unwrap();

        assert_eq!(board.outcome(), Outcome::Ongoing);
        assert_eq!(board.sub_board_status(0), Some(SubBoardStatus::Won(Player::X)));
        assert_eq!(board.sub_board_status(1), Some(SubBoardStatus::Won(Player::O)));
        assert_eq!(board.sub_board_status(8), Some(SubBoardStatus::InProgress));
    }

    #[test]
    fn rejects_forcing_a_resolved_board() {
        let snapshot = BoardSnapshot::from_layout(ONE_WINNING_MOVE, Player::X, Some(0)).unwrap();

        let err = UltimateBoard::from_snapshot(&snapshot).unwrap_err();

        assert!(matches!(err, BoardError::InvalidSnapshot(_)));
    }

    #[test]
    fn rejects_short_layouts_and_bad_characters() {
        assert!(BoardSnapshot::from_layout("X..", Player::X, None).is_err());
        assert!(BoardSnapshot::from_layout(&"Z".repeat(81), Player::X, None).is_err());
        assert!(BoardSnapshot::from_layout(&".".repeat(82), Player::X, None).is_err());
    }
}

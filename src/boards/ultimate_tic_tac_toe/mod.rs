//! Ultimate Tic-Tac-Toe: nine tic-tac-toe sub-boards arranged in a 3x3 meta-grid.
//!
//! The cell a player marks decides which sub-board the opponent has to play in next. Winning
//! three sub-boards in a line of the meta-grid wins the game. The same win/draw check
//! ([`grid_status`]) is evaluated on a sub-board after every move and, whenever that sub-board
//! resolves, on the meta-grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::board::Board;
use crate::boards::grid::{Cell, Player, SubBoardStatus, grid_status};
use crate::error::{BoardError, IllegalMoveReason};

#[cfg(test)]
pub(crate) mod fixtures;
mod render;
pub mod snapshot;

pub use snapshot::BoardSnapshot;

/// A move: a sub-board index and a cell index within it, both row-major in `0..9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub board: usize,
    pub cell: usize,
}

impl Move {
    pub const fn new(board: usize, cell: usize) -> Self {
        Self { board, cell }
    }

    /// Builds a move from the sub-board's meta-grid coordinates and the cell's coordinates
    /// inside that sub-board.
    pub const fn from_coords(
        outer_row: usize,
        outer_col: usize,
        inner_row: usize,
        inner_col: usize,
    ) -> Self {
        Self {
            board: outer_row * 3 + outer_col,
            cell: inner_row * 3 + inner_col,
        }
    }

    /// `(row, col)` of the sub-board in the meta-grid.
    pub fn outer(&self) -> (usize, usize) {
        (self.board / 3, self.board % 3)
    }

    /// `(row, col)` of the cell within its sub-board.
    pub fn inner(&self) -> (usize, usize) {
        (self.cell / 3, self.cell % 3)
    }

    fn in_range(&self) -> bool {
        self.board < 9 && self.cell < 9
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (outer_row, outer_col) = self.outer();
        let (inner_row, inner_col) = self.inner();
        write!(f, "({outer_row},{outer_col})/({inner_row},{inner_col})")
    }
}

/// Overall result of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Ongoing,
    Win(Player),
    Draw,
}

impl From<SubBoardStatus> for Outcome {
    fn from(status: SubBoardStatus) -> Self {
        match status {
            SubBoardStatus::InProgress => Outcome::Ongoing,
            SubBoardStatus::Won(player) => Outcome::Win(player),
            SubBoardStatus::Drawn => Outcome::Draw,
        }
    }
}

/// Sub-boards eligible for the next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveSelection {
    /// The previous move sent the player to this sub-board.
    Forced(usize),
    /// Any sub-board still in progress.
    Free,
}

/// One Ultimate Tic-Tac-Toe position.
///
/// The board is a plain value: [`UltimateBoard::transition`] returns a new board and leaves
/// `self` untouched, so positions can be shared between search branches freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UltimateBoard {
    cells: [[Cell; 9]; 9],
    meta: [SubBoardStatus; 9],
    selection: ActiveSelection,
    current_player: Player,
    previous_move: Option<Move>,
    outcome: Outcome,
}

impl Default for UltimateBoard {
    /// An empty board with X to move and free choice of sub-board.
    fn default() -> Self {
        Self {
            cells: [[Cell::Empty; 9]; 9],
            meta: [SubBoardStatus::InProgress; 9],
            selection: ActiveSelection::Free,
            current_player: Player::X,
            previous_move: None,
            outcome: Outcome::Ongoing,
        }
    }
}

impl UltimateBoard {
    /// The starting position, see [`UltimateBoard::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The side whose turn it is.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// The last move played, `None` at the start of a game.
    pub fn previous_move(&self) -> Option<Move> {
        self.previous_move
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// `true` once the outcome is a win or a draw.
    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::Ongoing
    }

    /// Whether the next move is forced into one sub-board or free.
    pub fn active_selection(&self) -> ActiveSelection {
        self.selection
    }

    /// The meta-grid: the status of every sub-board.
    pub fn meta_grid(&self) -> &[SubBoardStatus; 9] {
        &self.meta
    }

    /// Status of one sub-board; `None` when `board` is not in `0..9`.
    pub fn sub_board_status(&self, board: usize) -> Option<SubBoardStatus> {
        self.meta.get(board).copied()
    }

    /// The nine cells of one sub-board; `None` when `board` is not in `0..9`.
    pub fn sub_board(&self, board: usize) -> Option<&[Cell; 9]> {
        self.cells.get(board)
    }

    /// One cell; `None` when either index is out of range.
    pub fn cell(&self, board: usize, cell: usize) -> Option<Cell> {
        self.cells.get(board)?.get(cell).copied()
    }

    /// Indices of the sub-boards the current player may play in. Empty once the game is over.
    pub fn active_boards(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }

        match self.selection {
            ActiveSelection::Forced(board) => vec![board],
            ActiveSelection::Free => (0..9)
                .filter(|&board| !self.meta[board].is_resolved())
                .collect(),
        }
    }

    fn is_active(&self, board: usize) -> bool {
        match self.selection {
            ActiveSelection::Forced(forced) => forced == board,
            ActiveSelection::Free => !self.meta[board].is_resolved(),
        }
    }

    fn check_legal(&self, mv: Move) -> Result<(), IllegalMoveReason> {
        if self.is_terminal() {
            return Err(IllegalMoveReason::GameOver);
        }
        if !mv.in_range() {
            return Err(IllegalMoveReason::OutOfRange);
        }
        if !self.is_active(mv.board) {
            return Err(IllegalMoveReason::InactiveBoard);
        }
        if !self.cells[mv.board][mv.cell].is_empty() {
            return Err(IllegalMoveReason::Occupied);
        }
        Ok(())
    }

    /// Whether `mv` targets an empty, in-range cell of an active sub-board in an undecided game.
    pub fn is_legal(&self, mv: Move) -> bool {
        self.check_legal(mv).is_ok()
    }

    /// All empty cells of the active sub-boards, ordered by sub-board then cell.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.active_boards()
            .into_iter()
            .flat_map(|board| {
                self.cells[board]
                    .iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.is_empty())
                    .map(move |(cell, _)| Move::new(board, cell))
            })
            .collect()
    }

    /// Plays `mv` for the current player and returns the resulting position with its outcome.
    ///
    /// Fails with [`BoardError::IllegalMove`] when [`UltimateBoard::is_legal`] is false.
    pub fn transition(&self, mv: Move) -> Result<(UltimateBoard, Outcome), BoardError> {
        if let Err(reason) = self.check_legal(mv) {
            debug!(%mv, %reason, "rejected move");
            return Err(BoardError::IllegalMove { mv, reason });
        }

        let mut next = *self;
        let outcome = next.place(mv);
        Ok((next, outcome))
    }

    /// Marks the cell and updates statuses, selection and turn. `mv` must be legal.
    fn place(&mut self, mv: Move) -> Outcome {
        self.cells[mv.board][mv.cell] = Cell::from(self.current_player);
        self.previous_move = Some(mv);

        let status = grid_status(&self.cells[mv.board]);
        if status.is_resolved() {
            self.meta[mv.board] = status;
            self.outcome = Outcome::from(grid_status(&self.meta));
        }

        // The cell's position inside its sub-board names the next sub-board.
        self.selection = if self.meta[mv.cell].is_resolved() {
            ActiveSelection::Free
        } else {
            ActiveSelection::Forced(mv.cell)
        };
        if self.outcome == Outcome::Ongoing && self.meta.iter().all(|s| s.is_resolved()) {
            self.outcome = Outcome::Draw;
        }

        self.current_player = self.current_player.opponent();
        self.outcome
    }
}

impl Board for UltimateBoard {
    type Move = Move;
    type Player = Player;
    type Error = BoardError;

    fn current_player(&self) -> Player {
        self.current_player
    }

    fn is_terminal(&self) -> bool {
        self.outcome != Outcome::Ongoing
    }

    fn available_moves(&self) -> Vec<Move> {
        self.legal_moves()
    }

    fn perform_move(&self, b_move: &Move) -> Result<Self, BoardError> {
        self.transition(*b_move).map(|(next, _)| next)
    }

    fn reward(&self, player: Player) -> f64 {
        match self.outcome {
            Outcome::Win(winner) if winner == player => 1.0,
            Outcome::Win(_) => -1.0,
            Outcome::Ongoing | Outcome::Draw => 0.0,
        }
    }
}

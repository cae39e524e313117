use crate::board::Board;
use crate::boards::grid::{Cell, Player, SubBoardStatus, grid_status};
use crate::error::IllegalMoveReason;

/// An implementation of the `Board` trait for the game of Tic-Tac-Toe.
///
/// The board is represented by a 9-element array, where each element corresponds to a cell.
/// A move is represented by a `u8` from 0 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicTacToeBoard {
    current_player: Player,
    field: [Cell; 9],
    status: SubBoardStatus,
}

impl Default for TicTacToeBoard {
    /// Creates a new Tic-Tac-Toe board with player 'X' starting.
    fn default() -> Self {
        Self {
            current_player: Player::X,
            field: [Cell::Empty; 9],
            status: SubBoardStatus::InProgress,
        }
    }
}

impl TicTacToeBoard {
    /// Builds a position from nine cells and the side to move.
    pub fn from_cells(field: [Cell; 9], current_player: Player) -> Self {
        Self {
            current_player,
            field,
            status: grid_status(&field),
        }
    }

    pub fn status(&self) -> SubBoardStatus {
        self.status
    }
}

impl Board for TicTacToeBoard {
    type Move = u8;
    type Player = Player;
    type Error = IllegalMoveReason;

    fn current_player(&self) -> Player {
        self.current_player
    }

    fn is_terminal(&self) -> bool {
        self.status.is_resolved()
    }

    fn available_moves(&self) -> Vec<u8> {
        if self.is_terminal() {
            return Vec::new();
        }

        self.field
            .iter()
            .enumerate()
            .filter(|(_, x)| x.is_empty())
            .map(|(i, _)| i as u8)
            .collect()
    }

    fn perform_move(&self, b_move: &u8) -> Result<Self, IllegalMoveReason> {
        if self.is_terminal() {
            return Err(IllegalMoveReason::GameOver);
        }
        let index = *b_move as usize;
        match self.field.get(index) {
            None => return Err(IllegalMoveReason::OutOfRange),
            Some(cell) if !cell.is_empty() => return Err(IllegalMoveReason::Occupied),
            Some(_) => {}
        }

        let mut next = *self;
        next.field[index] = Cell::from(self.current_player);
        next.current_player = self.current_player.opponent();
        next.status = grid_status(&next.field);
        Ok(next)
    }

    fn reward(&self, player: Player) -> f64 {
        match self.status {
            SubBoardStatus::Won(winner) if winner == player => 1.0,
            SubBoardStatus::Won(_) => -1.0,
            SubBoardStatus::InProgress | SubBoardStatus::Drawn => 0.0,
        }
    }
}

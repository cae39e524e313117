use thiserror::Error;

use crate::boards::ultimate_tic_tac_toe::Move;

/// Why a move was rejected by [`UltimateBoard::transition`].
///
/// [`UltimateBoard::transition`]: crate::boards::ultimate_tic_tac_toe::UltimateBoard::transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMoveReason {
    #[error("the game is already over")]
    GameOver,

    #[error("board or cell index is out of range")]
    OutOfRange,

    #[error("sub-board is not in the active selection")]
    InactiveBoard,

    #[error("cell is already occupied")]
    Occupied,
}

/// Errors raised by the Ultimate Tic-Tac-Toe rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The board is left untouched; retry with a legal move.
    #[error("illegal move {mv}: {reason}")]
    IllegalMove {
        mv: Move,
        reason: IllegalMoveReason,
    },

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Errors raised by the search tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MctsError {
    #[error("cannot choose a move: the root position is terminal")]
    NoMoveOnTerminal,
}

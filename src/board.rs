use std::error::Error;
use std::fmt::Debug;

/// The capability set the search engine needs from a game.
///
/// Implementations are value types: `perform_move` hands back a fresh board and never touches
/// `self`, so every node of the search tree owns its own independent copy of the game state.
pub trait Board: Clone {
    /// The type representing a move in the game.
    type Move: Clone + PartialEq + Debug;

    /// The type identifying a side in the game.
    type Player: Copy + PartialEq + Debug;

    /// Why a move was refused by [`Board::perform_move`].
    type Error: Error;

    /// Returns the player whose turn it is to make a move.
    fn current_player(&self) -> Self::Player;

    /// Returns `true` once the game is decided and no further moves are accepted.
    fn is_terminal(&self) -> bool;

    /// Returns all legal moves in a deterministic order. Empty only for terminal boards.
    fn available_moves(&self) -> Vec<Self::Move>;

    /// Returns the board reached by playing `b_move`.
    ///
    /// Moves outside [`Board::available_moves`] are rejected with an error and `self` is left
    /// as it was.
    fn perform_move(&self, b_move: &Self::Move) -> Result<Self, Self::Error>;

    /// Terminal reward from the point of view of `player`: `1.0` for a win, `-1.0` for a loss
    /// and `0.0` for a draw. Non-terminal boards score `0.0`.
    fn reward(&self, player: Self::Player) -> f64;
}

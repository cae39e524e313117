//! Pre-made implementations of the `Board` trait.

/// 3x3 grid primitives and the win/draw check shared by every board.
pub mod grid;
/// Classic 3x3 Tic-Tac-Toe.
pub mod tic_tac_toe;
/// Ultimate Tic-Tac-Toe, the nested 9x9 variant.
pub mod ultimate_tic_tac_toe;

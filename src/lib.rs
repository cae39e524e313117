//! Ultimate Tic-Tac-Toe and a small, game-agnostic Monte Carlo tree search.
//!
//! The crate has two halves. [`boards::ultimate_tic_tac_toe`] is the rules engine: a value-typed
//! position with a validated transition function, the nested "your cell picks my sub-board"
//! constraint and win detection on both the sub-boards and the meta-grid. [`mcts`] is the
//! search: repeated select, expand, simulate and backpropagate iterations over an arena tree,
//! generic over anything implementing [`Board`].
//!
//! # Example
//!
//! ```rust
//! use ultimate_mcts::boards::ultimate_tic_tac_toe::UltimateBoard;
//! use ultimate_mcts::mcts::MonteCarloTreeSearch;
//! use ultimate_mcts::random::CustomNumberGenerator;
//!
//! let board = UltimateBoard::new();
//!
//! // Create and configure a new MCTS search instance using the builder
//! let mut mcts = MonteCarloTreeSearch::builder(board)
//!     .with_random_generator(CustomNumberGenerator::default())
//!     .build();
//!
//! // Run the search for a number of iterations, then pick the best-scoring move
//! mcts.do_rollout(200);
//! let best_move = mcts.choose().unwrap();
//!
//! let (next, outcome) = board.transition(best_move).unwrap();
//! println!("{next}\n{outcome:?}");
//! ```

/// The `Board` trait that defines the interface between a game and the search.
pub mod board;
/// Pre-made implementations of the `Board` trait.
pub mod boards;
/// Cooperative cancellation for long searches.
pub mod cancellation;
/// Search configuration.
pub mod config;
/// Error types for the rules engine and the search.
pub mod error;
/// The core module of the library, containing the `MonteCarloTreeSearch` implementation.
pub mod mcts;
/// Contains the `MctsNode` struct, which represents a node in the search tree.
pub mod mcts_node;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Scoring rules used while descending the tree.
pub mod selection;

pub use board::Board;
pub use error::{BoardError, IllegalMoveReason, MctsError};

use crate::board::Board;

/// Whether a node's children have been created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionStatus {
    Unexpanded,
    Expanded,
}

/// Represents a single node in the Monte Carlo search tree.
///
/// Each node owns its own copy of the game state. Rewards are accumulated from the point of
/// view of the player who made `prev_move`, i.e. the player to move at the parent, so a parent
/// can compare its children's mean rewards directly.
#[derive(Debug, Clone)]
pub struct MctsNode<T: Board> {
    /// The depth of the node in the tree.
    pub height: u32,
    /// The game state that this node represents.
    pub board: T,
    /// The move that led to this node's state from its parent. `None` for the root node.
    pub prev_move: Option<T::Move>,
    /// The player whose turn it is in this node's game state.
    pub current_player: T::Player,
    pub is_terminal: bool,
    /// N: rollouts that went through this node.
    pub visits: u32,
    /// Q: summed rollout rewards.
    pub total_reward: f64,
    /// Rollouts won by the player to move at this node.
    pub hits: u32,
    /// Rollouts lost by the player to move at this node.
    pub misses: u32,
    pub expansion: ExpansionStatus,
}

impl<T: Board> MctsNode<T> {
    /// Creates an unexpanded node with zeroed statistics.
    pub fn new(board: T, prev_move: Option<T::Move>, height: u32) -> Self {
        MctsNode {
            height,
            current_player: board.current_player(),
            is_terminal: board.is_terminal(),
            board,
            prev_move,
            visits: 0,
            total_reward: 0.0,
            hits: 0,
            misses: 0,
            expansion: ExpansionStatus::Unexpanded,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expansion == ExpansionStatus::Expanded
    }

    /// Q / N, or `0.0` for a node that was never visited.
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }

    /// Adds one rollout's reward, given from this node's perspective.
    pub(crate) fn record(&mut self, reward: f64) {
        self.visits += 1;
        self.total_reward += reward;
        if reward > 0.0 {
            self.misses += 1;
        } else if reward < 0.0 {
            self.hits += 1;
        }
    }
}

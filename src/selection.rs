use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::mcts_node::MctsNode;

pub const DEFAULT_EXPLORATION_WEIGHT: f64 = 1.0;

/// Scoring rule used to pick a child while descending the tree.
///
/// Unvisited children always score `f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Upper Confidence bound applied to Trees:
    /// `Q/N + w * sqrt(ln(N_parent) / N)`.
    Uct { exploration_weight: f64 },
    /// `(misses - hits) / N + sqrt(2 * ln(N_parent) / N)`, where hits and misses are counted
    /// from the child's side to move.
    HitsMisses,
    /// Pure exploitation: `Q/N`. Only unvisited children get explored.
    Greedy,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::Uct {
            exploration_weight: DEFAULT_EXPLORATION_WEIGHT,
        }
    }
}

impl SelectionPolicy {
    /// UCT with the given exploration weight.
    pub fn uct(exploration_weight: f64) -> Self {
        SelectionPolicy::Uct { exploration_weight }
    }

    /// Score of `child` under a parent visited `parent_visits` times. Higher is selected first.
    pub fn score<T: Board>(&self, parent_visits: u32, child: &MctsNode<T>) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }

        let n = child.visits as f64;
        let ln_parent = (parent_visits.max(1) as f64).ln();
        match *self {
            SelectionPolicy::Uct { exploration_weight } => {
                child.mean_reward() + exploration_weight * (ln_parent / n).sqrt()
            }
            SelectionPolicy::HitsMisses => {
                (child.misses as f64 - child.hits as f64) / n + (2.0 * ln_parent / n).sqrt()
            }
            SelectionPolicy::Greedy => child.mean_reward(),
        }
    }
}

//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::selection::SelectionPolicy;

pub const DEFAULT_ROLLOUTS: u32 = 1000;
pub const DEFAULT_NODE_CAPACITY: usize = 4096;

/// Configuration for Monte Carlo Tree Search.
///
/// Every field has a default, so a driver may deserialize a partial document from any serde
/// format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Rollouts run by [`MonteCarloTreeSearch::search`] before choosing a move.
    ///
    /// [`MonteCarloTreeSearch::search`]: crate::mcts::MonteCarloTreeSearch::search
    pub rollouts: u32,

    /// Scoring rule used during tree descent.
    pub selection: SelectionPolicy,

    /// Initial arena capacity, in nodes.
    pub node_capacity: usize,

    /// Seed for [`SeededRandomGenerator`]. `None` draws one from the thread generator.
    ///
    /// [`SeededRandomGenerator`]: crate::random::SeededRandomGenerator
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            rollouts: DEFAULT_ROLLOUTS,
            selection: SelectionPolicy::default(),
            node_capacity: DEFAULT_NODE_CAPACITY,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// A small budget for tests and demos.
    pub fn for_testing() -> Self {
        Self {
            rollouts: 200,
            seed: Some(42),
            ..Self::default()
        }
    }

    /// Sets the rollouts run per search.
    pub fn with_rollouts(mut self, rollouts: u32) -> Self {
        self.rollouts = rollouts;
        self
    }

    /// Sets the scoring rule used during tree descent.
    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the initial arena capacity.
    pub fn with_node_capacity(mut self, node_capacity: usize) -> Self {
        self.node_capacity = node_capacity;
        self
    }

    /// Fixes the seed, making searches reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.rollouts, 1000);
        assert_eq!(config.selection, SelectionPolicy::uct(1.0));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_rollouts(50)
            .with_selection(SelectionPolicy::HitsMisses)
            .with_node_capacity(128)
            .with_seed(9);

        assert_eq!(config.rollouts, 50);
        assert_eq!(config.selection, SelectionPolicy::HitsMisses);
        assert_eq!(config.node_capacity, 128);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MctsConfig = serde_json::from_str(r#"{"rollouts": 64}"#).unwrap();

        assert_eq!(config.rollouts, 64);
        assert_eq!(config.node_capacity, DEFAULT_NODE_CAPACITY);
        assert_eq!(config.selection, SelectionPolicy::default());
    }
}

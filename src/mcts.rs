use crate::board::Board;
use crate::cancellation::CancellationToken;
use crate::config::{DEFAULT_NODE_CAPACITY, DEFAULT_ROLLOUTS, MctsConfig};
use crate::error::MctsError;
use crate::mcts_node::{ExpansionStatus, MctsNode};
use crate::random::{RandomGenerator, SeededRandomGenerator, StandardRandomGenerator};
use crate::selection::SelectionPolicy;
use ego_tree::{NodeId, NodeMut, NodeRef, Tree};
use tracing::{debug, trace};

/// The main struct for running the Monte Carlo Tree Search algorithm.
///
/// It owns the search tree (an arena of [`MctsNode`]s addressed by [`NodeId`]), the random
/// number generator and the search configuration. One instance searches one root position;
/// build a new one for the next move.
pub struct MonteCarloTreeSearch<T: Board, K: RandomGenerator> {
    tree: Tree<MctsNode<T>>,
    root_id: NodeId,
    root_player: T::Player,
    random: K,
    selection_policy: SelectionPolicy,
    rollouts: u32,
    cancellation: Option<CancellationToken>,
    node_count: usize,
}

impl<T: Board + Default, K: RandomGenerator> Default for MonteCarloTreeSearch<T, K> {
    fn default() -> Self {
        MonteCarloTreeSearchBuilder::new(T::default()).build()
    }
}

/// Visit statistics of one root move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveStatistics<M> {
    pub mv: M,
    pub visits: u32,
    pub mean_reward: f64,
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
///
/// This provides a convenient way to configure the MCTS search with different parameters.
pub struct MonteCarloTreeSearchBuilder<T: Board, K: RandomGenerator> {
    board: T,
    random_generator: K,
    node_capacity: usize,
    selection_policy: SelectionPolicy,
    rollouts: u32,
    cancellation: Option<CancellationToken>,
}

impl<T: Board, K: RandomGenerator> MonteCarloTreeSearchBuilder<T, K> {
    /// Creates a new builder with the given initial board state.
    pub fn new(board: T) -> Self {
        Self {
            board,
            random_generator: K::default(),
            node_capacity: DEFAULT_NODE_CAPACITY,
            selection_policy: SelectionPolicy::default(),
            rollouts: DEFAULT_ROLLOUTS,
            cancellation: None,
        }
    }

    /// Sets the random number generator for the MCTS search.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    /// Sets how many nodes the arena reserves up front.
    pub fn with_node_capacity(mut self, node_capacity: usize) -> Self {
        self.node_capacity = node_capacity;
        self
    }

    /// Sets the scoring rule used while descending the tree.
    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    /// Takes rollouts, selection policy and node capacity from `config`.
    pub fn with_config(mut self, config: &MctsConfig) -> Self {
        self.rollouts = config.rollouts;
        self.selection_policy = config.selection;
        self.node_capacity = config.node_capacity;
        self
    }

    /// Lets another owner stop [`MonteCarloTreeSearch::do_rollout`] between iterations.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Builds the `MonteCarloTreeSearch` instance with the configured parameters.
    pub fn build(self) -> MonteCarloTreeSearch<T, K> {
        let root_player = self.board.current_player();
        let tree = Tree::with_capacity(MctsNode::new(self.board, None, 0), self.node_capacity);
        let root_id = tree.root().id();

        MonteCarloTreeSearch {
            tree,
            root_id,
            root_player,
            random: self.random_generator,
            selection_policy: self.selection_policy,
            rollouts: self.rollouts,
            cancellation: self.cancellation,
            node_count: 1,
        }
    }
}

impl<T: Board, K: RandomGenerator> MonteCarloTreeSearch<T, K> {
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(board: T) -> MonteCarloTreeSearchBuilder<T, K> {
        MonteCarloTreeSearchBuilder::new(board)
    }

    /// Returns an immutable reference to the underlying search tree.
    pub fn get_tree(&self) -> &Tree<MctsNode<T>> {
        &self.tree
    }

    /// Returns a reference to the root node of the search tree.
    pub fn get_root(&self) -> NodeRef<'_, MctsNode<T>> {
        self.node(self.root_id)
    }

    /// The player to move at the root. Rollout rewards are scored for this player.
    pub fn root_player(&self) -> T::Player {
        self.root_player
    }

    /// Number of nodes in the tree, the root included.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    fn node(&self, id: NodeId) -> NodeRef<'_, MctsNode<T>> {
        self.tree.get(id).expect("node ids are only handed out by this tree")
    }

    fn node_mut(&mut self, id: NodeId) -> NodeMut<'_, MctsNode<T>> {
        self.tree.get_mut(id).expect("node ids are only handed out by this tree")
    }

    /// Runs up to `budget` iterations of select, expand, simulate and backpropagate.
    ///
    /// Returns the number of iterations completed, which is lower than `budget` only when the
    /// cancellation token fired.
    pub fn do_rollout(&mut self, budget: u32) -> u32 {
        let mut completed = 0;
        while completed < budget {
            if self.cancellation.as_ref().is_some_and(|t| t.is_cancelled()) {
                debug!(completed, budget, "rollouts cancelled");
                break;
            }
            self.do_iteration();
            completed += 1;
        }

        debug!(
            completed,
            budget,
            nodes = self.node_count,
            root_visits = self.get_root().value().visits,
            "rollouts finished"
        );
        completed
    }

    /// Performs one full iteration and returns the root-to-leaf path it updated.
    pub fn do_iteration(&mut self) -> Vec<NodeId> {
        let path = self.select();
        let leaf = path.last().copied().unwrap_or(self.root_id);
        self.expand(leaf);
        let outcome = self.simulate(leaf);
        let reward = self.reward_for_leaf(leaf, outcome);
        self.backpropagate(&path, reward);

        trace!(
            path_len = path.len(),
            depth = self.node(leaf).value().height,
            outcome,
            "iteration complete"
        );
        path
    }

    /// Descends from the root to the node the next rollout should start from.
    ///
    /// Stops at an unexpanded or terminal node, or at the first child that was never visited.
    /// Otherwise picks the child with the highest selection score.
    pub fn select(&self) -> Vec<NodeId> {
        let mut path = vec![self.root_id];
        let mut current = self.node(self.root_id);

        loop {
            let data = current.value();
            if data.is_terminal || !data.is_expanded() {
                return path;
            }

            if let Some(unvisited) = current.children().find(|c| c.value().visits == 0) {
                path.push(unvisited.id());
                return path;
            }

            let parent_visits = data.visits;
            let best = current.children().max_by(|a, b| {
                let score_a = self.selection_policy.score(parent_visits, a.value());
                let score_b = self.selection_policy.score(parent_visits, b.value());
                score_a.total_cmp(&score_b)
            });
            match best {
                Some(child) => {
                    path.push(child.id());
                    current = child;
                }
                None => return path,
            }
        }
    }

    /// Creates one unvisited child per legal move. Does nothing for expanded or terminal nodes.
    ///
    /// Moves the board refuses to perform get no child.
    pub fn expand(&mut self, node_id: NodeId) {
        let data = self.node(node_id).value();
        if data.is_expanded() || data.is_terminal {
            return;
        }

        let height = data.height + 1;
        let children: Vec<MctsNode<T>> = data
            .board
            .available_moves()
            .into_iter()
            .filter_map(|mv| match data.board.perform_move(&mv) {
                Ok(next) => Some(MctsNode::new(next, Some(mv), height)),
                Err(err) => {
                    debug!(mv = ?mv, %err, "skipping move refused by the board");
                    None
                }
            })
            .collect();

        self.node_count += children.len();
        let mut node = self.node_mut(node_id);
        for child in children {
            node.append(child);
        }
        node.value().expansion = ExpansionStatus::Expanded;
    }

    /// Plays uniformly random moves on a copy of the node's board until the game ends.
    ///
    /// Returns `1.0` if the root player wins, `-1.0` if they lose and `0.0` for a draw. A
    /// playout that hits a refused move stops there and scores the position it reached.
    pub fn simulate(&mut self, node_id: NodeId) -> f64 {
        let mut board = self.node(node_id).value().board.clone();
        while !board.is_terminal() {
            let moves = board.available_moves();
            let Some(random_move) = self.random.choose(&moves) else {
                break;
            };
            board = match board.perform_move(random_move) {
                Ok(next) => next,
                Err(err) => {
                    debug!(mv = ?random_move, %err, "playout stopped on a refused move");
                    break;
                }
            };
        }
        board.reward(self.root_player)
    }

    /// Re-expresses a root-player reward from the view of whoever moved into `leaf`.
    fn reward_for_leaf(&self, leaf: NodeId, reward: f64) -> f64 {
        let moved_by_root_player = self
            .node(leaf)
            .parent()
            .is_some_and(|parent| parent.value().current_player == self.root_player);
        if moved_by_root_player { reward } else { -reward }
    }

    /// Adds `reward` to the leaf (last element of `path`) and alternates its sign on every step
    /// towards the root.
    pub fn backpropagate(&mut self, path: &[NodeId], reward: f64) {
        let mut reward = reward;
        for &node_id in path.iter().rev() {
            self.node_mut(node_id).value().record(reward);
            reward = -reward;
        }
    }

    /// Picks the move to play from the root.
    ///
    /// The root child with the best mean reward wins, and equal means go to the child with more
    /// visits. Children that were never visited are ignored. Without any visited child a
    /// uniformly random legal move is returned.
    pub fn choose(&mut self) -> Result<T::Move, MctsError> {
        let root = self.get_root();
        if root.value().is_terminal {
            return Err(MctsError::NoMoveOnTerminal);
        }

        let best = root
            .children()
            .filter(|c| c.value().visits > 0)
            .max_by(|a, b| {
                let (a, b) = (a.value(), b.value());
                a.mean_reward()
                    .total_cmp(&b.mean_reward())
                    .then(a.visits.cmp(&b.visits))
            });
        if let Some(best) = best {
            let data = best.value();
            if let Some(mv) = data.prev_move.clone() {
                debug!(mv = ?mv, visits = data.visits, mean = data.mean_reward(), "chose move");
                return Ok(mv);
            }
        }

        debug!("no visited root child, choosing a random legal move");
        let moves = root.value().board.available_moves();
        self.random
            .choose(&moves)
            .cloned()
            .ok_or(MctsError::NoMoveOnTerminal)
    }

    /// Runs the configured number of rollouts, then [`MonteCarloTreeSearch::choose`]s.
    pub fn search(&mut self) -> Result<T::Move, MctsError> {
        if self.get_root().value().is_terminal {
            return Err(MctsError::NoMoveOnTerminal);
        }
        self.do_rollout(self.rollouts);
        self.choose()
    }

    /// Statistics of every root child, in move order.
    pub fn move_statistics(&self) -> Vec<MoveStatistics<T::Move>> {
        self.get_root()
            .children()
            .filter_map(|child| {
                let data = child.value();
                Some(MoveStatistics {
                    mv: data.prev_move.clone()?,
                    visits: data.visits,
                    mean_reward: data.mean_reward(),
                })
            })
            .collect()
    }
}

impl<T: Board> MonteCarloTreeSearch<T, StandardRandomGenerator> {
    /// Default settings and thread-local randomness.
    pub fn from_board(board: T) -> Self {
        MonteCarloTreeSearchBuilder::new(board).build()
    }
}

impl<T: Board> MonteCarloTreeSearch<T, SeededRandomGenerator> {
    /// Builds a search seeded from `config.seed`, or from fresh entropy when it is unset.
    pub fn from_config(board: T, config: &MctsConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        MonteCarloTreeSearchBuilder::new(board)
            .with_random_generator(SeededRandomGenerator::new(seed))
            .with_config(config)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::grid::Player;
    use crate::boards::tic_tac_toe::TicTacToeBoard;
    use crate::boards::ultimate_tic_tac_toe::fixtures::{ONE_WINNING_MOVE, board_from_layout};
    use crate::boards::ultimate_tic_tac_toe::{Move, Outcome, UltimateBoard};
    use crate::error::IllegalMoveReason;
    use crate::random::CustomNumberGenerator;

    type Search = MonteCarloTreeSearch<UltimateBoard, CustomNumberGenerator>;

    fn search(board: UltimateBoard, seed: i64) -> Search {
        MonteCarloTreeSearch::builder(board)
            .with_random_generator(CustomNumberGenerator::new(seed))
            .build()
    }

    #[test]
    fn every_rollout_visits_the_root() {
        let mut mcts = search(UltimateBoard::new(), 1);

        let completed = mcts.do_rollout(150);

        assert_eq!(completed, 150);
        assert_eq!(mcts.get_root().value().visits, 150);
        assert_eq!(mcts.node_count(), mcts.get_tree().nodes().count());
    }

    #[test]
    fn expand_is_idempotent() {
        let mut mcts = search(UltimateBoard::new(), 1);
        let root = mcts.get_root().id();

        mcts.expand(root);
        mcts.expand(root);

        assert_eq!(mcts.get_root().children().count(), 81);
        assert!(mcts.get_root().children().all(|c| {
            let data = c.value();
            data.visits == 0 && !data.is_expanded() && data.total_reward == 0.0 && data.height == 1
        }));
    }

    /// A pile of stones; each turn removes one or two, whoever takes the last stone wins.
    /// `available_moves` also offers taking three, which `perform_move` refuses.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Pile {
        stones: u8,
        to_move: Player,
    }

    impl Board for Pile {
        type Move = u8;
        type Player = Player;
        type Error = IllegalMoveReason;

        fn current_player(&self) -> Player {
            self.to_move
        }

        fn is_terminal(&self) -> bool {
            self.stones == 0
        }

        fn available_moves(&self) -> Vec<u8> {
            if self.stones == 0 { Vec::new() } else { vec![1, 2, 3] }
        }

        fn perform_move(&self, take: &u8) -> Result<Self, IllegalMoveReason> {
            if *take > 2 || *take > self.stones {
                return Err(IllegalMoveReason::OutOfRange);
            }
            Ok(Pile {
                stones: self.stones - take,
                to_move: self.to_move.opponent(),
            })
        }

        fn reward(&self, player: Player) -> f64 {
            match self.stones {
                0 if player == self.to_move => -1.0,
                0 => 1.0,
                _ => 0.0,
            }
        }
    }

    #[test]
    fn refused_moves_are_skipped() {
        // arrange
        let pile = Pile { stones: 7, to_move: Player::X };
        let mut mcts = MonteCarloTreeSearch::builder(pile)
            .with_random_generator(CustomNumberGenerator::new(4))
            .build();

        // act
        let completed = mcts.do_rollout(100);

        // assert
        assert_eq!(completed, 100);
        let moves: Vec<u8> = mcts.move_statistics().iter().map(|s| s.mv).collect();
        assert_eq!(moves, vec![1, 2]);
        assert!(mcts.get_tree().nodes().all(|n| n.value().prev_move != Some(3)));
        assert_eq!(mcts.node_count(), mcts.get_tree().nodes().count());
    }

    #[test]
    fn equal_means_go_to_the_more_visited_child() {
        // arrange: the first child reaches mean 1.0 over three visits, the last over one
        let mut mcts = MonteCarloTreeSearch::builder(TicTacToeBoard::default())
            .with_random_generator(CustomNumberGenerator::default())
            .build();
        let root = mcts.get_root().id();
        mcts.expand(root);
        let children: Vec<NodeId> = mcts.get_root().children().map(|c| c.id()).collect();
        let (first, last) = (children[0], children[children.len() - 1]);
        for _ in 0..3 {
            mcts.backpropagate(&[root, first], 1.0);
        }
        mcts.backpropagate(&[root, last], 1.0);

        // act
        let chosen = mcts.choose().unwrap();

        // assert
        assert_eq!(chosen, 0);
        let stats = mcts.move_statistics();
        assert_eq!(stats[0].mean_reward, stats[stats.len() - 1].mean_reward);
        assert_eq!((stats[0].visits, stats[stats.len() - 1].visits), (3, 1));
    }

    #[test]
    fn select_stops_at_first_unvisited_child() {
        // arrange
        let mut mcts = search(UltimateBoard::new(), 1);
        mcts.do_rollout(1);

        // act
        let path = mcts.select();

        // assert
        assert_eq!(path.len(), 2);
        let leaf = mcts.get_tree().get(path[1]).unwrap();
        assert_eq!(leaf.value().prev_move, Some(Move::new(0, 0)));
        assert_eq!(leaf.value().visits, 0);
    }

    #[test]
    fn backpropagation_alternates_sign() {
        // arrange: enough rollouts for selection to reach below the root's children
        let mut mcts = search(UltimateBoard::new(), 3);
        mcts.do_rollout(300);
        let path = mcts.select();
        assert!(path.len() >= 3);
        let before: Vec<(u32, f64)> = path
            .iter()
            .map(|&id| {
                let data = mcts.get_tree().get(id).unwrap().value();
                (data.visits, data.total_reward)
            })
            .collect();

        // act
        mcts.backpropagate(&path, 1.0);

        // assert
        for (i, (&id, (visits, total))) in path.iter().rev().zip(before.iter().rev()).enumerate() {
            let data = mcts.get_tree().get(id).unwrap().value();
            let expected = if i % 2 == 0 { 1.0 } else { -1.0 };
            assert_eq!(data.visits, visits + 1);
            assert!((data.total_reward - total - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn finds_the_only_winning_move() {
        let board = board_from_layout(ONE_WINNING_MOVE, Player::X, None);
        let winning_move = Move::from_coords(2, 2, 0, 2);

        for seed in 0..10 {
            let mut mcts = search(board, seed);
            mcts.do_rollout(200);
            assert_eq!(mcts.choose().unwrap(), winning_move, "seed {seed}");
        }

        let mut mcts = MonteCarloTreeSearch::from_board(board);
        mcts.do_rollout(200);
        assert_eq!(mcts.choose().unwrap(), winning_move);
    }

    #[test]
    fn hits_misses_policy_finds_the_only_winning_move() {
        let board = board_from_layout(ONE_WINNING_MOVE, Player::X, None);

        for seed in 0..5 {
            let mut mcts: Search = MonteCarloTreeSearch::builder(board)
                .with_random_generator(CustomNumberGenerator::new(seed))
                .with_selection_policy(SelectionPolicy::HitsMisses)
                .build();
            mcts.do_rollout(200);
            assert_eq!(mcts.choose().unwrap(), Move::new(8, 2), "seed {seed}");
        }
    }

    #[test]
    fn greedy_policy_finds_the_only_winning_move() {
        let board = board_from_layout(ONE_WINNING_MOVE, Player::X, None);

        for seed in 0..10 {
            let mut mcts: Search = MonteCarloTreeSearch::builder(board)
                .with_random_generator(CustomNumberGenerator::new(seed))
                .with_selection_policy(SelectionPolicy::Greedy)
                .build();
            mcts.do_rollout(200);

            assert_eq!(mcts.choose().unwrap(), Move::new(8, 2), "seed {seed}");
            let winner = mcts.move_statistics().into_iter().max_by_key(|s| s.visits).unwrap();
            assert_eq!(winner.mv, Move::new(8, 2));
        }
    }

    #[test]
    fn greedy_policy_from_config() {
        let config: MctsConfig =
            serde_json::from_str(r#"{"rollouts": 150, "seed": 3, "selection": {"kind": "greedy"}}"#)
                .unwrap();
        let board = board_from_layout(ONE_WINNING_MOVE, Player::X, None);

        let mut mcts = MonteCarloTreeSearch::from_config(board, &config);

        assert_eq!(config.selection, SelectionPolicy::Greedy);
        assert_eq!(mcts.search(), Ok(Move::new(8, 2)));
        assert_eq!(mcts.get_root().value().visits, 150);
    }

    #[test]
    fn winning_child_is_scored_for_the_player_who_moved() {
        let board = board_from_layout(ONE_WINNING_MOVE, Player::X, None);
        let mut mcts = search(board, 5);

        mcts.do_rollout(200);

        let stats = mcts.move_statistics();
        assert_eq!(stats.len(), 3);
        let winner = stats.iter().find(|s| s.mv == Move::new(8, 2)).unwrap();
        assert_eq!(winner.mean_reward, 1.0);
        assert!(stats.iter().all(|s| s.visits > 0));
        assert!(stats.iter().filter(|s| s.mv != winner.mv).all(|s| s.mean_reward < 1.0));
    }

    #[test]
    fn choose_on_terminal_position_fails() {
        let board = board_from_layout(ONE_WINNING_MOVE, Player::X, None);
        let (finished, outcome) = board.transition(Move::new(8, 2)).unwrap();
        assert_eq!(outcome, Outcome::Win(Player::X));
        let mut mcts = search(finished, 1);

        mcts.do_rollout(10);

        assert_eq!(mcts.choose(), Err(MctsError::NoMoveOnTerminal));
        assert_eq!(mcts.search(), Err(MctsError::NoMoveOnTerminal));
        assert_eq!(mcts.node_count(), 1);
    }

    #[test]
    fn choose_without_search_returns_a_legal_move() {
        let board = UltimateBoard::new();
        let mut mcts = search(board, 1);

        let mv = mcts.choose().unwrap();

        assert!(board.is_legal(mv));
        assert_eq!(mcts.get_root().value().visits, 0);
    }

    #[test]
    fn cancelled_token_stops_rollouts() {
        let token = CancellationToken::new();
        token.cancel();
        let mut mcts: Search = MonteCarloTreeSearch::builder(UltimateBoard::new())
            .with_cancellation_token(token)
            .build();

        assert_eq!(mcts.do_rollout(100), 0);
        assert_eq!(mcts.get_root().value().visits, 0);
    }

    #[test]
    fn unset_token_does_not_change_results() {
        let mut plain = search(UltimateBoard::new(), 9);
        let mut with_token: Search = MonteCarloTreeSearch::builder(UltimateBoard::new())
            .with_random_generator(CustomNumberGenerator::new(9))
            .with_cancellation_token(CancellationToken::new())
            .build();

        plain.do_rollout(250);
        with_token.do_rollout(250);

        assert_eq!(plain.move_statistics(), with_token.move_statistics());
        assert_eq!(plain.choose(), with_token.choose());
    }

    #[test]
    fn seeded_config_is_reproducible() {
        let config = MctsConfig::for_testing().with_rollouts(120);

        let mut first = MonteCarloTreeSearch::from_config(UltimateBoard::new(), &config);
        let mut second = MonteCarloTreeSearch::from_config(UltimateBoard::new(), &config);

        assert_eq!(first.search(), second.search());
        assert_eq!(first.get_root().value().visits, 120);
        assert_eq!(first.move_statistics(), second.move_statistics());
    }

    #[test]
    fn self_play_reaches_a_result() {
        let mut board = UltimateBoard::new();
        let mut plies = 0;

        while !board.is_terminal() {
            let mut mcts = search(board, plies);
            mcts.do_rollout(20);
            let mv = mcts.choose().unwrap();
            board = board.transition(mv).unwrap().0;
            plies += 1;
        }

        assert_ne!(board.outcome(), Outcome::Ongoing);
        assert!(plies <= 81);
    }
}

extern crate ultimate_mcts;

use tracing::info;
use tracing_subscriber::EnvFilter;
use ultimate_mcts::boards::ultimate_tic_tac_toe::{Outcome, UltimateBoard};
use ultimate_mcts::config::MctsConfig;
use ultimate_mcts::mcts::MonteCarloTreeSearch;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = MctsConfig::default().with_rollouts(300).with_seed(2024);
    let mut board = UltimateBoard::new();
    let mut ply = 0u64;

    // Self-play: search, choose, apply, until the game is decided.
    while board.outcome() == Outcome::Ongoing {
        let config = config.clone().with_seed(config.seed.unwrap_or_default() + ply);
        let mut mcts = MonteCarloTreeSearch::from_config(board, &config);
        let best_move = match mcts.search() {
            Ok(mv) => mv,
            Err(err) => {
                eprintln!("search failed: {err}");
                return;
            }
        };

        let visits = mcts
            .move_statistics()
            .iter()
            .find(|s| s.mv == best_move)
            .map(|s| (s.visits, s.mean_reward));
        info!(ply, player = %board.current_player(), mv = %best_move, ?visits, "move");

        board = match board.transition(best_move) {
            Ok((next, _)) => next,
            Err(err) => {
                eprintln!("engine chose an illegal move: {err}");
                return;
            }
        };
        ply += 1;
    }

    println!("{board}");
    println!("Result after {ply} moves: {:?}", board.outcome());
}

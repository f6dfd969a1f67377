use freecell_solver::game::{Board, Move};
use freecell_solver::search::{
    ParallelConfig, SearchConfig, SearchMode, SearchResult, Termination, run, solve,
};
use std::sync::Arc;

fn one_move_board() -> Board {
    Board::from_layout("", [13, 13, 13, 12], &["KS"]).unwrap()
}

/// Full reserve, every column topped by two red cards, no Ace reachable:
/// no legal move exists.
fn blocked_board() -> Board {
    Board::from_layout(
        "2D 3D 4D 5D",
        [0; 4],
        &[
            "AC 2C 3C 4C AD 6D",
            "5C 6C 7C 8C AH 7D",
            "9C TC JC QC 2H 8D",
            "KC AS 2S 3S 3H 9D",
            "4S 5S 6S 7S 4H TD",
            "8S 9S TS JS 5H JD",
            "QS KS 8H 9H 6H QD",
            "TH JH QH KH 7H KD",
        ],
    )
    .unwrap()
}

/// Tens to Kings left, Tens buried at the bottom of their columns.
fn endgame_board() -> Board {
    Board::from_layout(
        "",
        [9; 4],
        &["TC KH QS JH", "TD KS JC", "TH QC KD", "TS JD QH", "KC JS QD"],
    )
    .unwrap()
}

/// Jacks home, each column a King under its Queen.
fn royal_board() -> Board {
    Board::from_layout("", [11; 4], &["KC QC", "KD QD", "KH QH", "KS QS"]).unwrap()
}

/// Replay the goal's path from the original root and check every step.
fn assert_valid_solution(root: &Board, result: &SearchResult) {
    let path = result.path().expect("no goal published");
    assert_eq!(**path.root(), *root);

    let mut board = Arc::new(root.clone());
    for step in path.steps() {
        assert!(board.is_legal(step.mv), "illegal move {}", step.mv);
        board = Arc::new(board.execute_move(step.mv));
        assert!(board.is_valid());
    }
    assert!(board.is_solved());
    assert_eq!(path.len() as u32, result.move_count().unwrap());
}

#[test]
fn test_one_move_board_at_every_parallelism() {
    let root = one_move_board();
    for workers in [1, 2, 8] {
        for auto_play in [false, true] {
            let config = SearchConfig::default().with_auto_play(auto_play);
            let result = solve(&root, &config, &ParallelConfig::default().with_workers(workers));

            assert_eq!(result.termination, Termination::Solved);
            assert!(result.goal.as_ref().unwrap().is_solved());
            let path = result.path().unwrap();
            assert_eq!(path.len(), 1);
            assert_eq!(path.moves(), vec![Move::TableauToFoundation { from: 0, to: 3 }]);
            assert_valid_solution(&root, &result);
        }
    }
}

#[test]
fn test_blocked_board_terminates_without_goal() {
    let root = blocked_board();
    assert!(root.is_valid());
    assert!(root.valid_moves().is_empty());

    for workers in [1, 2, 8] {
        let result = run(&root, workers);

        assert!(result.goal.is_none());
        assert_eq!(result.termination, Termination::Exhausted);
        assert_eq!(result.visited_nodes, 1);
        assert_eq!(result.threads_used, 1);
    }
}

#[test]
fn test_endgame_solved() {
    let root = endgame_board();
    assert!(root.is_valid());

    let result = run(&root, 4);
    assert_eq!(result.termination, Termination::Solved);
    assert_valid_solution(&root, &result);
}

#[test]
fn test_single_worker_is_reproducible() {
    let root = endgame_board();
    let config = SearchConfig::default();
    let parallel = ParallelConfig::default().with_workers(1);

    let first = solve(&root, &config, &parallel);
    let second = solve(&root, &config, &parallel);

    assert_eq!(first.visited_nodes, second.visited_nodes);
    assert_eq!(first.threads_used, 1);
    assert_eq!(second.threads_used, 1);
    assert_eq!(first.goal, second.goal);
    assert_eq!(
        first.path().unwrap().moves(),
        second.path().unwrap().moves()
    );
}

#[test]
fn test_expansions_match_visited_nodes() {
    let root = Board::from_deal_number(1);
    for workers in [1, 4] {
        let result = run(&root, workers);
        assert_valid_solution(&root, &result);

        let expanded: u64 = result
            .worker_statistics
            .iter()
            .map(|(_, s)| s.nodes_expanded)
            .sum();
        assert_eq!(expanded, result.visited_nodes as u64);
        assert!(result.threads_used <= result.worker_statistics.len());
    }
}

#[test]
fn test_parallel_runs_always_replay() {
    // Move counts may differ between runs at parallelism > 1; validity may not.
    for deal in 1..=3 {
        let root = Board::from_deal_number(deal);
        for _ in 0..3 {
            let result = run(&root, 4);
            assert_eq!(result.termination, Termination::Solved, "deal {}", deal);
            assert!(result.goal.as_ref().unwrap().is_solved());
            assert_valid_solution(&root, &result);
            assert!(result.move_count().unwrap() >= root.min_solution_length());
        }
    }
}

#[test]
fn test_best_goal_never_longer_than_first() {
    let root = endgame_board();
    let parallel = ParallelConfig::default().with_workers(1).with_max_nodes(20_000);

    let first = solve(&root, &SearchConfig::default(), &parallel);
    let best = solve(
        &root,
        &SearchConfig::default().with_mode(SearchMode::BestGoal),
        &parallel,
    );

    assert_valid_solution(&root, &best);
    assert!(best.move_count().unwrap() <= first.move_count().unwrap());
    assert!(best.visited_nodes >= first.visited_nodes);
    assert!(best.move_count().unwrap() >= root.min_solution_length());
}

#[test]
fn test_best_goal_drains_small_board() {
    let root = royal_board();
    assert!(root.is_valid());

    for workers in [1, 4] {
        let result = solve(
            &root,
            &SearchConfig::default().with_mode(SearchMode::BestGoal),
            &ParallelConfig::default().with_workers(workers),
        );

        assert_eq!(result.termination, Termination::Solved);
        assert_valid_solution(&root, &result);
        assert!(result.move_count().unwrap() >= 8);
    }
}

#[test]
fn test_node_limit_reported() {
    let root = Board::from_deal_number(1);
    let result = solve(
        &root,
        &SearchConfig::default(),
        &ParallelConfig::default().with_workers(2).with_max_nodes(5),
    );

    assert_eq!(result.termination, Termination::LimitReached);
    assert!(result.goal.is_none());
}

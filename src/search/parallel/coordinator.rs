//! Parallel A* coordinator and its worker threads.
//!
//! Each worker owns a private open set and shares the closed set with every
//! other worker. A worker whose open set holds more than one board donates
//! the board it just dequeued to a freshly spawned worker while the running
//! count is below the limit, so the pool grows on demand instead of being
//! started up front. The coordinator only collects messages and waits until
//! every worker sender has been dropped.

use crate::game::Board;
use crate::search::config::{SearchConfig, SearchMode};
use crate::search::parallel::channel::{SharedSearch, WorkerMessage, create_channel};
use crate::search::parallel::config::ParallelConfig;
use crate::search::queue::PriorityQueue;
use crate::search::result::{SearchResult, SearchStatistics, Termination};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, info, trace, warn};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Run a parallel A* search from `root`.
pub fn run_parallel_search(
    root: &Board,
    search_config: &SearchConfig,
    parallel_config: &ParallelConfig,
) -> SearchResult {
    let start_time = Instant::now();
    let shared = Arc::new(SharedSearch::new(
        search_config.clone(),
        parallel_config.num_workers,
        parallel_config.max_nodes,
    ));

    let mut root = root.clone();
    root.compute_cost();
    let mut root = Arc::new(root);
    if search_config.auto_play {
        root = root.auto_play();
        debug!("Auto-play advanced the root by {} moves", root.move_count());
    }

    info!(
        "Starting search: up to {} workers, mode {}",
        parallel_config.num_workers.max(1),
        search_config.mode
    );

    let (tx, rx) = create_channel();
    let reserved = shared.try_reserve_worker();
    debug_assert!(reserved, "no worker slot for the root");
    if let Err(e) = spawn_worker(&shared, &tx, root.clone(), None) {
        warn!("Could not start a worker thread ({}); searching inline", e);
        let id = shared.next_worker_id();
        shared.record_spawn();
        Worker::new(id, Arc::clone(&shared), tx.clone(), root).run();
    }
    // Only workers hold senders now; the channel disconnects when the last
    // one exits.
    drop(tx);

    let result = run_coordinator(&shared, rx, parallel_config, start_time);
    info!(
        "Search finished: {} after {} nodes on {} threads in {:.2?}",
        result.termination,
        result.visited_nodes,
        result.threads_used,
        result.statistics.elapsed_time
    );
    result
}

/// Coordinator loop that receives messages from workers and aggregates results.
fn run_coordinator(
    shared: &SharedSearch,
    rx: Receiver<WorkerMessage>,
    config: &ParallelConfig,
    start_time: Instant,
) -> SearchResult {
    let mut worker_stats: Vec<(usize, SearchStatistics)> = Vec::new();
    let deadline = config.timeout.map(|t| start_time + t);

    loop {
        let received = match deadline {
            Some(d) if !shared.should_stop() => {
                rx.recv_timeout(d.saturating_duration_since(Instant::now()))
            }
            _ => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(WorkerMessage::Spawned { worker_id, donor }) => match donor {
                Some(donor) => debug!("Worker {} spawned by worker {}", worker_id, donor),
                None => debug!("Worker {} started on the root", worker_id),
            },
            Ok(WorkerMessage::GoalPublished {
                worker_id,
                move_count,
            }) => {
                debug!("Worker {} published a {}-move goal", worker_id, move_count);
            }
            Ok(WorkerMessage::Finished {
                worker_id,
                statistics,
            }) => {
                debug!(
                    "Worker {} finished after expanding {} nodes",
                    worker_id, statistics.nodes_expanded
                );
                worker_stats.push((worker_id, statistics));
            }
            Err(RecvTimeoutError::Timeout) => {
                info!("Timeout reached, stopping workers");
                shared.signal_limit();
            }
            Err(RecvTimeoutError::Disconnected) => {
                // All senders dropped, we're done
                break;
            }
        }
    }

    worker_stats.sort_by_key(|(id, _)| *id);
    let mut total_stats = SearchStatistics::new();
    for (_, stats) in &worker_stats {
        total_stats.merge(stats);
    }
    total_stats.elapsed_time = start_time.elapsed();

    let goal = shared.goal();
    let termination = if goal.is_some() {
        Termination::Solved
    } else if shared.limit_reached() {
        Termination::LimitReached
    } else {
        Termination::Exhausted
    };

    SearchResult {
        goal,
        visited_nodes: shared.visited(),
        threads_used: shared.threads_used(),
        termination,
        statistics: total_stats,
        worker_statistics: worker_stats,
    }
}

/// Start a worker thread seeded with `seed`. The caller must already hold a
/// worker slot; it stays claimed by the new thread.
fn spawn_worker(
    shared: &Arc<SharedSearch>,
    tx: &Sender<WorkerMessage>,
    seed: Arc<Board>,
    donor: Option<usize>,
) -> std::io::Result<usize> {
    let worker_id = shared.next_worker_id();
    let worker = Worker::new(worker_id, Arc::clone(shared), tx.clone(), seed);

    thread::Builder::new()
        .name(format!("astar-worker-{}", worker_id))
        .spawn(move || worker.run())?;

    shared.record_spawn();
    let _ = tx.send(WorkerMessage::Spawned { worker_id, donor });
    Ok(worker_id)
}

struct Worker {
    id: usize,
    shared: Arc<SharedSearch>,
    tx: Sender<WorkerMessage>,
    open: PriorityQueue<Arc<Board>>,
    stats: SearchStatistics,
}

impl Worker {
    fn new(id: usize, shared: Arc<SharedSearch>, tx: Sender<WorkerMessage>, seed: Arc<Board>) -> Self {
        let mut open = PriorityQueue::with_capacity(1024);
        open.enqueue(seed);
        Self {
            id,
            shared,
            tx,
            open,
            stats: SearchStatistics::new(),
        }
    }

    fn run(mut self) {
        let start_time = Instant::now();
        self.search();
        self.stats.elapsed_time = start_time.elapsed();

        self.shared.release_worker();
        let _ = self.tx.send(WorkerMessage::Finished {
            worker_id: self.id,
            statistics: self.stats,
        });
    }

    fn search(&mut self) {
        let mode = self.shared.config().mode;

        while let Some(board) = self.open.dequeue() {
            if self.shared.should_stop() {
                break;
            }

            if board.is_solved() {
                self.stats.goals_found += 1;
                if self.shared.try_publish(&board) {
                    let _ = self.tx.send(WorkerMessage::GoalPublished {
                        worker_id: self.id,
                        move_count: board.move_count(),
                    });
                }
                match mode {
                    SearchMode::FirstGoal => break,
                    SearchMode::BestGoal => continue,
                }
            }

            match mode {
                SearchMode::FirstGoal if self.shared.has_goal() => break,
                SearchMode::BestGoal if self.cannot_improve(&board) => {
                    self.stats.pruned += 1;
                    continue;
                }
                _ => {}
            }

            if !self.open.is_empty() && self.shared.try_reserve_worker() {
                match spawn_worker(&self.shared, &self.tx, Arc::clone(&board), Some(self.id)) {
                    Ok(_) => {
                        self.stats.donations += 1;
                        continue;
                    }
                    Err(e) => {
                        self.shared.release_worker();
                        warn!("Worker {} could not spawn a thread: {}", self.id, e);
                    }
                }
            }

            if !self.shared.close(&board) {
                self.stats.closed_hits += 1;
                continue;
            }
            self.expand(&board);
        }
    }

    /// Whether every solution through `board` is at least as long as the
    /// published goal.
    fn cannot_improve(&self, board: &Board) -> bool {
        self.shared
            .goal_moves()
            .is_some_and(|best| board.min_solution_length() >= best)
    }

    fn expand(&mut self, board: &Arc<Board>) {
        self.stats.nodes_expanded += 1;
        trace!(
            "Worker {} expanding cost {} at depth {}",
            self.id,
            board.cost(),
            board.move_count()
        );

        for mv in board.valid_moves() {
            let mut next = board.execute_move(mv);
            self.stats.nodes_generated += 1;
            if self.shared.is_closed(&next) {
                self.stats.closed_hits += 1;
                continue;
            }
            if self.shared.config().mode == SearchMode::BestGoal && self.cannot_improve(&next) {
                self.stats.pruned += 1;
                continue;
            }
            next.compute_cost();
            let next = Arc::new(next);

            match self.open.get(&next).map(|existing| existing.move_count()) {
                Some(moves) if next.move_count() < moves => {
                    let key = Arc::clone(&next);
                    self.open.replace(&key, next);
                    self.stats.replacements += 1;
                }
                Some(_) => {}
                None => self.open.enqueue(next),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Move;
    use std::time::Duration;

    fn one_move_board() -> Board {
        Board::from_layout("", [13, 13, 13, 12], &["KS"]).unwrap()
    }

    #[test]
    fn test_parallel_search_single_worker() {
        let search_config = SearchConfig::default().with_auto_play(false);
        let parallel_config = ParallelConfig::default().with_workers(1);

        let result = run_parallel_search(&one_move_board(), &search_config, &parallel_config);

        assert_eq!(result.termination, Termination::Solved);
        assert_eq!(result.threads_used, 1);
        assert_eq!(result.visited_nodes, 1);
        let path = result.path().unwrap();
        assert_eq!(path.moves(), vec![Move::TableauToFoundation { from: 0, to: 3 }]);
        assert_eq!(result.worker_statistics.len(), 1);
    }

    #[test]
    fn test_root_auto_play_solves() {
        let search_config = SearchConfig::default();
        let parallel_config = ParallelConfig::default().with_workers(4);

        let result = run_parallel_search(&one_move_board(), &search_config, &parallel_config);

        assert!(result.is_solved());
        assert_eq!(result.move_count(), Some(1));
        assert_eq!(result.visited_nodes, 0);
    }

    #[test]
    fn test_node_limit_stops() {
        let search_config = SearchConfig::default();
        let parallel_config = ParallelConfig::default()
            .with_workers(2)
            .with_max_nodes(1);

        let result = run_parallel_search(&Board::from_deal_number(1), &search_config, &parallel_config);

        assert_eq!(result.termination, Termination::LimitReached);
        assert!(result.goal.is_none());
        assert!(result.visited_nodes >= 1);
    }

    #[test]
    fn test_timeout_stops() {
        // 1 ms leaves no time to solve a full deal.
        let search_config = SearchConfig::default();
        let parallel_config = ParallelConfig::default()
            .with_workers(2)
            .with_timeout(Duration::from_millis(1))
            .with_max_nodes(200_000);

        let result = run_parallel_search(&Board::from_deal_number(11982), &search_config, &parallel_config);

        assert_ne!(result.termination, Termination::Exhausted);
    }

    #[test]
    fn test_best_goal_drains_and_prunes() {
        // Jacks home, each column a King under its Queen: eight moves minimum.
        let root = Board::from_layout("", [11; 4], &["KC QC", "KD QD", "KH QH", "KS QS"]).unwrap();
        let search_config = SearchConfig::default()
            .with_mode(SearchMode::BestGoal)
            .with_auto_play(false);
        let parallel_config = ParallelConfig::default().with_workers(1);

        let result = run_parallel_search(&root, &search_config, &parallel_config);

        assert_eq!(result.termination, Termination::Solved);
        assert_eq!(result.move_count(), Some(8));
        assert!(result.statistics.pruned > 0);
        assert!(!result.statistics.format_summary().is_empty());
    }

    #[test]
    fn test_first_goal_does_not_prune() {
        let root = Board::from_layout("", [11; 4], &["KC QC", "KD QD", "KH QH", "KS QS"]).unwrap();
        let search_config = SearchConfig::default().with_auto_play(false);
        let parallel_config = ParallelConfig::default().with_workers(1);

        let result = run_parallel_search(&root, &search_config, &parallel_config);

        assert!(result.is_solved());
        assert_eq!(result.statistics.pruned, 0);
    }

    #[test]
    fn test_statistics_account_for_every_visit() {
        let search_config = SearchConfig::default().with_auto_play(false);
        let parallel_config = ParallelConfig::default().with_workers(4);

        let result = run_parallel_search(&Board::from_deal_number(1), &search_config, &parallel_config);

        assert!(result.is_solved());
        let expanded: u64 = result
            .worker_statistics
            .iter()
            .map(|(_, s)| s.nodes_expanded)
            .sum();
        assert_eq!(expanded, result.visited_nodes as u64);
        assert_eq!(result.statistics.nodes_expanded, expanded);
        assert_eq!(result.worker_statistics.len(), result.threads_used);
    }
}

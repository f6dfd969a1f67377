//! State shared by A* workers and the messages they send the coordinator.

use crate::game::Board;
use crate::search::config::SearchConfig;
use crate::search::result::SearchStatistics;
use crossbeam_channel::{Receiver, Sender, unbounded};
use dashmap::DashSet;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Message sent from workers to the coordinator.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// A worker was started, seeded by `donor` (none for the root worker).
    Spawned {
        worker_id: usize,
        donor: Option<usize>,
    },
    /// A worker published a new best goal.
    GoalPublished { worker_id: usize, move_count: u32 },
    /// A worker has left its search loop.
    Finished {
        worker_id: usize,
        statistics: SearchStatistics,
    },
}

/// Search state visible to every worker of one run.
///
/// The closed set, worker counters and stop flags are lock-free; only goal
/// publication takes a lock.
pub struct SharedSearch {
    config: SearchConfig,
    max_nodes: Option<usize>,
    /// Boards already expanded.
    closed: DashSet<Arc<Board>, FxBuildHasher>,
    visited: AtomicUsize,
    /// Workers currently running, bounded by `max_workers`.
    active: AtomicUsize,
    max_workers: usize,
    next_id: AtomicUsize,
    spawned: AtomicUsize,
    goal: Mutex<Option<Arc<Board>>>,
    /// Move count of the published goal (u32::MAX when none).
    goal_moves: AtomicU32,
    should_stop: AtomicBool,
    limit_reached: AtomicBool,
}

impl SharedSearch {
    pub fn new(config: SearchConfig, max_workers: usize, max_nodes: Option<usize>) -> Self {
        Self {
            config,
            max_nodes,
            closed: DashSet::with_hasher(FxBuildHasher),
            visited: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_workers: max_workers.max(1),
            next_id: AtomicUsize::new(0),
            spawned: AtomicUsize::new(0),
            goal: Mutex::new(None),
            goal_moves: AtomicU32::new(u32::MAX),
            should_stop: AtomicBool::new(false),
            limit_reached: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Insert `board` into the closed set. Returns false if it was already
    /// there, in which case it must not be expanded again.
    ///
    /// Raises the stop flag once the node limit is reached.
    pub fn close(&self, board: &Arc<Board>) -> bool {
        if !self.closed.insert(Arc::clone(board)) {
            return false;
        }
        let visited = self.visited.fetch_add(1, Ordering::SeqCst) + 1;
        if self.max_nodes.is_some_and(|max| visited >= max) {
            self.signal_limit();
        }
        true
    }

    pub fn is_closed(&self, board: &Board) -> bool {
        self.closed.contains(board)
    }

    /// Number of distinct boards closed so far.
    pub fn visited(&self) -> usize {
        self.visited.load(Ordering::SeqCst)
    }

    /// Claim a running-worker slot. Returns false when the limit is reached.
    pub fn try_reserve_worker(&self) -> bool {
        let mut current = self.active.load(Ordering::SeqCst);
        loop {
            if current >= self.max_workers {
                return false;
            }
            match self.active.compare_exchange_weak(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(c) => current = c,
            }
        }
    }

    /// Give back a slot claimed with `try_reserve_worker`.
    pub fn release_worker(&self) {
        let previous = self.active.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "worker slot released twice");
    }

    pub fn active_workers(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn next_worker_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    pub fn record_spawn(&self) {
        self.spawned.fetch_add(1, Ordering::SeqCst);
    }

    /// Worker threads started during the run.
    pub fn threads_used(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    /// Publish `board` as the goal if none is known yet or it needs strictly
    /// fewer moves than the current one. Returns true if it was published.
    pub fn try_publish(&self, board: &Arc<Board>) -> bool {
        debug_assert!(board.is_solved());
        let mut goal = self.goal.lock().unwrap_or_else(PoisonError::into_inner);
        let better = goal
            .as_ref()
            .map_or(true, |current| board.move_count() < current.move_count());
        if better {
            *goal = Some(Arc::clone(board));
            self.goal_moves.store(board.move_count(), Ordering::SeqCst);
        }
        better
    }

    pub fn has_goal(&self) -> bool {
        self.goal_moves.load(Ordering::SeqCst) != u32::MAX
    }

    /// Move count of the published goal, if any.
    pub fn goal_moves(&self) -> Option<u32> {
        match self.goal_moves.load(Ordering::SeqCst) {
            u32::MAX => None,
            moves => Some(moves),
        }
    }

    pub fn goal(&self) -> Option<Arc<Board>> {
        self.goal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check if we should stop searching.
    pub fn should_stop(&self) -> bool {
        self.should_stop.load(Ordering::SeqCst)
    }

    /// Signal all workers to stop.
    pub fn signal_stop(&self) {
        self.should_stop.store(true, Ordering::SeqCst);
    }

    /// Stop all workers because an external limit was hit.
    pub fn signal_limit(&self) {
        self.limit_reached.store(true, Ordering::SeqCst);
        self.signal_stop();
    }

    pub fn limit_reached(&self) -> bool {
        self.limit_reached.load(Ordering::SeqCst)
    }
}

/// Unbounded channel from workers to the coordinator; workers never block
/// on sending.
pub fn create_channel() -> (Sender<WorkerMessage>, Receiver<WorkerMessage>) {
    unbounded()
}

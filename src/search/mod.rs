//! A* search over FreeCell boards.
//!
//! Boards are ordered by `cost` (moves so far plus weighted heuristic) in a
//! per-worker indexable heap. Workers share one closed set and publish the
//! goal they find; see [`parallel`] for how the worker pool grows.

pub mod config;
pub mod parallel;
pub mod path;
pub mod queue;
pub mod result;

pub use config::{SearchConfig, SearchMode};
pub use parallel::{ParallelConfig, run_parallel_search};
pub use path::{Path, Step};
pub use queue::{Prioritized, PriorityQueue};
pub use result::{SearchResult, SearchStatistics, Termination};

use crate::game::Board;

/// Search `root` with up to `parallelism` workers, stopping at the first
/// goal published.
pub fn run(root: &Board, parallelism: usize) -> SearchResult {
    solve(
        root,
        &SearchConfig::default(),
        &ParallelConfig::default().with_workers(parallelism),
    )
}

/// Search `root` with explicit configuration.
pub fn solve(root: &Board, config: &SearchConfig, parallel: &ParallelConfig) -> SearchResult {
    run_parallel_search(root, config, parallel)
}

//! Parallel A* execution over a shared closed set.
//!
//! # Architecture
//!
//! The parallel search system consists of:
//! - A **coordinator** that starts the root worker and aggregates results
//! - **Workers**, each owning a private open set, that spawn further workers
//!   by donating boards while below the configured limit
//! - **Shared state** holding the closed set, worker counters, stop flags
//!   and the published goal
//! - A **channel** carrying worker events to the coordinator
//!
//! # Example
//!
//! ```no_run
//! use freecell_solver::game::Board;
//! use freecell_solver::search::SearchConfig;
//! use freecell_solver::search::parallel::{ParallelConfig, run_parallel_search};
//! use std::time::Duration;
//!
//! let config = ParallelConfig::default()
//!     .with_workers(4)
//!     .with_timeout(Duration::from_secs(60));
//!
//! let result = run_parallel_search(&Board::from_deal_number(1), &SearchConfig::default(), &config);
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;

pub use config::ParallelConfig;
pub use coordinator::run_parallel_search;

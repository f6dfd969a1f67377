//! Configuration for parallel search execution.

use std::time::Duration;

/// Configuration for parallel search execution.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Maximum number of worker threads running at once.
    pub num_workers: usize,
    /// Wall-clock limit for the whole search.
    pub timeout: Option<Duration>,
    /// Limit on the number of boards entered into the closed set.
    pub max_nodes: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            timeout: None,
            max_nodes: None,
        }
    }
}

impl ParallelConfig {
    /// Set the worker limit; at least one worker always runs.
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    /// Set the overall timeout for parallel search.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the overall timeout from an Option.
    pub fn with_timeout_option(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    pub fn with_max_nodes_option(mut self, max_nodes: Option<usize>) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Whether any external limit is configured.
    pub fn is_bounded(&self) -> bool {
        self.timeout.is_some() || self.max_nodes.is_some()
    }
}

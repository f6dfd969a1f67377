//! Search result types and statistics

use crate::game::Board;
use crate::search::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Why a search run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A goal board was published
    Solved,
    /// Every worker drained its open set without finding a goal
    Exhausted,
    /// A timeout or node limit stopped the workers
    LimitReached,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Solved => write!(f, "solved"),
            Termination::Exhausted => write!(f, "exhausted"),
            Termination::LimitReached => write!(f, "limit reached"),
        }
    }
}

/// Result of a search run
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The published goal board, parent-linked back to the root
    pub goal: Option<Arc<Board>>,
    /// Distinct boards entered into the closed set
    pub visited_nodes: usize,
    /// Worker threads started over the whole run
    pub threads_used: usize,
    pub termination: Termination,
    /// Totals across all workers
    pub statistics: SearchStatistics,
    /// Per-worker statistics, indexed by worker id
    pub worker_statistics: Vec<(usize, SearchStatistics)>,
}

impl SearchResult {
    pub fn is_solved(&self) -> bool {
        self.goal.is_some()
    }

    /// Moves needed to reach the goal, if one was found
    pub fn move_count(&self) -> Option<u32> {
        self.goal.as_ref().map(|g| g.move_count())
    }

    /// Reconstructed move sequence from the root to the goal
    pub fn path(&self) -> Option<Path> {
        self.goal.as_ref().map(Path::from_goal)
    }
}

/// Counters gathered by search workers
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// Boards taken off an open set and expanded
    pub nodes_expanded: u64,
    /// Successor boards generated by expansion
    pub nodes_generated: u64,
    /// Successors discarded because they were already closed
    pub closed_hits: u64,
    /// Open entries replaced by a shorter path to the same board
    pub replacements: u64,
    /// Boards handed to newly spawned workers
    pub donations: u64,
    /// Goal boards reached
    pub goals_found: u64,
    /// Boards dropped because they cannot beat the published goal
    pub pruned: u64,
}

impl SearchStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add another worker's counters to these
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.nodes_expanded += other.nodes_expanded;
        self.nodes_generated += other.nodes_generated;
        self.closed_hits += other.closed_hits;
        self.replacements += other.replacements;
        self.donations += other.donations;
        self.goals_found += other.goals_found;
        self.pruned += other.pruned;
    }

    /// Average successors generated per expanded board
    pub fn branching_factor(&self) -> f64 {
        if self.nodes_expanded == 0 {
            0.0
        } else {
            self.nodes_generated as f64 / self.nodes_expanded as f64
        }
    }

    /// Get nodes expanded per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.nodes_expanded as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Nodes expanded: {}\n", self.nodes_expanded));
        s.push_str(&format!("Nodes generated: {}\n", self.nodes_generated));
        s.push_str(&format!("Throughput: {:.0} nodes/sec\n", self.throughput()));
        s.push_str(&format!("Branching factor: {:.2}\n", self.branching_factor()));
        s.push_str(&format!("Closed-set hits: {}\n", self.closed_hits));

        if self.replacements > 0 {
            s.push_str(&format!("Open-set replacements: {}\n", self.replacements));
        }
        if self.donations > 0 {
            s.push_str(&format!("Donations: {}\n", self.donations));
        }
        if self.goals_found > 0 {
            s.push_str(&format!("Goals found: {}\n", self.goals_found));
        }
        if self.pruned > 0 {
            s.push_str(&format!("Pruned: {}\n", self.pruned));
        }

        s
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(path) => {
                writeln!(f, "Solved in {} moves", path.len())?;
                writeln!(f, "{}", path)?;
            }
            None => writeln!(f, "No solution found ({})", self.termination)?,
        }
        writeln!(f, "Visited nodes: {}", self.visited_nodes)?;
        writeln!(f, "Threads used: {}", self.threads_used)
    }
}

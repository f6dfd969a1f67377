//! Configuration types for the A* search

/// When workers stop after a goal has been published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Every worker stops as soon as any goal is known
    #[default]
    FirstGoal,
    /// Workers keep draining their open sets, pruning nodes that cannot
    /// beat the published goal, so shorter solutions can replace it
    BestGoal,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::FirstGoal => write!(f, "first"),
            SearchMode::BestGoal => write!(f, "best"),
        }
    }
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" | "first-goal" => Ok(SearchMode::FirstGoal),
            "best" | "best-goal" | "shortest" => Ok(SearchMode::BestGoal),
            _ => Err(format!(
                "Unknown search mode: '{}'. Valid options: first, best",
                s
            )),
        }
    }
}

/// Main search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Goal arbitration mode
    pub mode: SearchMode,
    /// Play safe foundation moves on the root before searching
    pub auto_play: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            auto_play: true,
        }
    }
}

impl SearchConfig {
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_auto_play(mut self, enabled: bool) -> Self {
        self.auto_play = enabled;
        self
    }
}

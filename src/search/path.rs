//! Forward move sequences rebuilt from a goal's parent links.

use crate::game::{Board, Move};
use std::fmt;
use std::sync::Arc;

/// One transition: the move played and the board it produced.
#[derive(Debug, Clone)]
pub struct Step {
    pub mv: Move,
    pub board: Arc<Board>,
}

/// The moves from a root board to some later board, in play order.
#[derive(Debug, Clone)]
pub struct Path {
    root: Arc<Board>,
    steps: Vec<Step>,
}

impl Path {
    /// Walk parent links from `goal` back to its root and reverse them.
    pub fn from_goal(goal: &Arc<Board>) -> Self {
        let mut steps = Vec::with_capacity(goal.move_count() as usize);
        let mut root = Arc::clone(goal);

        for board in goal.ancestors() {
            match board.last_move() {
                Some(mv) => steps.push(Step { mv, board }),
                None => root = board,
            }
        }
        steps.reverse();

        Self { root, steps }
    }

    pub fn root(&self) -> &Arc<Board> {
        &self.root
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn moves(&self) -> Vec<Move> {
        self.steps.iter().map(|s| s.mv).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Board reached after the last step, or the root for an empty path.
    pub fn last(&self) -> &Arc<Board> {
        self.steps.last().map(|s| &s.board).unwrap_or(&self.root)
    }
}

/// Space-separated move notation, e.g. `3a 15(3) ah`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", step.mv)?;
        }
        Ok(())
    }
}

//! Parallel A* solver for FreeCell solitaire.
//!
//! [`game`] holds the board model and move rules, [`search`] the indexable
//! open-set heap and the multi-threaded A* coordinator.

pub mod game;
pub mod search;

pub use game::{Board, Move};
pub use search::{SearchResult, run};

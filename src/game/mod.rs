//! FreeCell game model: cards, the three kinds of piles, moves and boards.

pub mod board;
pub mod card;
pub mod deal;
pub mod foundation;
pub mod moves;
pub mod render;
pub mod reserve;
pub mod tableau;

pub use board::{Ancestors, Board, Moves, TABLEAU_COUNT};
pub use card::{Card, Color, Suit};
pub use foundation::Foundation;
pub use moves::Move;
pub use reserve::Reserve;
pub use tableau::Tableau;

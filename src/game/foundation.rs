//! Per-suit foundation piles.

use crate::game::card::{Card, KING, Suit};

/// Highest rank placed per suit (0 = empty). Ranks only ever grow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Foundation {
    ranks: [u8; 4],
}

impl Foundation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from per-suit top ranks, indexed by `Suit::index()`.
    pub fn from_ranks(ranks: [u8; 4]) -> Self {
        debug_assert!(ranks.iter().all(|&r| r <= KING));
        Self { ranks }
    }

    pub fn ranks(&self) -> [u8; 4] {
        self.ranks
    }

    pub fn rank(&self, suit: Suit) -> u8 {
        self.ranks[suit.index()]
    }

    /// Top card of a suit's pile.
    pub fn top(&self, suit: Suit) -> Option<Card> {
        let rank = self.rank(suit);
        (rank > 0).then(|| Card::new(suit, rank))
    }

    pub fn can_push(&self, card: Card) -> bool {
        card.rank() == self.rank(card.suit()) + 1
    }

    pub fn push(&mut self, card: Card) {
        debug_assert!(self.can_push(card), "illegal foundation push of {card}");
        self.ranks[card.suit().index()] += 1;
    }

    /// Total cards on all foundations.
    pub fn count(&self) -> usize {
        self.ranks.iter().map(|&r| usize::from(r)).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.ranks.iter().all(|&r| r == KING)
    }
}

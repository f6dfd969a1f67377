//! A single tableau column with an incrementally maintained sorted run.
//!
//! Cards live in a fixed-capacity inline buffer, so cloning a column is a
//! bounded copy and multi-card moves are a single range copy. `sorted` tracks
//! how many cards from the top form a valid descending, alternating-color
//! run; it is only recomputed from scratch when a pop or move exhausts the
//! tracked run.

use crate::game::card::Card;
use std::hash::{Hash, Hasher};

/// Deepest possible column: seven dealt cards plus a Queen-to-Ace run.
pub const TABLEAU_CAPACITY: usize = 19;

#[derive(Clone)]
pub struct Tableau {
    cards: [Card; TABLEAU_CAPACITY],
    size: u8,
    sorted: u8,
}

impl Tableau {
    pub fn new() -> Self {
        Self {
            cards: [Card::from_index_unchecked(0); TABLEAU_CAPACITY],
            size: 0,
            sorted: 0,
        }
    }

    /// Build a column from cards listed bottom to top.
    pub fn from_cards(cards: &[Card]) -> Self {
        assert!(
            cards.len() <= TABLEAU_CAPACITY,
            "column of {} cards exceeds capacity",
            cards.len()
        );
        let mut t = Self::new();
        t.cards[..cards.len()].copy_from_slice(cards);
        t.size = cards.len() as u8;
        t.sorted = t.recount_sorted() as u8;
        t
    }

    pub fn len(&self) -> usize {
        usize::from(self.size)
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Length of the sorted run at the top of the column.
    pub fn sorted_len(&self) -> usize {
        usize::from(self.sorted)
    }

    pub fn top(&self) -> Option<Card> {
        self.cards().last().copied()
    }

    /// Cards from bottom to top.
    pub fn cards(&self) -> &[Card] {
        &self.cards[..self.len()]
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards().get(index).copied()
    }

    pub fn can_push(&self, card: Card) -> bool {
        match self.top() {
            None => true,
            Some(top) => card.is_below(top),
        }
    }

    pub fn push(&mut self, card: Card) {
        debug_assert!(self.can_push(card), "illegal push of {card}");
        debug_assert!(self.len() < TABLEAU_CAPACITY);
        self.cards[self.len()] = card;
        self.size += 1;
        self.sorted += 1;
        debug_assert_eq!(self.sorted_len(), self.recount_sorted());
    }

    pub fn pop(&mut self) -> Card {
        debug_assert!(!self.is_empty(), "pop from empty column");
        self.size -= 1;
        let card = self.cards[self.len()];
        self.sorted -= 1;
        if self.sorted == 0 {
            self.sorted = self.recount_sorted() as u8;
        }
        debug_assert_eq!(self.sorted_len(), self.recount_sorted());
        card
    }

    /// Number of top cards that can move onto `target` as one supermove.
    ///
    /// Ignores free-cell capacity; the board caps the result by the number of
    /// empty reserve slots and columns. Onto an empty column the whole sorted
    /// run qualifies. Otherwise the rank gap between the two tops decides the
    /// count, and the gap's parity must agree with the color relation of the
    /// two tops for the run's head to alternate onto `target`.
    pub fn count_movable(&self, target: &Tableau) -> usize {
        let Some(top) = self.top() else {
            return 0;
        };
        let Some(lead) = target.top() else {
            return self.sorted_len();
        };

        let gap = i32::from(lead.rank()) - i32::from(top.rank());
        if gap <= 0 || gap > i32::from(self.sorted) {
            return 0;
        }
        let same_color = top.color() == lead.color();
        if (gap & 1) == i32::from(same_color) {
            return 0;
        }

        let count = gap as usize;
        debug_assert!(target.can_push(self.cards[self.len() - count]));
        count
    }

    /// Move the top `count` cards onto `target` in one range copy.
    pub fn move_to(&mut self, target: &mut Tableau, count: usize) {
        debug_assert!(count > 0 && count <= self.sorted_len());
        debug_assert!(target.can_push(self.cards[self.len() - count]));
        debug_assert!(target.len() + count <= TABLEAU_CAPACITY);

        if count == 1 {
            let card = self.pop();
            target.push(card);
            return;
        }

        let from = self.len() - count;
        let to = target.len();
        target.cards[to..to + count].copy_from_slice(&self.cards[from..self.len()]);
        target.size += count as u8;
        target.sorted += count as u8;

        self.size -= count as u8;
        self.sorted -= count as u8;
        if self.sorted == 0 {
            self.sorted = self.recount_sorted() as u8;
        }

        debug_assert_eq!(self.sorted_len(), self.recount_sorted());
        debug_assert_eq!(target.sorted_len(), target.recount_sorted());
    }

    /// Length of the top run computed by a full rescan.
    pub fn recount_sorted(&self) -> usize {
        let cards = self.cards();
        if cards.is_empty() {
            return 0;
        }
        1 + cards
            .windows(2)
            .rev()
            .take_while(|pair| pair[1].is_below(pair[0]))
            .count()
    }
}

impl Default for Tableau {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Tableau {
    fn eq(&self, other: &Self) -> bool {
        self.cards() == other.cards()
    }
}

impl Eq for Tableau {}

impl Hash for Tableau {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cards().hash(state);
    }
}

impl std::fmt::Debug for Tableau {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tableau(")?;
        for (i, card) in self.cards().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", card)?;
        }
        write!(f, ")")
    }
}

impl std::str::FromStr for Tableau {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Card>, _>>()?;
        if cards.len() > TABLEAU_CAPACITY {
            return Err(format!(
                "Column has {} cards, capacity is {}",
                cards.len(),
                TABLEAU_CAPACITY
            ));
        }
        Ok(Self::from_cards(&cards))
    }
}

//! Card value types: suit, color and the packed card encoding.

use std::fmt;

/// Number of cards in a deck.
pub const DECK_SIZE: usize = 52;

/// Highest rank (King).
pub const KING: u8 = 13;

const RANK_CHARS: [char; 13] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];
const SUIT_CHARS: [char; 4] = ['C', 'D', 'H', 'S'];

/// Card suits, in foundation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn color(self) -> Color {
        match self {
            Suit::Clubs | Suit::Spades => Color::Black,
            Suit::Diamonds | Suit::Hearts => Color::Red,
        }
    }

    pub fn to_char(self) -> char {
        SUIT_CHARS[self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
}

/// A playing card packed as `(rank - 1) * 4 + suit`.
///
/// The packing matches the deck order used by the deal generator
/// (AC, AD, AH, AS, 2C, ...), so `index()` is also the card's deck number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card(u8);

impl Card {
    /// Create a card from a suit and a rank in `1..=13`.
    pub fn new(suit: Suit, rank: u8) -> Self {
        debug_assert!((1..=KING).contains(&rank), "rank out of range: {rank}");
        Card((rank - 1) * 4 + suit as u8)
    }

    /// Create a card from its deck number (0..52).
    pub fn from_index(index: u8) -> Option<Self> {
        (usize::from(index) < DECK_SIZE).then_some(Card(index))
    }

    pub(crate) const fn from_index_unchecked(index: u8) -> Self {
        Card(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Rank in `1..=13` (Ace = 1, King = 13).
    pub fn rank(self) -> u8 {
        self.0 / 4 + 1
    }

    pub fn suit(self) -> Suit {
        match self.0 & 3 {
            0 => Suit::Clubs,
            1 => Suit::Diamonds,
            2 => Suit::Hearts,
            _ => Suit::Spades,
        }
    }

    pub fn color(self) -> Color {
        self.suit().color()
    }

    /// True if this card can sit directly on `other` in a tableau:
    /// one rank lower and the opposite color.
    pub fn is_below(self, other: Card) -> bool {
        self.rank() + 1 == other.rank() && self.color() != other.color()
    }

    /// Iterate over all 52 cards in deck order.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..DECK_SIZE as u8).map(Card)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            RANK_CHARS[usize::from(self.rank() - 1)],
            self.suit().to_char()
        )
    }
}

impl std::str::FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let mut chars = upper.chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("Invalid card: '{}'. Expected rank + suit, e.g. 'TD'", s));
        };

        let rank = RANK_CHARS
            .iter()
            .position(|&c| c == r)
            .ok_or_else(|| format!("Invalid rank '{}' in card '{}'", r, s))?;
        let suit = SUIT_CHARS
            .iter()
            .position(|&c| c == su)
            .and_then(Suit::from_index)
            .ok_or_else(|| format!("Invalid suit '{}' in card '{}'", su, s))?;

        Ok(Card::new(suit, rank as u8 + 1))
    }
}

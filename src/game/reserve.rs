//! The four free cells.

use crate::game::card::Card;
use std::fmt;

pub const RESERVE_SIZE: usize = 4;

/// Four free-cell slots. New cards always go to the lowest empty slot, so
/// slot assignment is a deterministic function of the move sequence.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Reserve {
    slots: [Option<Card>; RESERVE_SIZE],
    free: u8,
}

impl Reserve {
    pub fn new() -> Self {
        Self {
            slots: [None; RESERVE_SIZE],
            free: RESERVE_SIZE as u8,
        }
    }

    pub fn from_slots(slots: [Option<Card>; RESERVE_SIZE]) -> Self {
        let free = slots.iter().filter(|s| s.is_none()).count() as u8;
        Self { slots, free }
    }

    pub fn free_count(&self) -> usize {
        usize::from(self.free)
    }

    pub fn get(&self, slot: usize) -> Option<Card> {
        self.slots[slot]
    }

    /// Occupied slots with their cards.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, Card)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|c| (i, c)))
    }

    /// Lowest empty slot, if any.
    pub fn can_insert(&self) -> Option<usize> {
        if self.free == 0 {
            return None;
        }
        self.slots.iter().position(Option::is_none)
    }

    pub fn insert(&mut self, slot: usize, card: Card) {
        debug_assert_eq!(self.can_insert(), Some(slot), "insert into wrong slot");
        self.slots[slot] = Some(card);
        self.free -= 1;
        debug_assert_eq!(self.free_count(), self.recount_free());
    }

    pub fn remove(&mut self, slot: usize) -> Card {
        let Some(card) = self.slots[slot].take() else {
            unreachable!("remove from empty reserve slot {slot}");
        };
        self.free += 1;
        debug_assert_eq!(self.free_count(), self.recount_free());
        card
    }

    /// Free slots counted by a full scan.
    pub fn recount_free(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }
}

impl Default for Reserve {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Reserve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reserve({})", self)
    }
}

impl fmt::Display for Reserve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match slot {
                Some(card) => write!(f, "{}", card)?,
                None => write!(f, "--")?,
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Reserve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() > RESERVE_SIZE {
            return Err(format!(
                "Reserve has {} entries, at most {} allowed",
                tokens.len(),
                RESERVE_SIZE
            ));
        }

        let mut slots = [None; RESERVE_SIZE];
        for (slot, token) in slots.iter_mut().zip(tokens) {
            if token != "--" {
                *slot = Some(token.parse()?);
            }
        }
        Ok(Self::from_slots(slots))
    }
}

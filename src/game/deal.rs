//! Deal numbers to initial boards, compatible with the classic Microsoft
//! FreeCell numbering.

use crate::game::board::{Board, TABLEAU_COUNT};
use crate::game::card::{Card, DECK_SIZE};
use crate::game::foundation::Foundation;
use crate::game::reserve::Reserve;
use crate::game::tableau::Tableau;

/// The Microsoft C runtime `rand()` generator.
struct MsRand {
    state: u32,
}

impl MsRand {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(214_013)
            .wrapping_add(2_531_011)
            & 0x7fff_ffff;
        self.state >> 16
    }
}

impl Board {
    /// Deal `number`: draw cards from an ordered deck (AC, AD, AH, AS, 2C, ...)
    /// with the Microsoft generator, dealing them round-robin over the eight
    /// columns.
    pub fn from_deal_number(number: u32) -> Board {
        let mut rng = MsRand::new(number);
        let mut deck: Vec<u8> = (0..DECK_SIZE as u8).collect();
        let mut columns: [Vec<Card>; TABLEAU_COUNT] = Default::default();

        for dealt in 0..DECK_SIZE {
            let remaining = deck.len() as u32;
            let pick = (rng.next() % remaining) as usize;
            let card = deck.swap_remove(pick);
            columns[dealt % TABLEAU_COUNT].push(Card::from_index_unchecked(card));
        }

        let tableaus = columns.map(|cards| Tableau::from_cards(&cards));
        Board::new(Reserve::new(), Foundation::new(), tableaus)
    }
}

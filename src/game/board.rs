//! Full board state and the FreeCell move rules.
//!
//! A `Board` is one search node: the card layout plus the metadata the
//! search needs (move count, cost, parent link and the move that produced
//! it). Equality and hashing cover the layout only, so two boards reached
//! by different paths are the same node.

use crate::game::card::{Card, DECK_SIZE, KING, Suit};
use crate::game::foundation::Foundation;
use crate::game::moves::Move;
use crate::game::reserve::{RESERVE_SIZE, Reserve};
use crate::game::tableau::Tableau;
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub const TABLEAU_COUNT: usize = 8;

/// Weight applied to the heuristic estimate in the search cost.
pub const HEURISTIC_WEIGHT: u32 = 2;

/// Moves generated from a single board.
pub type Moves = SmallVec<[Move; 64]>;

#[derive(Clone)]
pub struct Board {
    reserve: Reserve,
    foundation: Foundation,
    tableaus: [Tableau; TABLEAU_COUNT],
    move_count: u32,
    cost: u32,
    parent: Option<Arc<Board>>,
    last_move: Option<Move>,
}

impl Board {
    /// Create a root board from its parts.
    pub fn new(reserve: Reserve, foundation: Foundation, tableaus: [Tableau; TABLEAU_COUNT]) -> Self {
        let mut board = Self {
            reserve,
            foundation,
            tableaus,
            move_count: 0,
            cost: 0,
            parent: None,
            last_move: None,
        };
        board.compute_cost();
        board
    }

    /// Build a root board from text: a reserve line ("3D -- -- --"),
    /// per-suit foundation ranks and up to eight columns listed bottom to top.
    pub fn from_layout(reserve: &str, foundation: [u8; 4], columns: &[&str]) -> Result<Self, String> {
        if columns.len() > TABLEAU_COUNT {
            return Err(format!(
                "Board has {} columns, at most {} allowed",
                columns.len(),
                TABLEAU_COUNT
            ));
        }
        if let Some(&rank) = foundation.iter().find(|&&r| r > KING) {
            return Err(format!("Invalid foundation rank: {}", rank));
        }

        let mut tableaus: [Tableau; TABLEAU_COUNT] = Default::default();
        for (tableau, column) in tableaus.iter_mut().zip(columns) {
            *tableau = column.parse()?;
        }

        Ok(Self::new(
            reserve.parse()?,
            Foundation::from_ranks(foundation),
            tableaus,
        ))
    }

    pub fn reserve(&self) -> &Reserve {
        &self.reserve
    }

    pub fn foundation(&self) -> &Foundation {
        &self.foundation
    }

    pub fn tableaus(&self) -> &[Tableau; TABLEAU_COUNT] {
        &self.tableaus
    }

    pub fn tableau(&self, index: usize) -> &Tableau {
        &self.tableaus[index]
    }

    /// Moves made from the root to reach this board.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Search cost: move count plus weighted heuristic.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn parent(&self) -> Option<&Arc<Board>> {
        self.parent.as_ref()
    }

    /// The move that produced this board from its parent.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn is_solved(&self) -> bool {
        self.foundation.is_complete()
    }

    /// Lower bound on the moves still needed: a move sends at most one card
    /// home.
    pub fn min_moves_to_solve(&self) -> u32 {
        (DECK_SIZE - self.foundation.count()) as u32
    }

    /// Lower bound on the length of any solution through this board.
    pub fn min_solution_length(&self) -> u32 {
        self.move_count + self.min_moves_to_solve()
    }

    /// Every card appears exactly once and cached column state is consistent.
    pub fn is_valid(&self) -> bool {
        let mut seen = [false; DECK_SIZE];
        let mut mark = |card: Card| !std::mem::replace(&mut seen[usize::from(card.index())], true);

        for suit in Suit::ALL {
            for rank in 1..=self.foundation.rank(suit) {
                if !mark(Card::new(suit, rank)) {
                    return false;
                }
            }
        }
        for (_, card) in self.reserve.occupied() {
            if !mark(card) {
                return false;
            }
        }
        for tableau in &self.tableaus {
            if tableau.sorted_len() != tableau.recount_sorted() {
                return false;
            }
            for &card in tableau.cards() {
                if !mark(card) {
                    return false;
                }
            }
        }

        self.reserve.free_count() == self.reserve.recount_free() && seen.iter().all(|&s| s)
    }

    pub fn empty_tableau_count(&self) -> usize {
        self.tableaus.iter().filter(|t| t.is_empty()).count()
    }

    /// Largest run a supermove may carry given free cells and empty columns.
    /// A move into an empty column cannot use that column as a buffer.
    pub fn max_movable(&self, to_empty: bool) -> usize {
        let empties = self.empty_tableau_count() - usize::from(to_empty);
        (self.reserve.free_count() + 1) << empties
    }

    /// Whether `mv` may be applied to this board.
    pub fn is_legal(&self, mv: Move) -> bool {
        match mv {
            Move::TableauToReserve { from, to } => {
                !self.tableaus[usize::from(from)].is_empty()
                    && self.reserve.can_insert() == Some(usize::from(to))
            }
            Move::TableauToFoundation { from, to } => self.tableaus[usize::from(from)]
                .top()
                .is_some_and(|c| c.suit().index() == usize::from(to) && self.foundation.can_push(c)),
            Move::TableauToTableau { from, to, count } => {
                let (from, to, count) = (usize::from(from), usize::from(to), usize::from(count));
                if from == to || count == 0 {
                    return false;
                }
                let (src, dst) = (&self.tableaus[from], &self.tableaus[to]);
                if dst.is_empty() {
                    count <= src.sorted_len() && count <= self.max_movable(true)
                } else {
                    count == src.count_movable(dst) && count <= self.max_movable(false)
                }
            }
            Move::ReserveToTableau { from, to } => self
                .reserve
                .get(usize::from(from))
                .is_some_and(|c| self.tableaus[usize::from(to)].can_push(c)),
            Move::ReserveToFoundation { from, to } => self
                .reserve
                .get(usize::from(from))
                .is_some_and(|c| c.suit().index() == usize::from(to) && self.foundation.can_push(c)),
        }
    }

    /// All legal moves, in a fixed order: tableau to foundation, tableau to
    /// tableau, tableau to reserve, reserve to foundation, reserve to tableau.
    ///
    /// Of several empty columns only the first is offered as a target, and a
    /// whole column is never moved into an empty one.
    pub fn valid_moves(&self) -> Moves {
        let mut moves = Moves::new();
        let first_empty = self.tableaus.iter().position(Tableau::is_empty);

        for (i, tableau) in self.tableaus.iter().enumerate() {
            if let Some(card) = tableau.top() {
                if self.foundation.can_push(card) {
                    moves.push(Move::TableauToFoundation {
                        from: i as u8,
                        to: card.suit().index() as u8,
                    });
                }
            }
        }

        let max_to_empty = if first_empty.is_some() {
            self.max_movable(true)
        } else {
            0
        };
        let max_to_occupied = self.max_movable(false);
        for (i, src) in self.tableaus.iter().enumerate() {
            if src.is_empty() {
                continue;
            }
            for (j, dst) in self.tableaus.iter().enumerate() {
                if i == j {
                    continue;
                }
                let count = if dst.is_empty() {
                    if Some(j) != first_empty {
                        continue;
                    }
                    let count = src.sorted_len().min(max_to_empty);
                    if count == src.len() {
                        continue;
                    }
                    count
                } else {
                    let count = src.count_movable(dst);
                    if count == 0 || count > max_to_occupied {
                        continue;
                    }
                    count
                };
                moves.push(Move::TableauToTableau {
                    from: i as u8,
                    to: j as u8,
                    count: count as u8,
                });
            }
        }

        if let Some(slot) = self.reserve.can_insert() {
            for (i, tableau) in self.tableaus.iter().enumerate() {
                if !tableau.is_empty() {
                    moves.push(Move::TableauToReserve {
                        from: i as u8,
                        to: slot as u8,
                    });
                }
            }
        }

        for (slot, card) in self.reserve.occupied() {
            if self.foundation.can_push(card) {
                moves.push(Move::ReserveToFoundation {
                    from: slot as u8,
                    to: card.suit().index() as u8,
                });
            }
        }

        for (slot, card) in self.reserve.occupied() {
            for (j, dst) in self.tableaus.iter().enumerate() {
                let allowed = if dst.is_empty() {
                    Some(j) == first_empty
                } else {
                    dst.can_push(card)
                };
                if allowed {
                    moves.push(Move::ReserveToTableau {
                        from: slot as u8,
                        to: j as u8,
                    });
                }
            }
        }

        moves
    }

    /// Apply `mv` to a copy of this board. The copy links back to `self` and
    /// its cost is left for the caller to compute.
    pub fn execute_move(self: &Arc<Self>, mv: Move) -> Board {
        let mut next = Board {
            reserve: self.reserve.clone(),
            foundation: self.foundation.clone(),
            tableaus: self.tableaus.clone(),
            move_count: self.move_count + 1,
            cost: 0,
            parent: Some(Arc::clone(self)),
            last_move: Some(mv),
        };
        next.apply(mv);
        next
    }

    fn apply(&mut self, mv: Move) {
        debug_assert!(self.is_legal(mv), "illegal move {mv}");
        match mv {
            Move::TableauToReserve { from, to } => {
                let card = self.tableaus[usize::from(from)].pop();
                self.reserve.insert(usize::from(to), card);
            }
            Move::TableauToFoundation { from, .. } => {
                let card = self.tableaus[usize::from(from)].pop();
                self.foundation.push(card);
            }
            Move::TableauToTableau { from, to, count } => {
                let (src, dst) = pair_mut(&mut self.tableaus, usize::from(from), usize::from(to));
                src.move_to(dst, usize::from(count));
            }
            Move::ReserveToTableau { from, to } => {
                let card = self.reserve.remove(usize::from(from));
                self.tableaus[usize::from(to)].push(card);
            }
            Move::ReserveToFoundation { from, .. } => {
                let card = self.reserve.remove(usize::from(from));
                self.foundation.push(card);
            }
        }
    }

    /// Estimated remaining effort; zero exactly when solved.
    ///
    /// Sums cards not yet home, out-of-order tableau cards, occupied free
    /// cells, and for each suit the cards stacked on its next foundation card.
    pub fn heuristic(&self) -> u32 {
        let remaining = DECK_SIZE - self.foundation.count();
        let occupied = RESERVE_SIZE - self.reserve.free_count();
        let unsorted: usize = self
            .tableaus
            .iter()
            .map(|t| t.len() - t.sorted_len())
            .sum();

        let mut blockers = 0;
        for suit in Suit::ALL {
            let rank = self.foundation.rank(suit);
            if rank == KING {
                continue;
            }
            let next = Card::new(suit, rank + 1);
            for tableau in &self.tableaus {
                if let Some(pos) = tableau.cards().iter().position(|&c| c == next) {
                    blockers += tableau.len() - 1 - pos;
                    break;
                }
            }
        }

        (remaining + unsorted + occupied + blockers) as u32
    }

    pub fn compute_cost(&mut self) {
        self.cost = self.move_count + HEURISTIC_WEIGHT * self.heuristic();
    }

    /// A card may go home without losing options when it is an Ace or Two, or
    /// when both opposite-color foundations already hold the rank below it.
    fn is_safe_to_foundation(&self, card: Card) -> bool {
        if !self.foundation.can_push(card) {
            return false;
        }
        let rank = card.rank();
        rank <= 2
            || Suit::ALL
                .iter()
                .filter(|s| s.color() != card.color())
                .all(|&s| self.foundation.rank(s) >= rank - 1)
    }

    fn next_safe_move(&self) -> Option<Move> {
        for (i, tableau) in self.tableaus.iter().enumerate() {
            if let Some(card) = tableau.top() {
                if self.is_safe_to_foundation(card) {
                    return Some(Move::TableauToFoundation {
                        from: i as u8,
                        to: card.suit().index() as u8,
                    });
                }
            }
        }
        self.reserve
            .occupied()
            .find(|&(_, card)| self.is_safe_to_foundation(card))
            .map(|(slot, card)| Move::ReserveToFoundation {
                from: slot as u8,
                to: card.suit().index() as u8,
            })
    }

    /// Repeatedly play safe foundation moves. Each play is a parent-linked
    /// step, so paths from the returned board still reach `self`.
    pub fn auto_play(self: &Arc<Self>) -> Arc<Board> {
        let mut current = Arc::clone(self);
        while let Some(mv) = current.next_safe_move() {
            let mut next = current.execute_move(mv);
            next.compute_cost();
            current = Arc::new(next);
        }
        current
    }

    /// Walk parent links from this board back to the root, inclusive.
    pub fn ancestors(self: &Arc<Self>) -> Ancestors {
        Ancestors {
            next: Some(Arc::clone(self)),
        }
    }
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = items.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

/// Lazy walk from a board to its root. Cloning restarts from the same point.
#[derive(Clone)]
pub struct Ancestors {
    next: Option<Arc<Board>>,
}

impl Iterator for Ancestors {
    type Item = Arc<Board>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent.clone();
        Some(current)
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.reserve == other.reserve
            && self.foundation == other.foundation
            && self.tableaus == other.tableaus
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reserve.hash(state);
        self.foundation.hash(state);
        self.tableaus.hash(state);
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("reserve", &self.reserve)
            .field("foundation", &self.foundation.ranks())
            .field("tableaus", &self.tableaus)
            .field("move_count", &self.move_count)
            .field("cost", &self.cost)
            .field("last_move", &self.last_move)
            .finish()
    }
}

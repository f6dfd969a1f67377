//! Board transitions.

use std::fmt;

/// A single legal transition between two board states.
///
/// Indices are column (0..8), reserve slot (0..4) or foundation suit (0..4)
/// depending on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    TableauToReserve { from: u8, to: u8 },
    TableauToFoundation { from: u8, to: u8 },
    TableauToTableau { from: u8, to: u8, count: u8 },
    ReserveToTableau { from: u8, to: u8 },
    ReserveToFoundation { from: u8, to: u8 },
}

fn column(index: u8) -> char {
    char::from(b'1' + index)
}

fn cell(index: u8) -> char {
    char::from(b'a' + index)
}

/// Standard notation: columns `1`-`8`, free cells `a`-`d`, foundation `h`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::TableauToReserve { from, to } => write!(f, "{}{}", column(from), cell(to)),
            Move::TableauToFoundation { from, .. } => write!(f, "{}h", column(from)),
            Move::TableauToTableau { from, to, count } if count > 1 => {
                write!(f, "{}{}({})", column(from), column(to), count)
            }
            Move::TableauToTableau { from, to, .. } => {
                write!(f, "{}{}", column(from), column(to))
            }
            Move::ReserveToTableau { from, to } => write!(f, "{}{}", cell(from), column(to)),
            Move::ReserveToFoundation { from, .. } => write!(f, "{}h", cell(from)),
        }
    }
}

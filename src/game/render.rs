//! Read-only projections of a board for diagnostics: a text layout, a JSON
//! array of columns and Rust source that rebuilds the board as a fixture.

use crate::game::board::{Board, TABLEAU_COUNT};
use crate::game::card::Suit;
use std::fmt::{self, Write};

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CC DD HH SS")?;
        let homes: Vec<String> = Suit::ALL
            .iter()
            .map(|&s| match self.foundation().top(s) {
                Some(card) => card.to_string(),
                None => "--".to_string(),
            })
            .collect();
        writeln!(f, "{}", homes.join(" "))?;
        writeln!(f)?;

        writeln!(f, "00 01 02 03")?;
        writeln!(f, "{}", self.reserve())?;
        writeln!(f)?;

        let header: Vec<String> = (0..TABLEAU_COUNT).map(|i| format!("{:02}", i)).collect();
        writeln!(f, "{}", header.join(" "))?;
        write!(f, "{}", vec!["--"; TABLEAU_COUNT].join(" "))?;

        let depth = self.tableaus().iter().map(|t| t.len()).max().unwrap_or(0);
        for row in 0..depth {
            let cells: Vec<String> = self
                .tableaus()
                .iter()
                .map(|t| match t.get(row) {
                    Some(card) => card.to_string(),
                    None => "  ".to_string(),
                })
                .collect();
            write!(f, "\n{}", cells.join(" ").trim_end())?;
        }
        Ok(())
    }
}

/// Columns as a JSON array of card numbers, bottom to top.
pub fn to_json(board: &Board) -> String {
    let columns: Vec<Vec<u8>> = board
        .tableaus()
        .iter()
        .map(|t| t.cards().iter().map(|c| c.index()).collect())
        .collect();
    serde_json::json!(columns).to_string()
}

/// Rust source that rebuilds `board` through `Board::from_layout`, preceded
/// by the text layout in a block comment.
pub fn emit_fixture(board: &Board) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_fixture(&mut out, board)?;
    Ok(out)
}

fn write_fixture(out: &mut impl Write, board: &Board) -> fmt::Result {
    writeln!(out, "/*\n{}\n*/\n", board)?;
    writeln!(out, "let board = Board::from_layout(")?;
    writeln!(out, "    \"{}\",", board.reserve())?;
    writeln!(out, "    {:?},", board.foundation().ranks())?;
    writeln!(out, "    &[")?;
    for tableau in board.tableaus() {
        let cards: Vec<String> = tableau.cards().iter().map(|c| c.to_string()).collect();
        writeln!(out, "        \"{}\",", cards.join(" "))?;
    }
    writeln!(out, "    ],")?;
    writeln!(out, ")?;")?;
    write!(out, "assert!(board.is_valid());")
}

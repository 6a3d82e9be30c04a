// ABOUTME: Source coordinate type shared by the lexer, parser and evaluator

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

/// Where a [`Position`] is anchored: a real file, or the REPL/no file at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(Rc<PathBuf>),
    Repl,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::File(path) => write!(f, "{}", path.display()),
            Origin::Repl => write!(f, "<repl>"),
        }
    }
}

/// A 1-based row/column coordinate within an [`Origin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub origin: Origin,
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(origin: Origin, row: usize, col: usize) -> Self {
        Position { origin, row, col }
    }

    pub fn start(origin: Origin) -> Self {
        Position::new(origin, 1, 1)
    }

    /// Advance one grapheme: bumps the column, or resets to column 1 and
    /// bumps the row on a newline.
    pub fn advance(&mut self, grapheme: &str) {
        if grapheme == "\n" {
            self.row += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.origin, self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_increments_column() {
        let mut pos = Position::start(Origin::Repl);
        pos.advance("a");
        pos.advance("b");
        assert_eq!(pos.row, 1);
        assert_eq!(pos.col, 3);
    }

    #[test]
    fn advance_resets_column_on_newline() {
        let mut pos = Position::start(Origin::Repl);
        pos.advance("a");
        pos.advance("\n");
        assert_eq!(pos.row, 2);
        assert_eq!(pos.col, 1);
    }

    #[test]
    fn display_repl_origin() {
        let pos = Position::new(Origin::Repl, 3, 7);
        assert_eq!(format!("{}", pos), "<repl>:3:7");
    }
}

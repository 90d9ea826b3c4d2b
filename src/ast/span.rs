//! AST foundation types: spans and source positions.

use std::fmt;
use std::ops::Range;

/// A byte range in source text.
/// This is the canonical span type used throughout the parser.
pub type Span = Range<usize>;

/// A point in source text.
///
/// `offset` is a byte offset; `line` and `column` are 1-based, with columns
/// counted in Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl Position {
    /// Position of the first character of any input.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Creates a new position.
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Computes the position of `offset` inside `source`.
    ///
    /// Offsets past the end are clamped; offsets inside a multi-byte
    /// character resolve to the start of that character.
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for (index, ch) in source.char_indices() {
            if index >= offset {
                return Self::new(index, line, column);
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self::new(source.len(), line, column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

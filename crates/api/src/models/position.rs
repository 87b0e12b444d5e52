use serde::{Deserialize, Serialize};

/// Zero-based line/column pair. Columns are counted in UTF-16 code units,
/// matching what editors send over the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            start_line: start.line,
            start_col: start.col,
            end_line: end.line,
            end_col: end.col,
        }
    }

    pub fn start(&self) -> Position {
        Position::new(self.start_line, self.start_col)
    }

    pub fn end(&self) -> Position {
        Position::new(self.end_line, self.end_col)
    }

    pub fn contains(&self, line: usize, col: usize) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        if line == self.start_line && col < self.start_col {
            return false;
        }
        if line == self.end_line && col > self.end_col {
            return false;
        }
        true
    }

    /// Like [`Range::contains`] but excludes both boundary columns, which is
    /// what "the cursor sits between the quotes" means for a string literal.
    pub fn strictly_contains(&self, pos: Position) -> bool {
        pos > self.start() && pos < self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_multiline() {
        let range = Range {
            start_line: 1,
            start_col: 4,
            end_line: 3,
            end_col: 2,
        };
        assert!(range.contains(2, 100));
        assert!(range.contains(1, 4));
        assert!(!range.contains(1, 3));
        assert!(!range.contains(3, 3));
    }

    #[test]
    fn test_strictly_contains_excludes_edges() {
        let range = Range::new(Position::new(0, 3), Position::new(0, 10));
        assert!(!range.strictly_contains(Position::new(0, 3)));
        assert!(range.strictly_contains(Position::new(0, 4)));
        assert!(!range.strictly_contains(Position::new(0, 10)));
    }
}

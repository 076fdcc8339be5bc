use std::fmt;

/// Zero-based location of a logical unit in the source.
///
/// `offset` is a byte offset, `line` and `column` count line breaks and
/// units respectively. Display is one-based, the way editors number lines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line + 1, self.column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::Position;

    #[test]
    fn display_is_one_based() {
        let position = Position::new(14, 2, 4);
        assert_eq!(position.to_string(), "line 3, column 5");
    }
}

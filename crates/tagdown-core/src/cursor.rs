use crate::position::Position;

/// Forward-only reader over the source, one `char` at a time.
///
/// `\r\n` and a lone `\r` are both reported as a single `\n` unit. There is
/// no way to step back: callers remember an [`offset`](Cursor::offset) at a
/// decision point and [`slice`](Cursor::slice) forward from it.
pub(crate) struct Cursor<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 0,
            column: 0,
        }
    }

    /// The unit under the cursor, `None` once the input is exhausted.
    pub(crate) fn current(&self) -> Option<char> {
        self.unit().map(|(ch, _)| ch)
    }

    /// Moves past the current unit and returns the new current one.
    pub(crate) fn advance(&mut self) -> Option<char> {
        let Some((ch, width)) = self.unit() else {
            return None;
        };
        self.offset += width;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        self.current()
    }

    pub(crate) fn position(&self) -> Position {
        Position::new(self.offset, self.line, self.column)
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    fn unit(&self) -> Option<(char, usize)> {
        let rest = &self.source[self.offset..];
        let ch = rest.chars().next()?;
        match ch {
            '\r' if rest[1..].starts_with('\n') => Some(('\n', 2)),
            '\r' => Some(('\n', 1)),
            _ => Some((ch, ch.len_utf8())),
        }
    }
}

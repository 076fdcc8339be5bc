use crate::ast::{Options, Tag};
use crate::cursor::Cursor;
use crate::diagnostic::{
    E_NESTING_DEPTH, E_OPTION_SYNTAX, E_ROOT_MISSING, E_ROOT_MULTIPLE, E_TAG_NAME,
    E_UNEXPECTED_CLOSE, E_UNEXPECTED_EOF, E_UNEXPECTED_TOKEN, ParseError, SyntaxError,
    ValidationErrors,
};
use crate::position::Position;
use crate::text::{compress_spaces, is_whitespace_only};
use crate::validate::validate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

/// Deepest tag nesting accepted before parsing is abandoned.
pub const MAX_DEPTH: usize = 256;

const MARKER: char = '@';
const ESCAPE: char = '\\';
const BLOCK_OPEN: char = '{';
const BLOCK_CLOSE: char = '}';
const OPTIONS_OPEN: char = '(';
const OPTIONS_CLOSE: char = ')';

static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("tag name pattern is valid"));
static TAG_OPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([A-Za-z0-9_-]+)\s*:\s*"([^\n,"]*)"\s*$"#)
        .expect("tag option pattern is valid")
});

/// Parses a document and validates the resulting tree.
///
/// Syntax errors stop at the first problem; validation reports every
/// violation in the tree at once.
pub fn parse(source: &str) -> Result<Tag, ParseError> {
    let root = parse_tree(source)?;
    let errors = validate(&root);
    if !errors.is_empty() {
        debug!(count = errors.len(), "document failed validation");
        return Err(ValidationErrors(errors).into());
    }
    Ok(root)
}

/// Parses a document into its single root tag without validating it.
pub fn parse_tree(source: &str) -> Result<Tag, SyntaxError> {
    let mut parser = Parser::new(source);
    let mut roots = parser.parse_block(0)?;
    trace!(roots = roots.len(), bytes = source.len(), "parsed top level");
    match roots.len() {
        0 => Err(parser.error(E_ROOT_MISSING, "no root tag found")),
        1 => Ok(roots.remove(0)),
        _ => Err(parser.error(E_ROOT_MULTIPLE, "multiple root tags found")),
    }
}

struct Parser<'a> {
    cursor: Cursor<'a>,
}

/// Text collected between structural characters, flushed as one leaf.
#[derive(Default)]
struct PendingText {
    buf: String,
    start: Option<Position>,
}

impl PendingText {
    fn push(&mut self, ch: char, at: Position) {
        if self.start.is_none() {
            self.start = Some(at);
        }
        self.buf.push(ch);
    }

    fn flush_into(&mut self, children: &mut Vec<Tag>) {
        let start = self.start.take();
        if !is_whitespace_only(&self.buf) {
            if let Some(position) = start {
                children.push(Tag::text(compress_spaces(&self.buf), position));
            }
        }
        self.buf.clear();
    }
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    fn error(&self, code: &'static str, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(code, message, self.cursor.position())
    }

    fn end_of_content(&self) -> SyntaxError {
        self.error(E_UNEXPECTED_EOF, "unexpected end of content")
    }

    /// Parses siblings up to the closing brace of the current block, or to
    /// the end of input at depth zero.
    fn parse_block(&mut self, depth: usize) -> Result<Vec<Tag>, SyntaxError> {
        let mut children = Vec::new();
        let mut text = PendingText::default();

        while let Some(ch) = self.cursor.current() {
            let at = self.cursor.position();
            match ch {
                ESCAPE => match self.cursor.advance() {
                    Some('n') => {
                        text.push('\n', at);
                        self.cursor.advance();
                    }
                    Some('\n') => {
                        text.push(' ', at);
                        self.cursor.advance();
                    }
                    Some(escaped) => {
                        text.push(escaped, at);
                        self.cursor.advance();
                    }
                    None => {}
                },
                MARKER => {
                    text.flush_into(&mut children);
                    let tag = self.parse_tag(depth)?;
                    children.push(tag);
                }
                BLOCK_CLOSE => {
                    if depth == 0 {
                        return Err(self.error(E_UNEXPECTED_CLOSE, "unexpected closing brace"));
                    }
                    text.flush_into(&mut children);
                    self.cursor.advance();
                    return Ok(children);
                }
                '\n' => {
                    text.push(' ', at);
                    self.cursor.advance();
                }
                other => {
                    text.push(other, at);
                    self.cursor.advance();
                }
            }
        }

        if depth > 0 {
            return Err(self.end_of_content());
        }
        text.flush_into(&mut children);
        Ok(children)
    }

    /// Parses `@name(options) { ... }` with the cursor on the marker.
    fn parse_tag(&mut self, depth: usize) -> Result<Tag, SyntaxError> {
        let position = self.cursor.position();
        if depth >= MAX_DEPTH {
            return Err(SyntaxError::new(
                E_NESTING_DEPTH,
                format!("maximum nesting depth of {} exceeded", MAX_DEPTH),
                position,
            ));
        }

        self.cursor.advance();
        let start = self.cursor.offset();
        loop {
            match self.cursor.current() {
                None => return Err(self.end_of_content()),
                Some(BLOCK_OPEN | OPTIONS_OPEN) => break,
                Some(ch) if ch.is_whitespace() => break,
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        let name = self.cursor.slice(start, self.cursor.offset());
        if !TAG_NAME.is_match(name) {
            return Err(self.error(E_TAG_NAME, format!("invalid tag name `{}`", name)));
        }

        let options = match self.skip_whitespace_to(&[BLOCK_OPEN, OPTIONS_OPEN])? {
            OPTIONS_OPEN => {
                let options = self.parse_options()?;
                self.skip_whitespace_to(&[BLOCK_OPEN])?;
                options
            }
            _ => Options::new(),
        };
        self.cursor.advance();

        trace!(name, line = position.line, column = position.column, "open tag");
        let children = self.parse_block(depth + 1)?;
        Ok(Tag::container(name, options, children, position))
    }

    /// Skips whitespace until one of `stops` is current and returns it.
    fn skip_whitespace_to(&mut self, stops: &[char]) -> Result<char, SyntaxError> {
        loop {
            match self.cursor.current() {
                None => return Err(self.end_of_content()),
                Some(ch) if stops.contains(&ch) => return Ok(ch),
                Some(ch) if ch.is_whitespace() => {
                    self.cursor.advance();
                }
                Some(ch) => {
                    return Err(self.error(E_UNEXPECTED_TOKEN, format!("unexpected token `{}`", ch)));
                }
            }
        }
    }

    /// Parses `( key: "value", ... )` with the cursor on the opening paren,
    /// leaving it just past the closing one.
    fn parse_options(&mut self) -> Result<Options, SyntaxError> {
        self.cursor.advance();
        let start = self.cursor.offset();
        loop {
            match self.cursor.current() {
                None => return Err(self.end_of_content()),
                Some(OPTIONS_CLOSE) => break,
                Some(ch @ (BLOCK_OPEN | BLOCK_CLOSE | OPTIONS_OPEN | MARKER)) => {
                    return Err(self.error(E_UNEXPECTED_TOKEN, format!("unexpected token `{}`", ch)));
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }

        let raw = self.cursor.slice(start, self.cursor.offset());
        let mut options = Options::new();
        if !is_whitespace_only(raw) {
            for segment in raw.split(',') {
                let Some(captures) = TAG_OPTION.captures(segment) else {
                    return Err(self.error(
                        E_OPTION_SYNTAX,
                        format!("invalid tag option format `{}`", segment),
                    ));
                };
                let key = captures[1].to_string();
                let value = captures[2].to_string();
                if let Some(previous) = options.insert(key, value) {
                    debug!(key = &captures[1], previous = %previous, "duplicate tag option overwritten");
                }
            }
        }
        self.cursor.advance();
        Ok(options)
    }
}

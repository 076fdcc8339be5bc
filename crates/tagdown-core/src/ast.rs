use crate::position::Position;
use std::collections::BTreeMap;
use std::fmt;

pub type Options = BTreeMap<String, String>;

/// Name of the synthetic kind carried by text leaves.
pub const TEXT_KIND: &str = "text";

/// Kind every document root must have.
pub const DOCUMENT_KIND: &str = "main";

/// One node of the document tree: a named container or a text leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    pub name: String,
    pub options: Options,
    pub children: Vec<Tag>,
    // Only populated for text leaves.
    pub content: String,
    pub position: Position,
}

impl Tag {
    pub fn container(
        name: impl Into<String>,
        options: Options,
        children: Vec<Tag>,
        position: Position,
    ) -> Self {
        Self {
            name: name.into(),
            options,
            children,
            content: String::new(),
            position,
        }
    }

    pub fn text(content: impl Into<String>, position: Position) -> Self {
        Self {
            name: TEXT_KIND.to_string(),
            options: Options::new(),
            children: Vec::new(),
            content: content.into(),
            position,
        }
    }

    pub fn kind(&self) -> TagKind<'_> {
        TagKind::from_name(&self.name)
    }

    pub fn is_text(&self) -> bool {
        self.name == TEXT_KIND
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn option_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.option(key).unwrap_or(default)
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "    ".repeat(indent);
        if self.is_text() {
            return writeln!(f, "{}{:?}", pad, self.content);
        }
        write!(f, "{}@{}(", pad, self.name)?;
        for (idx, (key, value)) in self.options.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {:?}", key, value)?;
        }
        writeln!(f, ") {{")?;
        for child in &self.children {
            child.write_tree(f, indent + 1)?;
        }
        writeln!(f, "{}}}", pad)
    }
}

/// Indented dump of the tree, one node per line.
impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// The kinds the validator and the HTML emitter know about.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagKind<'a> {
    Main,
    Paragraph,
    Heading,
    List,
    Bold,
    Italic,
    Underlined,
    Block,
    Columns,
    Image,
    Link,
    Font,
    Text,
    Other(&'a str),
}

impl<'a> TagKind<'a> {
    pub fn from_name(name: &'a str) -> Self {
        match name {
            DOCUMENT_KIND => Self::Main,
            "paragraph" => Self::Paragraph,
            "heading" => Self::Heading,
            "list" => Self::List,
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underlined" => Self::Underlined,
            "block" => Self::Block,
            "columns" => Self::Columns,
            "image" => Self::Image,
            "link" => Self::Link,
            "font" => Self::Font,
            TEXT_KIND => Self::Text,
            other => Self::Other(other),
        }
    }
}

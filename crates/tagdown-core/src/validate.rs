use crate::ast::{Tag, TagKind};
use crate::diagnostic::{V_OPTION_REQUIRED, V_OPTION_VALUE, V_ROOT_KIND, ValidationError};
use tracing::trace;

const ALIGNMENTS: &[&str] = &["left", "right", "center"];
const HEADING_LEVELS: &[&str] = &["1", "2", "3", "4", "5"];
const LIST_STYLES: &[&str] = &["unordered", "ordered"];

/// Checks the root kind and the per-kind rules of every node.
///
/// The walk never stops early; an empty result means the tree is valid.
pub fn validate(root: &Tag) -> Vec<ValidationError> {
    let mut validator = Validator::default();
    if root.kind() != TagKind::Main {
        validator.report(root, V_ROOT_KIND, "root tag must be @main");
    }
    validator.visit(root);
    trace!(errors = validator.errors.len(), "validated tree");
    validator.errors
}

#[derive(Default)]
struct Validator {
    errors: Vec<ValidationError>,
}

impl Validator {
    fn report(&mut self, tag: &Tag, code: &'static str, message: impl Into<String>) {
        self.errors
            .push(ValidationError::new(code, message, tag.position));
    }

    fn visit(&mut self, tag: &Tag) {
        match tag.kind() {
            TagKind::Paragraph => self.check_alignment(tag),
            TagKind::Heading => {
                self.check_alignment(tag);
                self.check_enumerated(tag, "level", HEADING_LEVELS);
            }
            TagKind::List => self.check_enumerated(tag, "style", LIST_STYLES),
            TagKind::Image | TagKind::Link => self.check_required(tag, "uri"),
            TagKind::Main
            | TagKind::Bold
            | TagKind::Italic
            | TagKind::Underlined
            | TagKind::Block
            | TagKind::Columns
            | TagKind::Font
            | TagKind::Text
            | TagKind::Other(_) => {}
        }

        for child in &tag.children {
            self.visit(child);
        }
    }

    fn check_alignment(&mut self, tag: &Tag) {
        self.check_enumerated(tag, "alignment", ALIGNMENTS);
    }

    fn check_enumerated(&mut self, tag: &Tag, key: &str, allowed: &[&str]) {
        if let Some(value) = tag.option(key) {
            if !allowed.contains(&value) {
                self.report(
                    tag,
                    V_OPTION_VALUE,
                    format!("{} must be: {}", key, allowed.join(", ")),
                );
            }
        }
    }

    fn check_required(&mut self, tag: &Tag, key: &str) {
        if tag.option(key).is_none() {
            self.report(tag, V_OPTION_REQUIRED, format!("{} parameter is required", key));
        }
    }
}

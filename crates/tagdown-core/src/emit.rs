use crate::ast::{Tag, TagKind};
use ammonia::Builder;
use std::collections::{HashMap, HashSet};
use tracing::trace;

const LINE_BREAK: &str = "<br/>";

/// Emits the HTML fragment for an already validated tree.
///
/// Text is written verbatim apart from line breaks; use
/// [`render_sanitized`] for documents from untrusted authors.
pub fn render(root: &Tag) -> String {
    let mut writer = HtmlWriter::default();
    writer.tag(root);
    trace!(bytes = writer.out.len(), "rendered html");
    writer.out
}

/// Emits HTML and filters it through an allow-list of the markup the
/// templates produce, dropping anything injected through text content.
pub fn render_sanitized(root: &Tag) -> String {
    let raw_html = render(root);

    let tags: HashSet<&'static str> = [
        "a", "br", "div", "em", "img", "li", "ol", "p", "span", "strong", "u", "ul",
    ]
    .iter()
    .copied()
    .collect();

    let mut generic_attributes: HashSet<&'static str> = HashSet::new();
    generic_attributes.insert("class");

    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", ["href"].iter().copied().collect());
    tag_attributes.insert("img", ["src"].iter().copied().collect());
    tag_attributes.insert("span", ["style"].iter().copied().collect());

    Builder::new()
        .tags(tags)
        .generic_attributes(generic_attributes)
        .tag_attributes(tag_attributes)
        .clean(&raw_html)
        .to_string()
}

#[derive(Default)]
struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    fn tag(&mut self, tag: &Tag) {
        match tag.kind() {
            TagKind::Text => self.text(tag),
            TagKind::Main => self.wrapped(tag, "<div class=\"main-tag\">", "</div>"),
            TagKind::Paragraph => {
                let open = format!("<p class=\"text-{}\">", tag.option_or("alignment", "left"));
                self.wrapped(tag, &open, "</p>");
            }
            TagKind::Heading => {
                let open = format!(
                    "<p class=\"h{} text-{}\">",
                    tag.option_or("level", "1"),
                    tag.option_or("alignment", "left")
                );
                self.wrapped(tag, &open, "</p>");
            }
            TagKind::List => self.list(tag),
            TagKind::Bold => self.wrapped(tag, "<strong>", "</strong>"),
            TagKind::Italic => self.wrapped(tag, "<em>", "</em>"),
            TagKind::Underlined => self.wrapped(tag, "<u>", "</u>"),
            TagKind::Block => self.wrapped(tag, "<div>", "</div>"),
            TagKind::Columns => self.columns(tag),
            TagKind::Image => {
                self.out.push_str(&format!(
                    "<img src=\"{}\" class=\"rounded mx-auto d-block\" >",
                    tag.option_or("uri", "")
                ));
            }
            TagKind::Link => {
                let open = format!("<a href=\"{}\">", tag.option_or("uri", ""));
                self.wrapped(tag, &open, "</a>");
            }
            TagKind::Font => self.font(tag),
            TagKind::Other(_) => self.wrapped(tag, "<span>", "</span>"),
        }
    }

    fn children(&mut self, tag: &Tag) {
        for child in &tag.children {
            self.tag(child);
        }
    }

    fn wrapped(&mut self, tag: &Tag, open: &str, close: &str) {
        self.out.push_str(open);
        self.children(tag);
        self.out.push_str(close);
    }

    fn text(&mut self, tag: &Tag) {
        self.out.push_str(&tag.content.replace('\n', LINE_BREAK));
    }

    fn list(&mut self, tag: &Tag) {
        let (open, close) = match tag.option_or("style", "unordered") {
            "ordered" => ("<ol>", "</ol>"),
            _ => ("<ul>", "</ul>"),
        };
        self.out.push_str(open);
        for child in &tag.children {
            self.out.push_str("<li>");
            self.tag(child);
            self.out.push_str("</li>");
        }
        self.out.push_str(close);
    }

    fn columns(&mut self, tag: &Tag) {
        self.out.push_str("<div class=\"row\">");
        for child in &tag.children {
            self.out.push_str("<div class=\"col-sm\">");
            self.tag(child);
            self.out.push_str("</div>");
        }
        self.out.push_str("</div>");
    }

    fn font(&mut self, tag: &Tag) {
        let mut style = String::new();
        if let Some(size) = tag.option("size") {
            style.push_str(&format!("font-size: {}px; ", size));
        }
        if let Some(family) = tag.option("family") {
            style.push_str(&format!("font-family: {}; ", family));
        }
        if let Some(color) = tag.option("color") {
            style.push_str(&format!("color: {}; ", color));
        }
        let open = format!("<span style=\"{}\">", style);
        self.wrapped(tag, &open, "</span>");
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

const BASE_CSS: &str = include_str!("../assets/tagdown.css");

pub const BOOTSTRAP_CSS_URL: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@4.6.2/dist/css/bootstrap.min.css";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

/// Wraps compiled fragments into standalone HTML pages.
#[derive(Debug, Clone)]
pub struct Renderer {
    theme: Theme,
    title: Option<String>,
    stylesheet_links: Vec<String>,
    custom_vars: BTreeMap<String, String>,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            title: None,
            stylesheet_links: Vec::new(),
            custom_vars: BTreeMap::new(),
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_vars.insert(key.into(), value.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheet_links.push(href.into());
        self
    }

    /// Links the Bootstrap stylesheet whose class names the fragments use.
    pub fn with_bootstrap(self) -> Self {
        self.with_stylesheet(BOOTSTRAP_CSS_URL)
    }

    pub fn stylesheet(&self) -> String {
        let mut out = String::new();
        let (light_vars, dark_vars) = default_theme_vars();

        match self.theme {
            Theme::Auto => {
                out.push_str(&root_block(&light_vars, true));
                out.push_str("@media (prefers-color-scheme: dark) {\n");
                out.push_str(&indent_root_block(&dark_vars));
                out.push_str("}\n");
            }
            Theme::Light => out.push_str(&root_block(&light_vars, false)),
            Theme::Dark => out.push_str(&root_block(&dark_vars, false)),
        }

        if !self.custom_vars.is_empty() {
            out.push_str(&root_block(&self.custom_vars, false));
        }

        out.push_str(BASE_CSS);
        out
    }

    pub fn embed_html(&self, html: &str, with_inline_css: bool) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n");
        out.push_str("<html lang=\"en\">\n");
        out.push_str("<head>\n");
        out.push_str("  <meta charset=\"utf-8\" />\n");
        out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
        if let Some(title) = &self.title {
            out.push_str(&format!("  <title>{}</title>\n", escape_text(title)));
        }
        for href in &self.stylesheet_links {
            out.push_str(&format!("  <link rel=\"stylesheet\" href=\"{}\" />\n", href));
        }
        if with_inline_css {
            out.push_str("  <style>\n");
            out.push_str(&self.stylesheet());
            out.push_str("\n  </style>\n");
        }
        out.push_str("</head>\n");
        out.push_str("<body>\n");
        out.push_str(html);
        if !html.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("</body>\n");
        out.push_str("</html>\n");
        out
    }

    /// Writes the stylesheet next to pages that link it instead of inlining.
    pub fn generate_files(&self, out_dir: &Path) -> io::Result<()> {
        fs::create_dir_all(out_dir)?;
        fs::write(out_dir.join("tagdown.css"), self.stylesheet())
    }
}

fn default_theme_vars() -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let light = BTreeMap::from([
        ("--tagdown-bg".to_string(), "#ffffff".to_string()),
        ("--tagdown-fg".to_string(), "#212529".to_string()),
        ("--tagdown-accent".to_string(), "#0d6efd".to_string()),
    ]);

    let dark = BTreeMap::from([
        ("--tagdown-bg".to_string(), "#121417".to_string()),
        ("--tagdown-fg".to_string(), "#e6e8eb".to_string()),
        ("--tagdown-accent".to_string(), "#6ea8fe".to_string()),
    ]);

    (light, dark)
}

fn format_vars(vars: &BTreeMap<String, String>, indent: &str) -> String {
    let mut out = String::new();
    for (key, value) in vars {
        out.push_str(indent);
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push_str(";\n");
    }
    out
}

fn root_block(vars: &BTreeMap<String, String>, include_color_scheme: bool) -> String {
    let mut out = String::new();
    out.push_str(":root {\n");
    if include_color_scheme {
        out.push_str("  color-scheme: light dark;\n");
    }
    out.push_str(&format_vars(vars, "  "));
    out.push_str("}\n");
    out
}

fn indent_root_block(vars: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    out.push_str("  :root {\n");
    out.push_str(&format_vars(vars, "    "));
    out.push_str("  }\n");
    out
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{BOOTSTRAP_CSS_URL, Renderer, Theme};

    #[test]
    fn embed_html_includes_css() {
        let renderer = Renderer::new(Theme::Light);
        let html = renderer.embed_html("<div class=\"main-tag\">Hi</div>", true);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("--tagdown-bg: #ffffff;"));
        assert!(html.contains("<div class=\"main-tag\">Hi</div>\n</body>"));
    }

    #[test]
    fn embed_html_can_skip_assets() {
        let renderer = Renderer::new(Theme::Dark);
        let html = renderer.embed_html("<p>Hi</p>", false);
        assert!(!html.contains("<style>"));
        assert!(!html.contains("<link"));
        assert!(html.contains("<p>Hi</p>"));
    }

    #[test]
    fn auto_theme_has_dark_media_query() {
        let css = Renderer::new(Theme::Auto).stylesheet();
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains("    --tagdown-bg: #121417;"));
    }

    #[test]
    fn custom_vars_and_links() {
        let renderer = Renderer::new(Theme::Light)
            .with_var("--tagdown-accent", "rebeccapurple")
            .with_bootstrap()
            .with_title("Notes & <drafts>");
        let html = renderer.embed_html("", true);
        assert!(html.contains("--tagdown-accent: rebeccapurple;"));
        assert!(html.contains(BOOTSTRAP_CSS_URL));
        assert!(html.contains("<title>Notes &amp; &lt;drafts&gt;</title>"));
    }

    #[test]
    fn generate_files_writes_stylesheet() {
        let dir = std::env::temp_dir().join(format!("tagdown_assets_{}", std::process::id()));
        Renderer::new(Theme::Light)
            .generate_files(&dir)
            .expect("write assets");
        let css = std::fs::read_to_string(dir.join("tagdown.css")).expect("read css");
        assert!(css.contains(".main-tag"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

static NON_LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}]+").expect("non-letter pattern is valid"));

/// Collapses every run of whitespace other than line breaks to one space.
///
/// Line breaks only reach text content through the `\n` escape and are kept.
pub fn compress_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch != '\n' && ch.is_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
            continue;
        }
        in_run = false;
        out.push(ch);
    }
    out
}

pub fn is_whitespace_only(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Splits on runs of non-letter characters, dropping empty pieces.
pub fn split_words(text: &str) -> Vec<&str> {
    NON_LETTERS
        .split(text)
        .filter(|word| !word.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{compress_spaces, is_whitespace_only, split_words};

    #[test]
    fn compress_collapses_mixed_runs() {
        assert_eq!(compress_spaces("a  \t b"), "a b");
        assert_eq!(compress_spaces("\t\tlead"), " lead");
        assert_eq!(compress_spaces("one two"), "one two");
    }

    #[test]
    fn compress_keeps_line_breaks() {
        assert_eq!(compress_spaces("a \n  b"), "a \n b");
    }

    #[test]
    fn whitespace_only_detection() {
        assert!(is_whitespace_only(""));
        assert!(is_whitespace_only(" \t\n"));
        assert!(!is_whitespace_only("  x "));
    }

    #[test]
    fn split_words_on_non_letters() {
        assert_eq!(split_words("héllo, wörld-42 ok"), vec!["héllo", "wörld", "ok"]);
        assert!(split_words("123 !?").is_empty());
    }
}

//! Boundary-side text cleaning.
//!
//! The pipeline never calls this; the ops layer and CLI apply it when a
//! request asks for cleaning.

use regex::Regex;
use std::sync::OnceLock;

fn punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("static regex"))
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Lowercase, turn punctuation into spaces, collapse whitespace runs, trim.
pub fn clean_text(text: &str) -> String {
    let no_punct = punctuation().replace_all(text, " ");
    let collapsed = whitespace().replace_all(&no_punct, " ");
    collapsed.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_case() {
        assert_eq!(clean_text("Alpha, Beta; GAMMA!"), "alpha beta gamma");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean_text("  one\t\ttwo \n three  "), "one two three");
    }

    #[test]
    fn keeps_unicode_letters() {
        assert_eq!(clean_text("Größe: Äpfel"), "größe äpfel");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(clean_text("?!."), "");
    }
}

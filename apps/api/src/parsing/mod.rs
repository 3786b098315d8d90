//! Resume text → named sections → discrete claims.

pub mod claim_type;
pub mod document;
pub mod extractor;
pub mod rules;
pub mod segmenter;

use std::sync::LazyLock;

use regex::Regex;

pub use claim_type::{classify_claim_type, ClaimType};
pub use extractor::{extract_claims, ExtractedClaim};
pub use rules::{RuleSet, RulesError, SectionRules};
pub use segmenter::{segment, segment_with, Section, SectionKind, Sections};

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[•▪●◦‣]\s*|[-*]\s+|\d{1,2}[.)]\s+)").expect("valid regex")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid regex"));

/// Lowercase words allowed inside an otherwise title-cased line.
const TITLE_CONNECTORS: &[&str] = &["of", "and", "&", "the", "for", "at", "in", "to", "on", "/"];

pub(crate) fn starts_with_bullet(line: &str) -> bool {
    BULLET_RE.is_match(line)
}

pub(crate) fn strip_bullet(line: &str) -> &str {
    match BULLET_RE.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}

pub(crate) fn contains_year(text: &str) -> bool {
    YEAR_RE.is_match(text)
}

pub(crate) fn ends_with_terminal(text: &str) -> bool {
    text.trim_end().ends_with(['.', '!', '?'])
}

/// True if every word that starts with a letter is capitalized, apart from
/// short connectors.
pub(crate) fn is_title_case(text: &str) -> bool {
    let mut saw_word = false;
    for word in text.split_whitespace() {
        if TITLE_CONNECTORS.contains(&word.to_lowercase().as_str()) {
            continue;
        }
        match word.chars().find(|c| c.is_alphanumeric()) {
            Some(c) if c.is_lowercase() => return false,
            Some(_) => saw_word = true,
            None => {}
        }
    }
    saw_word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_markers() {
        for line in ["- Built it", "• Built it", "* Built it", "▪Built it", "1. Built it", "2) Built it"] {
            assert!(starts_with_bullet(line), "{line:?} should be a bullet");
            assert_eq!(strip_bullet(line), "Built it");
        }
        assert!(!starts_with_bullet("-5% churn"));
        assert!(!starts_with_bullet("Built it"));
    }

    #[test]
    fn test_title_case() {
        assert!(is_title_case("Senior Software Engineer"));
        assert!(is_title_case("Head of Platform"));
        assert!(!is_title_case("Responsible for backend maintenance"));
    }
}

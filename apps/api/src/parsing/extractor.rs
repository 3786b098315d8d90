//! Section text → individual claims.
//!
//! Bullets are the primary unit. Entry headers ("Engineer | Acme | 2021",
//! "Engineer @ Acme", short title-case lines) close the open bullet and are
//! dropped. Unbulleted prose is kept sentence by sentence when the sentence
//! ends in terminal punctuation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nlp::keywords::{extract_keywords, keyword_count};
use crate::nlp::vocabulary::{contains_action_verb, is_action_verb};
use crate::parsing::segmenter::{SectionKind, Sections, HEADER_SECTION};
use crate::parsing::{
    contains_year, ends_with_terminal, is_title_case, starts_with_bullet, strip_bullet,
};

/// Sections that hold no defensible claims.
const SKIPPED_SECTIONS: &[&str] = &[HEADER_SECTION, "skills", "education", "certifications"];

const MIN_CLAIM_CHARS: usize = 10;
const RESPLIT_BELOW_WORDS: usize = 6;
const MAX_TITLE_WORDS: usize = 6;
const MAX_FRAGMENT_WORDS: usize = 4;

static YEAR_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\(?\s*(?:[a-z]{3,9}\.?\s+)?(?:19|20)\d{2}\s*(?:-|–|—|to)\s*(?:(?:[a-z]{3,9}\.?\s+)?(?:19|20)\d{2}|present|current|now)\s*\)?$",
    )
    .expect("valid regex")
});

static AT_COMPANY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bat\b").expect("valid regex"));

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedClaim {
    pub text: String,
    pub section: String,
}

impl ExtractedClaim {
    pub fn new(text: impl Into<String>, section: impl Into<String>) -> Self {
        ExtractedClaim {
            text: text.into(),
            section: section.into(),
        }
    }
}

/// Splits after runs of `.`, `!` or `?` followed by whitespace, keeping the
/// punctuation with its sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END_RE.find_iter(text) {
        let end = m.start() + m.as_str().trim_end().len();
        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = m.end();
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

fn starts_with_verb(text: &str) -> bool {
    match text.split_whitespace().next() {
        Some(first) => {
            let word = first.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            is_action_verb(&word) || (word.len() > 3 && word.ends_with("ed"))
        }
        None => false,
    }
}

fn has_claim_verb(text: &str) -> bool {
    contains_action_verb(text) || starts_with_verb(text)
}

/// Role and company lines that sit above a block of bullets.
fn is_entry_header(line: &str) -> bool {
    if ends_with_terminal(line) || starts_with_verb(line) {
        return false;
    }
    let words = line.split_whitespace().count();
    line.contains('|')
        || (line.contains(" @ ") && words <= 12)
        || (AT_COMPANY_RE.is_match(line) && contains_year(line))
        || (contains_year(line) && !contains_action_verb(line) && words <= 12)
        || (words <= MAX_TITLE_WORDS && is_title_case(line))
}

/// Role headers and title fragments that slipped through grouping.
pub fn is_noise_claim(text: &str) -> bool {
    let has_separator = text.contains(['|', '–', '—', ',']) || text.contains(" - ");
    if contains_year(text) && has_separator && !has_claim_verb(text) {
        return true;
    }
    let words = text.split_whitespace().count();
    words <= MAX_FRAGMENT_WORDS
        && !has_claim_verb(text)
        && !ends_with_terminal(text)
        && is_title_case(text)
}

/// Section names built from technology names ("rust_axum_tokio",
/// "python_docker_aws") are project entries mistaken for headings.
fn remap_section_name(name: &str) -> String {
    let readable = name.replace('_', " ");
    let keywords = keyword_count(&extract_keywords(&readable));
    if keywords == 0 {
        return name.to_string();
    }
    let words = readable.split_whitespace().count();
    if words <= 5 && keywords * 2 >= words {
        "projects".to_string()
    } else {
        name.to_string()
    }
}

#[derive(Default)]
struct Grouper {
    open_bullet: Option<String>,
    paragraph: Vec<String>,
    claims: Vec<String>,
}

impl Grouper {
    fn close_bullet(&mut self) {
        if let Some(bullet) = self.open_bullet.take() {
            self.claims.push(bullet);
        }
    }

    fn close_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let joined = self.paragraph.join(" ");
        self.paragraph.clear();
        self.claims.extend(
            split_sentences(&joined)
                .into_iter()
                .filter(|s| ends_with_terminal(s)),
        );
    }

    fn close_all(&mut self) {
        self.close_bullet();
        self.close_paragraph();
    }

    fn push_line(&mut self, line: &str) {
        if line.is_empty() {
            self.close_all();
        } else if starts_with_bullet(line) {
            self.close_all();
            self.open_bullet = Some(strip_bullet(line).to_string());
        } else if is_entry_header(line) {
            self.close_all();
        } else if let Some(bullet) = self.open_bullet.as_mut() {
            bullet.push(' ');
            bullet.push_str(line);
        } else {
            self.paragraph.push(line.to_string());
        }
    }
}

fn clean(text: &str) -> Option<String> {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() < MIN_CLAIM_CHARS || YEAR_RANGE_RE.is_match(&text) {
        return None;
    }
    Some(text)
}

/// Extracts claims from every claim-bearing section, in document order.
pub fn extract_claims(sections: &Sections) -> Vec<ExtractedClaim> {
    let mut extracted = Vec::new();

    for (name, section) in sections {
        if SKIPPED_SECTIONS.contains(&name.as_str()) || section.kind == SectionKind::SkillsList {
            continue;
        }

        let mut grouper = Grouper::default();
        for line in &section.lines {
            grouper.push_line(line);
        }
        grouper.close_all();

        let section_name = remap_section_name(name);
        for claim in grouper.claims {
            let pieces = if claim.split_whitespace().count() < RESPLIT_BELOW_WORDS {
                split_sentences(&claim)
            } else {
                vec![claim]
            };
            for piece in pieces {
                if let Some(text) = clean(&piece) {
                    if !is_noise_claim(&text) {
                        extracted.push(ExtractedClaim::new(text, section_name.clone()));
                    }
                }
            }
        }
    }

    debug!(count = extracted.len(), "extracted claims");
    extracted
}

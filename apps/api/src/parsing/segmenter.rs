use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nlp::vocabulary::contains_action_verb;
use crate::parsing::rules::SectionRules;
use crate::parsing::{ends_with_terminal, starts_with_bullet, strip_bullet};

pub const HEADER_SECTION: &str = "header";
pub const FULL_TEXT_SECTION: &str = "full_text";

/// Sections whose content is a list of skills rather than prose.
const LIST_SECTIONS: &[&str] = &["skills", "languages", "interests"];

static PERSON_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-zA-Z'.-]+\s+[A-Z][a-zA-Z'.-]+$").expect("valid regex")
});

static GRADE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:c?gpa|grade|percentage)\b").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Paragraph,
    SkillsList,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    /// Non-empty lines joined with `\n`.
    pub text: String,
    pub kind: SectionKind,
    /// Trimmed lines in order, blank separators kept as `""`.
    #[serde(skip)]
    pub lines: Vec<String>,
}

impl Section {
    fn from_lines(name: String, lines: Vec<String>) -> Self {
        let content: Vec<&str> = lines
            .iter()
            .map(String::as_str)
            .filter(|l| !l.is_empty())
            .collect();
        let kind = classify_kind(&name, &content);
        Section {
            text: content.join("\n"),
            name,
            kind,
            lines,
        }
    }

    pub fn has_content(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Sections in document order, keyed by normalized name.
pub type Sections = IndexMap<String, Section>;

fn is_list_like(line: &str) -> bool {
    let line = strip_bullet(line);
    let commas = line.matches(',').count();
    let pipes = line.matches(['|', '·']).count();
    !contains_action_verb(line)
        && !ends_with_terminal(line)
        && (commas >= 2 || pipes >= 2 || (line.contains(':') && commas >= 1))
}

fn classify_kind(name: &str, content: &[&str]) -> SectionKind {
    if LIST_SECTIONS.contains(&name) {
        return SectionKind::SkillsList;
    }
    let list_like = content.iter().filter(|l| is_list_like(l)).count();
    if !content.is_empty() && list_like * 2 >= content.len() {
        SectionKind::SkillsList
    } else {
        SectionKind::Paragraph
    }
}

fn has_entry_separator(line: &str) -> bool {
    line.contains(['|', '@', '–', '—', ','])
        || line.contains(" - ")
        || line.chars().any(|c| c.is_ascii_digit())
}

/// "PYTHON, DOCKER, AWS": a comma list of short items. Project blocks are
/// sometimes headed this way.
fn is_tech_list_heading(line: &str) -> bool {
    if !line.contains(',') || line.contains(['|', '@', '–', '—']) || line.contains(" - ") {
        return false;
    }
    let items: Vec<&str> = line.split(',').map(str::trim).collect();
    items.len() >= 2
        && items
            .iter()
            .all(|item| !item.is_empty() && item.split_whitespace().count() <= 3)
}

/// A line not in the rule table can still be a heading when it looks like
/// one and the block below it is a bullet list.
fn is_unknown_heading(
    line: &str,
    next_non_empty: Option<&str>,
    in_section: bool,
    rules: &SectionRules,
) -> bool {
    let has_colon = line.ends_with(':');
    let bare = line.trim_end_matches(':').trim();

    if bare.is_empty()
        || bare.chars().count() > rules.max_heading_len()
        || !bare.chars().any(char::is_alphabetic)
        || starts_with_bullet(line)
        || (has_entry_separator(bare) && !is_tech_list_heading(bare))
        || ends_with_terminal(bare)
        || GRADE_RE.is_match(bare)
    {
        return false;
    }
    if !has_colon && PERSON_NAME_RE.is_match(bare) {
        return false;
    }
    // Inside a section a mixed-case line above bullets is usually a job or
    // project title, so only shouted or colon-terminated lines open a new one.
    let is_upper = bare.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase);
    if in_section && !has_colon && !is_upper {
        return false;
    }

    next_non_empty.is_some_and(starts_with_bullet)
}

/// Splits resume text into named sections using the built-in rules.
pub fn segment(text: &str) -> Sections {
    segment_with(text, SectionRules::builtin())
}

/// Splits resume text into named sections.
///
/// Never fails and never returns an empty map: text without any detectable
/// heading comes back as a single `full_text` section.
pub fn segment_with(text: &str, rules: &SectionRules) -> Sections {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut buckets: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut current = HEADER_SECTION.to_string();

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            buckets.entry(current.clone()).or_default().push(String::new());
            continue;
        }
        if rules.is_contact_line(line) {
            continue;
        }

        let heading = match rules.match_heading(line) {
            Some(section) => Some(section.to_string()),
            None => {
                let next = lines[i + 1..].iter().copied().find(|l| !l.is_empty());
                let in_section = current != HEADER_SECTION;
                is_unknown_heading(line, next, in_section, rules).then(|| rules.normalize_name(line))
            }
        };

        match heading {
            Some(name) => {
                let bucket = buckets.entry(name.clone()).or_default();
                // Repeated heading: keep the earlier block separate.
                if bucket.iter().any(|l| !l.is_empty()) {
                    bucket.push(String::new());
                }
                current = name;
            }
            None => buckets.entry(current.clone()).or_default().push(line.to_string()),
        }
    }

    let mut sections: Sections = buckets
        .into_iter()
        .map(|(name, lines)| (name.clone(), Section::from_lines(name, lines)))
        .filter(|(_, section)| section.has_content())
        .collect();

    if !sections.keys().any(|name| name != HEADER_SECTION) {
        let lines = sections
            .shift_remove(HEADER_SECTION)
            .map(|s| s.lines)
            .unwrap_or_default();
        sections.clear();
        sections.insert(
            FULL_TEXT_SECTION.to_string(),
            Section::from_lines(FULL_TEXT_SECTION.to_string(), lines),
        );
    }

    debug!(
        sections = ?sections.keys().collect::<Vec<_>>(),
        "segmented resume text"
    );
    sections
}

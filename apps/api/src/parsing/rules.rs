//! Section heading rules.
//!
//! The rule table is plain data (`RuleSet`), serializable to JSON so a
//! deployment can swap in its own headings and synonyms. `SectionRules` is
//! the compiled form used by the segmenter. Heading rules are tried in order
//! and the first match wins; the same holds for synonyms.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read section rules from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid section rules JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("section rules must define at least one heading")]
    NoHeadings,
}

/// A canonical heading. `pattern` is a case-insensitive alternation that must
/// cover the whole line (an optional trailing colon is allowed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingRule {
    pub section: String,
    pub pattern: String,
}

/// Maps an unrecognized heading to a canonical section when its lowercase
/// text contains `contains`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymRule {
    pub contains: String,
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub headings: Vec<HeadingRule>,
    #[serde(default)]
    pub synonyms: Vec<SynonymRule>,
    #[serde(default = "default_contact_patterns")]
    pub contact_patterns: Vec<String>,
    #[serde(default = "default_max_heading_len")]
    pub max_heading_len: usize,
    /// Lines longer than this are never treated as contact info, even if they
    /// mention a URL or email.
    #[serde(default = "default_contact_max_words")]
    pub contact_max_words: usize,
}

const DEFAULT_HEADINGS: &[(&str, &str)] = &[
    ("summary", r"summary|professional\s+summary|profile|professional\s+profile|objective|career\s+objective|about\s*me"),
    ("experience", r"experience|work\s+experience|professional\s+experience|relevant\s+experience|employment(?:\s+history)?|work\s+history|career\s+history"),
    ("education", r"education|academic\s+background|academics?|qualifications|education\s*(?:&|and)\s*training"),
    ("skills", r"skills|technical\s+skills|core\s+competencies|competencies|technologies|tech\s+stack|skills\s*(?:&|and)\s*tools"),
    ("projects", r"projects|personal\s+projects|key\s+projects|side\s+projects|academic\s+projects"),
    ("certifications", r"certifications?|licenses?(?:\s*(?:&|and)\s*certifications?)?"),
    ("achievements", r"achievements?|accomplishments?|awards?(?:\s*(?:&|and)\s*honors)?|honors"),
    ("publications", r"publications?|research"),
    ("volunteer", r"volunteer(?:ing)?(?:\s+experience)?|community(?:\s+involvement)?|extracurricular(?:\s+activities)?"),
    ("interests", r"interests?|hobbies"),
    ("references", r"references?"),
    ("languages", r"languages?"),
];

/// Order matters: "volunteer experience" must resolve before "experience".
const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    ("project", "projects"),
    ("volunteer", "volunteer"),
    ("experience", "experience"),
    ("employment", "experience"),
    ("work history", "experience"),
    ("academic", "education"),
    ("education", "education"),
    ("competenc", "skills"),
    ("skill", "skills"),
    ("technolog", "skills"),
    ("certif", "certifications"),
    ("award", "achievements"),
    ("achievement", "achievements"),
    ("accomplish", "achievements"),
    ("publication", "publications"),
    ("summary", "summary"),
    ("profile", "summary"),
    ("objective", "summary"),
];

fn default_contact_patterns() -> Vec<String> {
    vec![
        r"[\w.+-]+@[\w-]+\.[\w.-]+".to_string(),
        r"(?:\+?\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]\d{4}".to_string(),
        r"(?i)linkedin\.com|github\.com|https?://|www\.".to_string(),
    ]
}

fn default_max_heading_len() -> usize {
    40
}

fn default_contact_max_words() -> usize {
    8
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            headings: DEFAULT_HEADINGS
                .iter()
                .map(|(section, pattern)| HeadingRule {
                    section: section.to_string(),
                    pattern: pattern.to_string(),
                })
                .collect(),
            synonyms: DEFAULT_SYNONYMS
                .iter()
                .map(|(contains, section)| SynonymRule {
                    contains: contains.to_string(),
                    section: section.to_string(),
                })
                .collect(),
            contact_patterns: default_contact_patterns(),
            max_heading_len: default_max_heading_len(),
            contact_max_words: default_contact_max_words(),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, RulesError> {
    Regex::new(pattern).map_err(|source| RulesError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct SectionRules {
    headings: Vec<(Regex, String)>,
    synonyms: Vec<SynonymRule>,
    contact: Vec<Regex>,
    max_heading_len: usize,
    contact_max_words: usize,
}

static BUILTIN: LazyLock<SectionRules> = LazyLock::new(|| {
    SectionRules::compile(&RuleSet::default()).expect("built-in section rules compile")
});

impl SectionRules {
    pub fn compile(set: &RuleSet) -> Result<Self, RulesError> {
        if set.headings.is_empty() {
            return Err(RulesError::NoHeadings);
        }

        let headings = set
            .headings
            .iter()
            .map(|rule| {
                let anchored = format!(r"(?i)^(?:{})\s*:?$", rule.pattern);
                Ok((compile(&anchored)?, rule.section.clone()))
            })
            .collect::<Result<Vec<_>, RulesError>>()?;

        let contact = set
            .contact_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, RulesError>>()?;

        let synonyms = set
            .synonyms
            .iter()
            .map(|s| SynonymRule {
                contains: s.contains.to_lowercase(),
                section: s.section.clone(),
            })
            .collect();

        Ok(SectionRules {
            headings,
            synonyms,
            contact,
            max_heading_len: set.max_heading_len,
            contact_max_words: set.contact_max_words,
        })
    }

    /// The default rule table, compiled once.
    pub fn builtin() -> &'static SectionRules {
        &BUILTIN
    }

    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let set: RuleSet = serde_json::from_str(json)?;
        Self::compile(&set)
    }

    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let json = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn max_heading_len(&self) -> usize {
        self.max_heading_len
    }

    /// Canonical section for a line that is exactly a known heading.
    pub fn match_heading(&self, line: &str) -> Option<&str> {
        let line = line.trim();
        self.headings
            .iter()
            .find(|(re, _)| re.is_match(line))
            .map(|(_, section)| section.as_str())
    }

    /// Normalizes an unrecognized heading: lowercase, collapsed whitespace,
    /// trailing colon removed, then the first matching synonym, else an
    /// underscore slug.
    pub fn normalize_name(&self, raw: &str) -> String {
        let lower = raw
            .trim()
            .trim_end_matches(':')
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if let Some(rule) = self.synonyms.iter().find(|s| lower.contains(&s.contains)) {
            return rule.section.clone();
        }

        let slug: String = lower
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let slug = slug
            .split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        if slug.is_empty() {
            "section".to_string()
        } else {
            slug
        }
    }

    pub fn is_contact_line(&self, line: &str) -> bool {
        line.split_whitespace().count() <= self.contact_max_words
            && self.contact.iter().any(|re| re.is_match(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_matches_canonical_headings() {
        let rules = SectionRules::builtin();
        assert_eq!(rules.match_heading("EXPERIENCE"), Some("experience"));
        assert_eq!(rules.match_heading("Work Experience:"), Some("experience"));
        assert_eq!(rules.match_heading("Technical Skills"), Some("skills"));
        assert_eq!(rules.match_heading("Volunteer Experience"), Some("volunteer"));
        assert_eq!(rules.match_heading("Certification"), Some("certifications"));
    }

    #[test]
    fn test_headings_are_anchored_to_the_whole_line() {
        let rules = SectionRules::builtin();
        assert_eq!(rules.match_heading("Experience building payment systems"), None);
        assert_eq!(rules.match_heading("Skills in leadership"), None);
    }

    #[test]
    fn test_synonyms_then_slug() {
        let rules = SectionRules::builtin();
        assert_eq!(rules.normalize_name("Leadership Experience:"), "experience");
        assert_eq!(rules.normalize_name("Open-Source   Work"), "open_source_work");
        assert_eq!(rules.normalize_name("Volunteer Experience"), "volunteer");
    }

    #[test]
    fn test_contact_lines() {
        let rules = SectionRules::builtin();
        assert!(rules.is_contact_line("jane.doe@example.com | (555) 123-4567"));
        assert!(rules.is_contact_line("linkedin.com/in/janedoe"));
        assert!(rules.is_contact_line("+1 555-123-4567"));
        assert!(!rules.is_contact_line("Built a payment system processing 10,000 requests per second"));
        assert!(!rules.is_contact_line(
            "Published an open source parser on github.com that gained 2,000 stars in a year"
        ));
    }

    #[test]
    fn test_json_override() {
        let json = r#"{
            "headings": [{ "section": "experience", "pattern": "career" }],
            "synonyms": [{ "contains": "gig", "section": "experience" }]
        }"#;
        let rules = SectionRules::from_json(json).unwrap();
        assert_eq!(rules.match_heading("Career:"), Some("experience"));
        assert_eq!(rules.match_heading("Experience"), None);
        assert_eq!(rules.normalize_name("Gig Work"), "experience");
        assert_eq!(rules.max_heading_len(), 40);
    }

    #[test]
    fn test_invalid_rules_are_errors() {
        assert!(matches!(
            SectionRules::from_json(r#"{"headings": []}"#),
            Err(RulesError::NoHeadings)
        ));
        assert!(matches!(
            SectionRules::from_json(r#"{"headings": [{"section": "x", "pattern": "("}]}"#),
            Err(RulesError::Pattern { .. })
        ));
        assert!(matches!(SectionRules::from_json("not json"), Err(RulesError::Parse(_))));
    }

    #[test]
    fn test_default_rule_set_round_trips_through_json() {
        let json = serde_json::to_string(&RuleSet::default()).unwrap();
        let parsed: RuleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, RuleSet::default());
    }
}

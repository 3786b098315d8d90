use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Languages,
    Frameworks,
    Databases,
    CloudDevops,
    Concepts,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 5] = [
        KeywordCategory::Languages,
        KeywordCategory::Frameworks,
        KeywordCategory::Databases,
        KeywordCategory::CloudDevops,
        KeywordCategory::Concepts,
    ];

    pub fn terms(self) -> &'static [&'static str] {
        match self {
            KeywordCategory::Languages => LANGUAGES,
            KeywordCategory::Frameworks => FRAMEWORKS,
            KeywordCategory::Databases => DATABASES,
            KeywordCategory::CloudDevops => CLOUD_DEVOPS,
            KeywordCategory::Concepts => CONCEPTS,
        }
    }
}

/// Category → sorted, de-duplicated canonical terms. Categories with no hits
/// are absent.
pub type KeywordMap = BTreeMap<KeywordCategory, Vec<String>>;

const LANGUAGES: &[&str] = &[
    "python", "java", "javascript", "typescript", "c++", "c#", "go", "rust", "swift", "kotlin",
    "ruby", "php", "sql", "html", "css", "bash", "shell",
];

const FRAMEWORKS: &[&str] = &[
    "fastapi", "django", "flask", "react", "vue", "angular", "spring", "spring boot", "express",
    "next.js", "node.js", "pytorch", "tensorflow", "scikit-learn", "pandas", "numpy",
    "hibernate", ".net", "dotnet",
];

const DATABASES: &[&str] = &[
    "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "dynamodb", "oracle",
    "sql server", "cassandra", "sqlite", "firebase",
];

const CLOUD_DEVOPS: &[&str] = &[
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "jenkins", "gitlab ci",
    "github actions", "circleci", "prometheus", "grafana", "linux",
];

const CONCEPTS: &[&str] = &[
    "ci/cd", "rest api", "graphql", "microservices", "machine learning", "distributed systems",
    "agile", "scrum", "tdd", "unit testing", "system design", "cloud computing",
];

/// Spelling variants rewritten to their canonical term before matching.
/// Applied in order; longer variants precede their prefixes.
const ALIASES: &[(&str, &str)] = &[
    ("ml", "machine learning"),
    ("restful api", "rest api"),
    ("rest apis", "rest api"),
    ("rest services", "rest api"),
    ("k8s", "kubernetes"),
    ("postgres", "postgresql"),
    ("psql", "postgresql"),
    ("nodejs", "node.js"),
    ("dockerized", "docker"),
    ("containerized", "docker"),
    ("ci cd", "ci/cd"),
];

static ALIAS_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ALIASES
        .iter()
        .map(|(alias, canonical)| {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(alias))).expect("valid regex");
            (re, *canonical)
        })
        .collect()
});

/// Lowercases `text` and rewrites aliases to canonical terms, matching whole
/// words only so `html` is never touched by the `ml` alias.
pub fn normalize_aliases(text: &str) -> String {
    let mut normalized = text.to_lowercase();
    for (re, canonical) in ALIAS_PATTERNS.iter() {
        if re.is_match(&normalized) {
            normalized = re.replace_all(&normalized, *canonical).into_owned();
        }
    }
    normalized
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True if `term` occurs in `haystack` with no word character touching
/// either end. Works for terms that begin or end in punctuation (`c++`,
/// `.net`, `node.js`), where a regex `\b` would not.
fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Extracts canonical technology keywords from free text, grouped by
/// category.
pub fn extract_keywords(text: &str) -> KeywordMap {
    let normalized = normalize_aliases(text);
    let mut found = KeywordMap::new();

    for category in KeywordCategory::ALL {
        let mut hits: Vec<String> = category
            .terms()
            .iter()
            .filter(|term| contains_term(&normalized, term))
            .map(|term| term.to_string())
            .collect();
        if !hits.is_empty() {
            hits.sort();
            hits.dedup();
            found.insert(category, hits);
        }
    }

    found
}

/// All terms of a keyword map as one set.
pub fn flatten(keywords: &KeywordMap) -> BTreeSet<String> {
    keywords.values().flatten().cloned().collect()
}

pub fn keyword_count(keywords: &KeywordMap) -> usize {
    keywords.values().map(Vec::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(map: &KeywordMap, category: KeywordCategory) -> Vec<String> {
        map.get(&category).cloned().unwrap_or_default()
    }

    #[test]
    fn test_extracts_by_category_sorted() {
        let kw = extract_keywords("Built services in Rust and Python on AWS with PostgreSQL");
        assert_eq!(terms(&kw, KeywordCategory::Languages), vec!["python", "rust"]);
        assert_eq!(terms(&kw, KeywordCategory::CloudDevops), vec!["aws"]);
        assert_eq!(terms(&kw, KeywordCategory::Databases), vec!["postgresql"]);
        assert!(!kw.contains_key(&KeywordCategory::Concepts));
    }

    #[test]
    fn test_java_does_not_match_javascript() {
        let kw = extract_keywords("Wrote the dashboard in JavaScript");
        assert_eq!(terms(&kw, KeywordCategory::Languages), vec!["javascript"]);
    }

    #[test]
    fn test_punctuated_terms_match() {
        let kw = extract_keywords("Ported a C++ engine to .NET and Node.js.");
        assert_eq!(terms(&kw, KeywordCategory::Languages), vec!["c++"]);
        assert_eq!(terms(&kw, KeywordCategory::Frameworks), vec![".net", "node.js"]);
    }

    #[test]
    fn test_aliases_normalize_to_canonical_terms() {
        let kw = extract_keywords("Deployed ML models on k8s backed by Postgres");
        assert_eq!(terms(&kw, KeywordCategory::CloudDevops), vec!["kubernetes"]);
        assert_eq!(terms(&kw, KeywordCategory::Databases), vec!["postgresql"]);
        assert_eq!(terms(&kw, KeywordCategory::Concepts), vec!["machine learning"]);
    }

    #[test]
    fn test_alias_respects_word_boundaries() {
        let kw = extract_keywords("Styled pages with HTML and CSS");
        assert_eq!(terms(&kw, KeywordCategory::Languages), vec!["css", "html"]);
        assert!(!kw.contains_key(&KeywordCategory::Concepts), "html must not become machine learning");
    }

    #[test]
    fn test_no_keywords_yields_empty_map() {
        let kw = extract_keywords("Responsible for backend maintenance");
        assert!(kw.is_empty());
        assert_eq!(keyword_count(&kw), 0);
    }
}

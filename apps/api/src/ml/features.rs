//! Fixed-schema feature vector for a single claim.
//!
//! 41 features in five groups, each group a typed struct. The flat order in
//! [`FEATURE_NAMES`] is the column order every trained model was fitted on;
//! bump [`FEATURE_SCHEMA_VERSION`] whenever a name, order or definition
//! changes.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::nlp::clarity::score_clarity;
use crate::nlp::keywords::{extract_keywords, keyword_count, KeywordCategory};
use crate::nlp::tokenizer::count_tokens;
use crate::nlp::vocabulary::{has_weak_language, is_clarity_verb, COMPARISON_WORDS};
use crate::parsing::ExtractedClaim;
use crate::util::round_to;

pub const FEATURE_SCHEMA_VERSION: u32 = 1;
pub const FEATURE_COUNT: usize = 41;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    // textual
    "txt_char_count",
    "txt_word_count",
    "txt_avg_word_length",
    "txt_sentence_count",
    "txt_words_per_sentence",
    "txt_uppercase_ratio",
    "txt_punctuation_count",
    "txt_starts_with_verb",
    "txt_ends_with_period",
    "txt_has_parentheses",
    // quantitative
    "quant_number_count",
    "quant_has_percentage",
    "quant_has_dollar",
    "quant_has_multiplier",
    "quant_verb_count",
    "quant_first_word_is_verb",
    "quant_has_weak_language",
    "quant_metric_density",
    // structural
    "struct_has_bullet",
    "struct_comma_count",
    "struct_has_list_structure",
    "struct_and_count",
    "struct_clause_count",
    "struct_has_comparison",
    "struct_is_experience",
    "struct_is_project",
    "struct_is_summary",
    "struct_is_education",
    "struct_is_skills",
    // semantic
    "sem_num_keywords",
    "sem_has_language",
    "sem_has_framework",
    "sem_has_database",
    "sem_has_cloud",
    "sem_has_concept",
    "sem_tech_breadth",
    "sem_token_count",
    // clarity
    "clarity_score",
    "clarity_has_action_verb",
    "clarity_has_metrics",
    "clarity_word_count",
];

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));
static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+%").expect("valid regex"));
static DOLLAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$[\d,]+").expect("valid regex"));
static MULTIPLIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+x").expect("valid regex"));
static SENTENCE_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextualFeatures {
    #[serde(rename = "txt_char_count")]
    pub char_count: usize,
    #[serde(rename = "txt_word_count")]
    pub word_count: usize,
    #[serde(rename = "txt_avg_word_length")]
    pub avg_word_length: f64,
    #[serde(rename = "txt_sentence_count")]
    pub sentence_count: usize,
    #[serde(rename = "txt_words_per_sentence")]
    pub words_per_sentence: f64,
    #[serde(rename = "txt_uppercase_ratio")]
    pub uppercase_ratio: f64,
    #[serde(rename = "txt_punctuation_count")]
    pub punctuation_count: usize,
    #[serde(rename = "txt_starts_with_verb")]
    pub starts_with_verb: bool,
    #[serde(rename = "txt_ends_with_period")]
    pub ends_with_period: bool,
    #[serde(rename = "txt_has_parentheses")]
    pub has_parentheses: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuantitativeFeatures {
    #[serde(rename = "quant_number_count")]
    pub number_count: usize,
    #[serde(rename = "quant_has_percentage")]
    pub has_percentage: bool,
    #[serde(rename = "quant_has_dollar")]
    pub has_dollar: bool,
    #[serde(rename = "quant_has_multiplier")]
    pub has_multiplier: bool,
    #[serde(rename = "quant_verb_count")]
    pub verb_count: usize,
    #[serde(rename = "quant_first_word_is_verb")]
    pub first_word_is_verb: bool,
    #[serde(rename = "quant_has_weak_language")]
    pub has_weak_language: bool,
    #[serde(rename = "quant_metric_density")]
    pub metric_density: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuralFeatures {
    #[serde(rename = "struct_has_bullet")]
    pub has_bullet: bool,
    #[serde(rename = "struct_comma_count")]
    pub comma_count: usize,
    #[serde(rename = "struct_has_list_structure")]
    pub has_list_structure: bool,
    #[serde(rename = "struct_and_count")]
    pub and_count: usize,
    #[serde(rename = "struct_clause_count")]
    pub clause_count: usize,
    #[serde(rename = "struct_has_comparison")]
    pub has_comparison: bool,
    #[serde(rename = "struct_is_experience")]
    pub is_experience: bool,
    #[serde(rename = "struct_is_project")]
    pub is_project: bool,
    #[serde(rename = "struct_is_summary")]
    pub is_summary: bool,
    #[serde(rename = "struct_is_education")]
    pub is_education: bool,
    #[serde(rename = "struct_is_skills")]
    pub is_skills: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SemanticFeatures {
    #[serde(rename = "sem_num_keywords")]
    pub num_keywords: usize,
    #[serde(rename = "sem_has_language")]
    pub has_language: bool,
    #[serde(rename = "sem_has_framework")]
    pub has_framework: bool,
    #[serde(rename = "sem_has_database")]
    pub has_database: bool,
    #[serde(rename = "sem_has_cloud")]
    pub has_cloud: bool,
    #[serde(rename = "sem_has_concept")]
    pub has_concept: bool,
    #[serde(rename = "sem_tech_breadth")]
    pub tech_breadth: usize,
    #[serde(rename = "sem_token_count")]
    pub token_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClarityFeatures {
    #[serde(rename = "clarity_score")]
    pub score: f64,
    #[serde(rename = "clarity_has_action_verb")]
    pub has_action_verb: bool,
    #[serde(rename = "clarity_has_metrics")]
    pub has_metrics: bool,
    #[serde(rename = "clarity_word_count")]
    pub word_count: usize,
}

/// Serializes flat, with the prefixed names of [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(flatten)]
    pub textual: TextualFeatures,
    #[serde(flatten)]
    pub quantitative: QuantitativeFeatures,
    #[serde(flatten)]
    pub structural: StructuralFeatures,
    #[serde(flatten)]
    pub semantic: SemanticFeatures,
    #[serde(flatten)]
    pub clarity: ClarityFeatures,
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl FeatureVector {
    /// Values in [`FEATURE_NAMES`] order.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        let t = &self.textual;
        let q = &self.quantitative;
        let s = &self.structural;
        let m = &self.semantic;
        let c = &self.clarity;
        [
            t.char_count as f64,
            t.word_count as f64,
            t.avg_word_length,
            t.sentence_count as f64,
            t.words_per_sentence,
            t.uppercase_ratio,
            t.punctuation_count as f64,
            flag(t.starts_with_verb),
            flag(t.ends_with_period),
            flag(t.has_parentheses),
            q.number_count as f64,
            flag(q.has_percentage),
            flag(q.has_dollar),
            flag(q.has_multiplier),
            q.verb_count as f64,
            flag(q.first_word_is_verb),
            flag(q.has_weak_language),
            q.metric_density,
            flag(s.has_bullet),
            s.comma_count as f64,
            flag(s.has_list_structure),
            s.and_count as f64,
            s.clause_count as f64,
            flag(s.has_comparison),
            flag(s.is_experience),
            flag(s.is_project),
            flag(s.is_summary),
            flag(s.is_education),
            flag(s.is_skills),
            m.num_keywords as f64,
            flag(m.has_language),
            flag(m.has_framework),
            flag(m.has_database),
            flag(m.has_cloud),
            flag(m.has_concept),
            m.tech_breadth as f64,
            m.token_count as f64,
            c.score,
            flag(c.has_action_verb),
            flag(c.has_metrics),
            c.word_count as f64,
        ]
    }

    /// Value of a named feature; names outside the schema read as 0.
    pub fn get(&self, name: &str) -> f64 {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values()[i])
            .unwrap_or(0.0)
    }

    /// Values in the column order of `names`, for a model fitted on an
    /// older or newer schema.
    pub fn project(&self, names: &[String]) -> Vec<f64> {
        let values = self.values();
        names
            .iter()
            .map(|name| {
                FEATURE_NAMES
                    .iter()
                    .position(|n| n == name)
                    .map(|i| values[i])
                    .unwrap_or(0.0)
            })
            .collect()
    }
}

fn textual_features(text: &str) -> TextualFeatures {
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();
    let char_count = text.chars().count();
    let sentence_count = SENTENCE_SPLIT_RE
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count();
    let letters: usize = words.iter().map(|w| w.chars().count()).sum();
    let uppercase = text.chars().filter(|c| c.is_uppercase()).count();

    TextualFeatures {
        char_count,
        word_count,
        avg_word_length: round_to(letters as f64 / word_count.max(1) as f64, 2),
        sentence_count,
        words_per_sentence: round_to(word_count as f64 / sentence_count.max(1) as f64, 2),
        uppercase_ratio: round_to(uppercase as f64 / char_count.max(1) as f64, 4),
        punctuation_count: text.chars().filter(|c| ".,;:!?".contains(*c)).count(),
        starts_with_verb: words
            .first()
            .is_some_and(|w| is_clarity_verb(&w.to_lowercase())),
        ends_with_period: text.trim().ends_with('.'),
        has_parentheses: text.contains('('),
    }
}

fn quantitative_features(text: &str) -> QuantitativeFeatures {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    let number_count = NUMBER_RE.find_iter(text).count();

    QuantitativeFeatures {
        number_count,
        has_percentage: PERCENT_RE.is_match(text),
        has_dollar: DOLLAR_RE.is_match(text),
        has_multiplier: MULTIPLIER_RE.is_match(&lower),
        verb_count: words.iter().filter(|w| is_clarity_verb(w)).count(),
        first_word_is_verb: words.first().is_some_and(|w| is_clarity_verb(w)),
        has_weak_language: has_weak_language(&lower),
        metric_density: round_to(number_count as f64 / words.len().max(1) as f64, 4),
    }
}

fn structural_features(text: &str, section: &str) -> StructuralFeatures {
    let lower = text.to_lowercase();
    let section = section.to_lowercase();
    let comma_count = text.matches(',').count();

    StructuralFeatures {
        has_bullet: text.trim().starts_with(['-', '•', '*']),
        comma_count,
        has_list_structure: comma_count >= 2,
        and_count: lower.matches(" and ").count(),
        clause_count: text.split([',', ';', ':']).count(),
        has_comparison: COMPARISON_WORDS.iter().any(|w| lower.contains(w)),
        is_experience: section == "experience",
        is_project: section == "projects",
        is_summary: section == "summary",
        is_education: section == "education",
        is_skills: section == "skills",
    }
}

fn semantic_features(text: &str) -> SemanticFeatures {
    let keywords = extract_keywords(text);
    let has = |category: KeywordCategory| keywords.get(&category).is_some_and(|terms| !terms.is_empty());

    SemanticFeatures {
        num_keywords: keyword_count(&keywords),
        has_language: has(KeywordCategory::Languages),
        has_framework: has(KeywordCategory::Frameworks),
        has_database: has(KeywordCategory::Databases),
        has_cloud: has(KeywordCategory::CloudDevops),
        has_concept: has(KeywordCategory::Concepts),
        tech_breadth: keywords.values().filter(|terms| !terms.is_empty()).count(),
        token_count: count_tokens(text),
    }
}

/// Builds the feature vector for one claim. Pure and deterministic.
pub fn build_feature_vector(claim: &ExtractedClaim) -> FeatureVector {
    let clarity = score_clarity(&claim.text);
    FeatureVector {
        textual: textual_features(&claim.text),
        quantitative: quantitative_features(&claim.text),
        structural: structural_features(&claim.text, &claim.section),
        semantic: semantic_features(&claim.text),
        clarity: ClarityFeatures {
            score: clarity.score,
            has_action_verb: clarity.has_action_verb,
            has_metrics: clarity.has_metrics,
            word_count: clarity.word_count,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(text: &str, section: &str) -> FeatureVector {
        build_feature_vector(&ExtractedClaim::new(text, section))
    }

    #[test]
    fn test_schema_has_41_unique_names_in_five_groups() {
        let mut names = FEATURE_NAMES.to_vec();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);

        let count = |prefix: &str| FEATURE_NAMES.iter().filter(|n| n.starts_with(prefix)).count();
        assert_eq!(count("txt_"), 10);
        assert_eq!(count("quant_"), 8);
        assert_eq!(count("struct_"), 11);
        assert_eq!(count("sem_"), 8);
        assert_eq!(count("clarity_"), 4);
    }

    #[test]
    fn test_serialized_keys_match_schema_order() {
        let fv = claim("Built a cache in Rust.", "projects");
        let json = serde_json::to_value(fv).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), FEATURE_COUNT);
        for name in FEATURE_NAMES {
            assert!(obj.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn test_strong_claim_features() {
        let fv = claim(
            "Led a team of 8 engineers to redesign the payment system, reducing failures by 40%",
            "experience",
        );
        assert_eq!(fv.textual.word_count, 15);
        assert!(fv.textual.starts_with_verb);
        assert_eq!(fv.quantitative.number_count, 2);
        assert!(fv.quantitative.has_percentage);
        assert!(!fv.quantitative.has_weak_language);
        assert_eq!(fv.quantitative.metric_density, round_to(2.0 / 15.0, 4));
        assert_eq!(fv.structural.comma_count, 1);
        assert_eq!(fv.structural.clause_count, 2);
        assert!(fv.structural.is_experience);
        assert!(!fv.structural.has_comparison);
        assert_eq!(fv.clarity.score, 1.0);
    }

    #[test]
    fn test_weak_claim_features() {
        let fv = claim("Responsible for backend maintenance", "experience");
        assert!(fv.quantitative.has_weak_language);
        assert!(!fv.textual.starts_with_verb);
        assert_eq!(fv.semantic.num_keywords, 0);
        assert!(!fv.clarity.has_metrics);
        assert_eq!(fv.get("quant_has_weak_language"), 1.0);
    }

    #[test]
    fn test_semantic_features_count_categories() {
        let fv = claim("Deployed Django services on AWS with PostgreSQL and Docker", "projects");
        assert_eq!(fv.semantic.num_keywords, 4);
        assert!(fv.semantic.has_framework && fv.semantic.has_cloud && fv.semantic.has_database);
        assert_eq!(fv.semantic.tech_breadth, 3);
        assert!(fv.structural.is_project);
    }

    #[test]
    fn test_builder_is_idempotent() {
        let c = ExtractedClaim::new(
            "Reduced p99 latency by 3x using Redis (read-through cache).",
            "projects",
        );
        assert_eq!(build_feature_vector(&c), build_feature_vector(&c));
    }

    #[test]
    fn test_unknown_feature_reads_as_zero() {
        let fv = claim("Built a cache in Rust.", "projects");
        assert_eq!(fv.get("does_not_exist"), 0.0);
        assert_eq!(fv.get("txt_ends_with_period"), 1.0);
    }

    #[test]
    fn test_project_fills_missing_columns_with_zero() {
        let fv = claim("Built a cache in Rust.", "projects");
        let names = vec!["struct_is_project".to_string(), "legacy_feature".to_string()];
        assert_eq!(fv.project(&names), vec![1.0, 0.0]);
    }

    #[test]
    fn test_empty_text_is_all_finite() {
        let fv = claim("", "");
        assert!(fv.values().iter().all(|v| v.is_finite()));
        assert_eq!(fv.textual.word_count, 0);
        assert_eq!(fv.structural.clause_count, 1);
    }
}

//! Resume ↔ job description relevance via TF-IDF cosine similarity.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::nlp::vocabulary::is_stop_word;
use crate::util::round_to;

/// Words of two or more word characters, the usual TF-IDF token pattern.
static TERM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

const MISSING_CANDIDATES: usize = 20;
const MISSING_TOP_N: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobRelevance {
    /// Cosine similarity × 100, 2dp.
    pub similarity: f64,
    /// Most frequent job-description terms that never appear in the resume.
    pub missing_keywords: Vec<String>,
}

fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let lower = text.to_lowercase();
    let mut counts = BTreeMap::new();
    for m in TERM_RE.find_iter(&lower) {
        let term = m.as_str();
        if !is_stop_word(term) {
            *counts.entry(term.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

fn l2_normalize(vector: &mut BTreeMap<String, f64>) {
    let norm = vector.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        vector.values_mut().for_each(|v| *v /= norm);
    }
}

/// Cosine similarity of smooth-idf TF-IDF vectors fitted on the two
/// documents, as a percentage.
pub fn tfidf_similarity(resume: &str, job_description: &str) -> f64 {
    if resume.trim().is_empty() || job_description.trim().is_empty() {
        return 0.0;
    }

    let docs = [term_counts(resume), term_counts(job_description)];
    let vocabulary: BTreeSet<&String> = docs.iter().flat_map(|d| d.keys()).collect();
    let n_docs = docs.len() as f64;

    let idf: BTreeMap<&String, f64> = vocabulary
        .iter()
        .map(|term| {
            let df = docs.iter().filter(|d| d.contains_key(*term)).count() as f64;
            (*term, ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0)
        })
        .collect();

    let vectors: Vec<BTreeMap<String, f64>> = docs
        .iter()
        .map(|counts| {
            let mut v: BTreeMap<String, f64> = counts
                .iter()
                .map(|(term, tf)| (term.clone(), *tf as f64 * idf[term]))
                .collect();
            l2_normalize(&mut v);
            v
        })
        .collect();

    let dot: f64 = vectors[0]
        .iter()
        .filter_map(|(term, a)| vectors[1].get(term).map(|b| a * b))
        .sum();

    round_to(dot * 100.0, 2)
}

/// Up to five of the job description's most frequent terms that do not occur
/// anywhere in the resume text. Ties rank alphabetically.
pub fn missing_keywords(resume: &str, job_description: &str) -> Vec<String> {
    if resume.trim().is_empty() || job_description.trim().is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(String, usize)> = term_counts(job_description).into_iter().collect();
    // Stable sort keeps the alphabetical order of equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(MISSING_CANDIDATES);

    let resume_lower = resume.to_lowercase();
    ranked
        .into_iter()
        .map(|(term, _)| term)
        .filter(|term| !resume_lower.contains(term.as_str()))
        .take(MISSING_TOP_N)
        .collect()
}

pub fn job_relevance(resume: &str, job_description: &str) -> JobRelevance {
    JobRelevance {
        similarity: tfidf_similarity(resume, job_description),
        missing_keywords: missing_keywords(resume, job_description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_documents_are_fully_similar() {
        let text = "Rust engineer building distributed storage systems";
        assert_eq!(tfidf_similarity(text, text), 100.0);
    }

    #[test]
    fn test_disjoint_documents_have_zero_similarity() {
        assert_eq!(tfidf_similarity("python django", "kubernetes terraform"), 0.0);
    }

    #[test]
    fn test_partial_overlap_is_between_bounds() {
        let s = tfidf_similarity(
            "Built Python services on AWS",
            "Looking for Python engineers with Kubernetes experience",
        );
        assert!(s > 0.0 && s < 100.0, "similarity was {s}");
    }

    #[test]
    fn test_missing_keywords_ranked_by_frequency() {
        let jd = "Kubernetes Kubernetes Kubernetes Terraform Terraform Python Go";
        let missing = missing_keywords("Python developer", jd);
        assert_eq!(missing, vec!["kubernetes", "terraform", "go"]);
    }

    #[test]
    fn test_empty_inputs_yield_defaults() {
        assert_eq!(job_relevance("", "anything"), JobRelevance::default());
        assert_eq!(job_relevance("resume", "  "), JobRelevance::default());
    }
}

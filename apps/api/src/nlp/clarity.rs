use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::nlp::vocabulary::is_clarity_verb;
use crate::util::round_to;

static METRIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+%|\$\d+|\d+[km]?|\d+\s*(ms|sec|s|x)").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClarityScore {
    pub score: f64,
    pub word_count: usize,
    pub has_action_verb: bool,
    pub has_metrics: bool,
}

/// Scores how readable and concrete a single claim is, on [0, 1].
///
/// - length: <5 words 0.2, <15 0.5, <40 1.0, otherwise 0.8
/// - verb: one of the first four words is a clarity action verb
/// - metrics: any number, percentage, currency or duration
///
/// `score = 0.25·length + 0.25·verb + 0.5·metrics`, rounded to 2dp.
pub fn score_clarity(text: &str) -> ClarityScore {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    let word_count = words.len();

    let length_score = match word_count {
        n if n < 5 => 0.2,
        n if n < 15 => 0.5,
        n if n < 40 => 1.0,
        _ => 0.8,
    };

    let has_action_verb = words.iter().take(4).any(|w| is_clarity_verb(w));
    let has_metrics = METRIC_RE.is_match(&lower);

    let verb_score = if has_action_verb { 1.0 } else { 0.0 };
    let quant_score = if has_metrics { 1.0 } else { 0.0 };

    ClarityScore {
        score: round_to(0.25 * length_score + 0.25 * verb_score + 0.5 * quant_score, 2),
        word_count,
        has_action_verb,
        has_metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_claim_scores_full_marks() {
        let c = score_clarity(
            "Led a team of 8 engineers to redesign the payment system, reducing failures by 40%",
        );
        assert!(c.has_action_verb);
        assert!(c.has_metrics);
        assert_eq!(c.word_count, 15);
        assert_eq!(c.score, 1.0);
    }

    #[test]
    fn test_vague_claim_scores_low() {
        let c = score_clarity("Responsible for backend maintenance");
        assert!(!c.has_action_verb);
        assert!(!c.has_metrics);
        // 0.25 * 0.2
        assert_eq!(c.score, 0.05);
    }

    #[test]
    fn test_verb_must_be_in_first_four_words() {
        let c = score_clarity("In the last quarter we built a new pipeline");
        assert!(!c.has_action_verb, "verb at position 6 should not count");
        let c = score_clarity("Over two years built a new pipeline");
        assert!(c.has_action_verb);
    }

    #[test]
    fn test_long_claims_are_penalized_slightly() {
        let text = vec!["word"; 45].join(" ");
        let c = score_clarity(&text);
        assert_eq!(c.score, 0.2);
    }
}

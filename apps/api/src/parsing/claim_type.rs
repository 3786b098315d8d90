use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Quantitative,
    Technical,
    SoftSkill,
    Qualitative,
}

static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\d+%|\d+\s*(?:users?|customers?|clients?|team|members?|engineers?|people)\b|\$\d+|\d+x\b|\d+\s*(?:million|billion|thousand|k)\b",
    )
    .expect("valid regex")
});

static TECHNICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:python|java|javascript|react|node(?:\.js)?|sql|aws|docker|kubernetes|apis?|databases?|algorithms?|machine learning|ai|frameworks?|librar(?:y|ies)|deployed|implemented|architected|built|developed|designed|automated|optimized|integrated|microservices?|cloud|devops|ci/cd|git|agile|scrum)\b",
    )
    .expect("valid regex")
});

static SOFT_SKILL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:led|managed|mentored|collaborated|communicated|leadership|teamwork|problem-solving|presented|stakeholders?|cross-functional|initiative)\b",
    )
    .expect("valid regex")
});

/// First match wins: quantitative, then technical, then soft skill.
pub fn classify_claim_type(text: &str) -> ClaimType {
    let lower = text.to_lowercase();
    if QUANTITY_RE.is_match(&lower) {
        ClaimType::Quantitative
    } else if TECHNICAL_RE.is_match(&lower) {
        ClaimType::Technical
    } else if SOFT_SKILL_RE.is_match(&lower) {
        ClaimType::SoftSkill
    } else {
        ClaimType::Qualitative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantitative_wins_over_technical() {
        assert_eq!(
            classify_claim_type("Built a cache that cut latency by 40%"),
            ClaimType::Quantitative
        );
        assert_eq!(
            classify_claim_type("Scaled the platform to 2 million users"),
            ClaimType::Quantitative
        );
    }

    #[test]
    fn test_technical_and_soft_skill() {
        assert_eq!(classify_claim_type("Designed the billing API"), ClaimType::Technical);
        assert_eq!(
            classify_claim_type("Mentored junior staff and presented to stakeholders"),
            ClaimType::SoftSkill
        );
    }

    #[test]
    fn test_short_keywords_need_word_boundaries() {
        // "ai" inside "maintenance" is not a technology mention
        assert_eq!(
            classify_claim_type("Responsible for backend maintenance"),
            ClaimType::Qualitative
        );
    }
}

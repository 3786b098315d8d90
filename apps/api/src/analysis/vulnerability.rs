//! Names what makes a risky claim risky and turns the dominant patterns into
//! interview probes.

use serde::Serialize;

use crate::ml::features::{build_feature_vector, FeatureVector};
use crate::ml::RiskPrediction;
use crate::nlp::vocabulary::{count_buzzwords, is_action_verb};
use crate::parsing::ExtractedClaim;
use crate::util::round_to;

const FOCUS_AREAS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Vulnerability {
    NoQuantifiedImpact,
    VagueOwnership,
    MissingActionVerb,
    BuzzwordStacking,
    NoTechnicalSpecifics,
}

impl Vulnerability {
    pub const ALL: [Vulnerability; 5] = [
        Vulnerability::NoQuantifiedImpact,
        Vulnerability::VagueOwnership,
        Vulnerability::MissingActionVerb,
        Vulnerability::BuzzwordStacking,
        Vulnerability::NoTechnicalSpecifics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Vulnerability::NoQuantifiedImpact => "No Quantified Impact",
            Vulnerability::VagueOwnership => "Vague Ownership",
            Vulnerability::MissingActionVerb => "Missing Action Verb",
            Vulnerability::BuzzwordStacking => "Buzzword Stacking",
            Vulnerability::NoTechnicalSpecifics => "No Technical Specifics",
        }
    }

    /// What an interviewer should press on when this pattern dominates.
    pub fn probe(self) -> &'static str {
        match self {
            Vulnerability::NoQuantifiedImpact => {
                "Ask for before/after numbers: how was the impact measured and by whom?"
            }
            Vulnerability::VagueOwnership => {
                "Ask which parts the candidate personally designed, wrote or decided."
            }
            Vulnerability::MissingActionVerb => {
                "Ask the candidate to walk through what they did step by step."
            }
            Vulnerability::BuzzwordStacking => {
                "Ask for a concrete architecture sketch and the trade-offs behind each named technology."
            }
            Vulnerability::NoTechnicalSpecifics => {
                "Ask which tools, languages and systems were involved and why they were chosen."
            }
        }
    }

    fn detected(self, features: &FeatureVector, text: &TextSignals) -> bool {
        let buzzwords = text.buzzwords;
        match self {
            Vulnerability::NoQuantifiedImpact => {
                !features.clarity.has_metrics && features.quantitative.number_count == 0
            }
            Vulnerability::VagueOwnership => features.quantitative.has_weak_language,
            Vulnerability::MissingActionVerb => {
                !features.quantitative.first_word_is_verb && !text.opens_with_verb
            }
            Vulnerability::BuzzwordStacking => {
                buzzwords >= 2 || (buzzwords == 1 && features.semantic.num_keywords == 0)
            }
            Vulnerability::NoTechnicalSpecifics => features.semantic.num_keywords == 0,
        }
    }
}

struct TextSignals {
    buzzwords: usize,
    opens_with_verb: bool,
}

/// Vulnerabilities of one claim, in taxonomy order.
pub fn classify_claim(claim: &ExtractedClaim) -> Vec<Vulnerability> {
    let features = build_feature_vector(claim);
    let signals = TextSignals {
        buzzwords: count_buzzwords(&claim.text.to_lowercase()),
        opens_with_verb: claim.text.split_whitespace().next().is_some_and(is_action_verb),
    };
    Vulnerability::ALL
        .into_iter()
        .filter(|v| v.detected(&features, &signals))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimVulnerabilities {
    pub claim: String,
    pub risky: bool,
    pub vulnerabilities: Vec<Vulnerability>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaknessCount {
    pub vulnerability: Vulnerability,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusArea {
    pub area: &'static str,
    pub probe: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VulnerabilityMap {
    pub strong_claims: usize,
    pub total_claims: usize,
    /// Percentage of non-risky claims, 1dp.
    pub strength_ratio: f64,
    pub top_weaknesses: Vec<WeaknessCount>,
    pub interview_focus: Vec<FocusArea>,
    pub per_claim: Vec<ClaimVulnerabilities>,
}

/// Classifies every risky claim (medium risk or above) and ranks the
/// patterns found. `claims` and `predictions` pair up by position; extra
/// entries on either side are ignored.
pub fn map_vulnerabilities(
    claims: &[ExtractedClaim],
    predictions: &[RiskPrediction],
) -> VulnerabilityMap {
    let mut counts = [0usize; Vulnerability::ALL.len()];
    let mut per_claim = Vec::with_capacity(claims.len().min(predictions.len()));

    for (claim, prediction) in claims.iter().zip(predictions) {
        let risky = prediction.risk_label.is_risky();
        let vulnerabilities = if risky { classify_claim(claim) } else { Vec::new() };
        for v in &vulnerabilities {
            counts[*v as usize] += 1;
        }
        per_claim.push(ClaimVulnerabilities {
            claim: claim.text.clone(),
            risky,
            vulnerabilities,
        });
    }

    let total_claims = per_claim.len();
    let strong_claims = per_claim.iter().filter(|c| !c.risky).count();
    let strength_ratio = if total_claims == 0 {
        0.0
    } else {
        round_to(strong_claims as f64 / total_claims as f64 * 100.0, 1)
    };

    let mut top_weaknesses: Vec<WeaknessCount> = Vulnerability::ALL
        .into_iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(vulnerability, count)| WeaknessCount {
            vulnerability,
            label: vulnerability.label(),
            count,
        })
        .collect();
    // stable: equal counts keep taxonomy order
    top_weaknesses.sort_by(|a, b| b.count.cmp(&a.count));

    let interview_focus = top_weaknesses
        .iter()
        .take(FOCUS_AREAS)
        .map(|w| FocusArea {
            area: w.label,
            probe: w.vulnerability.probe(),
        })
        .collect();

    VulnerabilityMap {
        strong_claims,
        total_claims,
        strength_ratio,
        top_weaknesses,
        interview_focus,
        per_claim,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::RiskLevel;

    fn prediction(p: f64) -> RiskPrediction {
        RiskPrediction {
            risk_label: RiskLevel::from_probability(p),
            risk_score: round_to(p * 100.0, 1),
            risk_probability: p,
        }
    }

    fn claim(text: &str) -> ExtractedClaim {
        ExtractedClaim::new(text, "experience")
    }

    #[test]
    fn test_vague_claim_has_weaknesses() {
        let found = classify_claim(&claim("Responsible for backend maintenance"));
        assert!(found.contains(&Vulnerability::VagueOwnership));
        assert!(found.contains(&Vulnerability::NoQuantifiedImpact));
        assert!(found.contains(&Vulnerability::MissingActionVerb));
    }

    #[test]
    fn test_strong_claim_is_clean() {
        let found = classify_claim(&claim(
            "Reduced API latency by 40% by adding Redis caching in front of PostgreSQL",
        ));
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn test_buzzword_stacking() {
        let found = classify_claim(&claim(
            "Leveraged cutting edge best practices to deliver a scalable solution",
        ));
        assert!(found.contains(&Vulnerability::BuzzwordStacking), "{found:?}");
    }

    #[test]
    fn test_only_risky_claims_are_classified() {
        let claims = vec![
            claim("Responsible for backend maintenance"),
            claim("Worked on various projects"),
            claim("Reduced API latency by 40% using Redis"),
            claim("Helped with deployment tasks"),
        ];
        let predictions = vec![prediction(0.9), prediction(0.7), prediction(0.1), prediction(0.3)];
        let map = map_vulnerabilities(&claims, &predictions);

        assert_eq!(map.total_claims, 4);
        assert_eq!(map.strong_claims, 2);
        assert_eq!(map.strength_ratio, 50.0);
        assert!(map.per_claim[2].vulnerabilities.is_empty());
        assert!(map.per_claim[3].vulnerabilities.is_empty());
        assert!(!map.per_claim[0].vulnerabilities.is_empty());

        for pair in map.top_weaknesses.windows(2) {
            assert!(pair[0].count >= pair[1].count);
            if pair[0].count == pair[1].count {
                assert!(pair[0].vulnerability < pair[1].vulnerability);
            }
        }
        assert!(map.interview_focus.len() <= 3);
        assert_eq!(map.interview_focus[0].area, map.top_weaknesses[0].label);
    }

    #[test]
    fn test_empty_input() {
        let map = map_vulnerabilities(&[], &[]);
        assert_eq!(map.total_claims, 0);
        assert_eq!(map.strength_ratio, 0.0);
        assert!(map.top_weaknesses.is_empty());
        assert!(map.interview_focus.is_empty());
    }

    #[test]
    fn test_every_category_has_text() {
        for v in Vulnerability::ALL {
            assert!(!v.label().is_empty());
            assert!(v.probe().ends_with('.') || v.probe().ends_with('?'));
        }
    }
}

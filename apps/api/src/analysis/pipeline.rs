//! Résumé text in, full analysis report out.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::{AnalysisReport, Claim};
use crate::analysis::vulnerability::map_vulnerabilities;
use crate::ml::readiness::{claim_signal, score_from_signals};
use crate::ml::{build_feature_vector, ModelError, ModelRegistry, RiskPrediction};
use crate::nlp::cross_reference::cross_reference;
use crate::nlp::relevance::job_relevance;
use crate::parsing::{extract_claims, segment_with, ExtractedClaim, SectionRules};

const MODEL_INSIGHTS: usize = 5;

/// Scores every claim, keeping the order of `claims`.
pub fn score_claims(
    claims: &[ExtractedClaim],
    models: &ModelRegistry,
) -> Result<Vec<RiskPrediction>, ModelError> {
    claims
        .iter()
        .map(|claim| models.risk.predict(&build_feature_vector(claim)))
        .collect()
}

/// Runs segmentation, extraction, risk scoring, readiness, vulnerability
/// mapping, skill gaps and (with a job description) relevance.
///
/// Fails only when there are claims to score and the risk classifier is
/// not trained.
pub fn analyze_resume(
    text: &str,
    job_description: Option<&str>,
    rules: &SectionRules,
    models: &ModelRegistry,
) -> Result<AnalysisReport, ModelError> {
    let sections = segment_with(text, rules);
    let extracted = extract_claims(&sections);

    let mut predictions = Vec::with_capacity(extracted.len());
    let mut signals = Vec::with_capacity(extracted.len());
    for claim in &extracted {
        let features = build_feature_vector(claim);
        let prediction = models.risk.predict(&features)?;
        signals.push(claim_signal(&features, prediction.risk_probability));
        predictions.push(prediction);
    }

    let readiness = score_from_signals(&signals);
    let model_estimate = models
        .readiness
        .as_ref()
        .and_then(|model| model.predict(&extracted));
    let vulnerability_map = map_vulnerabilities(&extracted, &predictions);
    let skill_gaps = cross_reference(extracted.iter().map(|c| c.text.as_str()));
    let relevance = job_description
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .map(|jd| job_relevance(text, jd));

    let claims: Vec<Claim> = extracted
        .iter()
        .zip(&predictions)
        .zip(&vulnerability_map.per_claim)
        .map(|((claim, prediction), found)| {
            Claim::new(claim, *prediction, found.vulnerabilities.clone())
        })
        .collect();

    let avg_risk = readiness.breakdown.map(|b| b.avg_risk).unwrap_or(0.0);
    let summary = format!(
        "Analyzed {} claims. Average risk: {:.2}",
        claims.len(),
        avg_risk
    );

    info!(
        sections = sections.len(),
        claims = claims.len(),
        readiness = readiness.score,
        "Resume analyzed"
    );

    Ok(AnalysisReport {
        report_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        summary,
        sections,
        claims,
        readiness,
        model_estimate,
        vulnerability_map,
        skill_gaps,
        relevance,
        model_insights: models.risk.feature_importance(MODEL_INSIGHTS),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use super::*;
    use crate::ml::{ReadinessLevel, RiskLevel, TrainingConfig};

    const RESUME: &str = "Jane Doe
jane.doe@example.com | +1 555 123 4567

Experience
Senior Engineer | Acme Corp | 2019 - 2023
- Led a team of 8 engineers to redesign the payment system, reducing transaction failures by 40%
- Responsible for backend maintenance
- Built REST API using FastAPI and PostgreSQL serving 20,000 daily users

Projects
- Implemented caching layer using Redis, cutting response time by 3x
- Worked on various projects

Skills
Python, Rust, Docker, Kubernetes
";

    fn models() -> &'static ModelRegistry {
        static MODELS: OnceLock<ModelRegistry> = OnceLock::new();
        MODELS.get_or_init(|| {
            let config = TrainingConfig {
                readiness_resumes: 160,
                ..TrainingConfig::default()
            };
            ModelRegistry::train(&config).unwrap()
        })
    }

    #[test]
    fn test_untrained_models_fail_fast() {
        let err = analyze_resume(RESUME, None, SectionRules::builtin(), &ModelRegistry::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::NotTrained(_)));
    }

    #[test]
    fn test_full_report() {
        let report = analyze_resume(RESUME, None, SectionRules::builtin(), models()).unwrap();

        assert!(report.sections.contains_key("experience"));
        assert!(report.sections.contains_key("projects"));
        assert_eq!(report.claims.len(), 5);
        assert!(report.claims.iter().all(|c| c.section != "skills"));
        for claim in &report.claims {
            assert!((0.0..=100.0).contains(&claim.risk_score));
            if !claim.risk_label.is_risky() {
                assert!(claim.vulnerabilities.is_empty());
            }
        }

        let vague = report
            .claims
            .iter()
            .find(|c| c.text == "Responsible for backend maintenance")
            .unwrap();
        assert!(vague.risk_label >= RiskLevel::Medium);
        assert!(!vague.vulnerabilities.is_empty());

        assert!((0.0..=100.0).contains(&report.readiness.score));
        assert_ne!(report.readiness.level, ReadinessLevel::NotAssessed);
        assert_eq!(report.vulnerability_map.total_claims, 5);
        assert!(report.skill_gaps.explicit_skills.contains("redis"));
        assert!(report.relevance.is_none());
        assert_eq!(report.model_insights.len(), MODEL_INSIGHTS);
        assert!(report.model_estimate.is_some());
    }

    #[test]
    fn test_job_description_adds_relevance() {
        let jd = "We need a Go engineer with Kafka, gRPC and Terraform experience. Kafka a must.";
        let report = analyze_resume(RESUME, Some(jd), SectionRules::builtin(), models()).unwrap();
        let relevance = report.relevance.unwrap();
        assert!(relevance.missing_keywords.contains(&"kafka".to_string()));

        let blank = analyze_resume(RESUME, Some("   "), SectionRules::builtin(), models()).unwrap();
        assert!(blank.relevance.is_none());
    }

    #[test]
    fn test_text_without_claims_is_not_assessed() {
        let report = analyze_resume("hello", None, SectionRules::builtin(), models()).unwrap();
        assert!(report.claims.is_empty());
        assert_eq!(report.readiness.level, ReadinessLevel::NotAssessed);
        assert!(report.model_estimate.is_none());
        assert!(report.sections.contains_key("full_text"));
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::vulnerability::{Vulnerability, VulnerabilityMap};
use crate::ml::readiness::ModelEstimate;
use crate::ml::risk_classifier::FeatureWeight;
use crate::ml::{ReadinessReport, RiskLevel, RiskPrediction};
use crate::nlp::cross_reference::SkillGapReport;
use crate::nlp::relevance::JobRelevance;
use crate::parsing::{classify_claim_type, ClaimType, ExtractedClaim, Sections};

/// A scored claim as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claim {
    pub text: String,
    pub section: String,
    pub claim_type: ClaimType,
    pub risk_label: RiskLevel,
    pub risk_score: f64,
    pub risk_probability: f64,
    pub vulnerabilities: Vec<Vulnerability>,
}

impl Claim {
    pub fn new(
        claim: &ExtractedClaim,
        prediction: RiskPrediction,
        vulnerabilities: Vec<Vulnerability>,
    ) -> Self {
        Claim {
            text: claim.text.clone(),
            section: claim.section.clone(),
            claim_type: classify_claim_type(&claim.text),
            risk_label: prediction.risk_label,
            risk_score: prediction.risk_score,
            risk_probability: prediction.risk_probability,
            vulnerabilities,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub summary: String,
    pub sections: Sections,
    pub claims: Vec<Claim>,
    pub readiness: ReadinessReport,
    pub model_estimate: Option<ModelEstimate>,
    pub vulnerability_map: VulnerabilityMap,
    pub skill_gaps: SkillGapReport,
    /// Present when a job description was supplied.
    pub relevance: Option<JobRelevance>,
    pub model_insights: Vec<FeatureWeight>,
}

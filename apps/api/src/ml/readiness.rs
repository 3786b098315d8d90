//! Résumé-level interview readiness.
//!
//! The primary score is rule-based and explainable: every penalty is
//! reported. A ridge regressor trained on synthetic résumés gives a second
//! opinion from aggregated claim features.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ml::features::{build_feature_vector, FeatureVector, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
use crate::ml::linear::{RidgeRegression, StandardScaler};
use crate::ml::risk_classifier::RiskClassifier;
use crate::ml::synthetic::SyntheticResume;
use crate::ml::{persist, restore, ModelError};
use crate::parsing::ExtractedClaim;
use crate::util::{mean, population_std, round_to, sample_std};

const TARGET_CLAIMS: usize = 8;
const DEPTH_PENALTY_PER_CLAIM: f64 = 3.0;
const MAX_CONSISTENCY_PENALTY: f64 = 10.0;
const CONSISTENCY_SCALE: f64 = 20.0;
const RIDGE_ALPHA: f64 = 1.0;
const TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
    Excellent,
    Good,
    NeedsImprovement,
    Weak,
    NotAssessed,
}

impl ReadinessLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ReadinessLevel::Excellent
        } else if score >= 60.0 {
            ReadinessLevel::Good
        } else if score >= 40.0 {
            ReadinessLevel::NeedsImprovement
        } else {
            ReadinessLevel::Weak
        }
    }
}

/// The per-claim inputs the rule-based score needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaimSignal {
    pub risk_probability: f64,
    pub has_metrics: bool,
    pub has_tech_keyword: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessBreakdown {
    pub base_score: f64,
    pub avg_risk: f64,
    pub claims_analyzed: usize,
    pub claims_with_metrics: usize,
    pub claims_with_keywords: usize,
    pub depth_penalty: f64,
    pub metrics_penalty: f64,
    pub consistency_penalty: f64,
    pub total_penalty: f64,
    /// `base_score − total_penalty`, before rounding and clamping. The
    /// breakdown values are unrounded so the identity holds exactly.
    pub raw_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub score: f64,
    pub level: ReadinessLevel,
    pub breakdown: Option<ReadinessBreakdown>,
}

impl ReadinessReport {
    fn not_assessed() -> Self {
        ReadinessReport {
            score: 0.0,
            level: ReadinessLevel::NotAssessed,
            breakdown: None,
        }
    }
}

fn depth_penalty(claims: usize) -> f64 {
    TARGET_CLAIMS.saturating_sub(claims) as f64 * DEPTH_PENALTY_PER_CLAIM
}

fn metrics_penalty(ratio: f64) -> f64 {
    if ratio < 0.2 {
        15.0
    } else if ratio < 0.4 {
        8.0
    } else {
        0.0
    }
}

/// Scores a résumé from its per-claim signals.
pub fn score_from_signals(signals: &[ClaimSignal]) -> ReadinessReport {
    if signals.is_empty() {
        return ReadinessReport::not_assessed();
    }

    let n = signals.len();
    let risks: Vec<f64> = signals.iter().map(|s| s.risk_probability).collect();
    let avg_risk = mean(&risks);
    let with_metrics = signals.iter().filter(|s| s.has_metrics).count();
    let with_keywords = signals.iter().filter(|s| s.has_tech_keyword).count();

    let base_score = (1.0 - avg_risk) * 100.0;
    let depth = depth_penalty(n);
    let metrics = metrics_penalty(with_metrics as f64 / n as f64);
    let consistency =
        (population_std(&risks) * CONSISTENCY_SCALE).min(MAX_CONSISTENCY_PENALTY);
    let total_penalty = depth + metrics + consistency;
    let raw_score = base_score - total_penalty;
    let score = round_to(raw_score, 1).clamp(0.0, 100.0);

    ReadinessReport {
        score,
        level: ReadinessLevel::from_score(score),
        breakdown: Some(ReadinessBreakdown {
            base_score,
            avg_risk: round_to(avg_risk, 4),
            claims_analyzed: n,
            claims_with_metrics: with_metrics,
            claims_with_keywords: with_keywords,
            depth_penalty: depth,
            metrics_penalty: metrics,
            consistency_penalty: consistency,
            total_penalty,
            raw_score,
        }),
    }
}

pub fn claim_signal(features: &FeatureVector, risk_probability: f64) -> ClaimSignal {
    ClaimSignal {
        risk_probability,
        has_metrics: features.clarity.has_metrics,
        has_tech_keyword: features.semantic.num_keywords > 0,
    }
}

/// Rule-based readiness for a list of claims; an empty list is
/// `not_assessed`, an untrained classifier an error.
pub fn score_readiness(
    claims: &[ExtractedClaim],
    classifier: &RiskClassifier,
) -> Result<ReadinessReport, ModelError> {
    if claims.is_empty() {
        return Ok(ReadinessReport::not_assessed());
    }
    let signals = claims
        .iter()
        .map(|claim| {
            let features = build_feature_vector(claim);
            let prediction = classifier.predict(&features)?;
            Ok(claim_signal(&features, prediction.risk_probability))
        })
        .collect::<Result<Vec<_>, ModelError>>()?;
    Ok(score_from_signals(&signals))
}

// ────────────────────────────────────────────────────────────────────────────
// Model estimate
// ────────────────────────────────────────────────────────────────────────────

/// Names of the résumé-level columns: `mean_`, `max_` and `std_` of every
/// claim feature, then `claim_count`.
pub fn aggregate_feature_names() -> Vec<String> {
    let mut names = Vec::with_capacity(FEATURE_NAMES.len() * 3 + 1);
    for prefix in ["mean", "max", "std"] {
        names.extend(FEATURE_NAMES.iter().map(|n| format!("{prefix}_{n}")));
    }
    names.push("claim_count".to_string());
    names
}

/// One row per résumé, in [`aggregate_feature_names`] order. The standard
/// deviation is the sample one, 0 for a single claim.
pub fn aggregate_features(claims: &[ExtractedClaim]) -> Vec<f64> {
    let columns = FEATURE_NAMES.len();
    let rows: Vec<_> = claims.iter().map(|c| build_feature_vector(c).values()).collect();

    let mut means = Vec::with_capacity(columns);
    let mut maxes = Vec::with_capacity(columns);
    let mut stds = Vec::with_capacity(columns);
    for col in 0..columns {
        let values: Vec<f64> = rows.iter().map(|r| r[col]).collect();
        means.push(mean(&values));
        maxes.push(values.iter().copied().reduce(f64::max).unwrap_or(0.0));
        stds.push(sample_std(&values));
    }

    let mut out = means;
    out.extend(maxes);
    out.extend(stds);
    out.push(claims.len() as f64);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelEstimate {
    pub score: f64,
    pub level: ReadinessLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub samples_train: usize,
    pub samples_test: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessModel {
    schema_version: u32,
    feature_names: Vec<String>,
    scaler: StandardScaler,
    ridge: RidgeRegression,
    metrics: RegressionMetrics,
}

impl ReadinessModel {
    /// Fits on a random 80 % of `resumes` and reports errors on the rest.
    pub fn train(resumes: &[SyntheticResume], seed: u64) -> Result<Self, ModelError> {
        if resumes.len() < 5 {
            return Err(ModelError::InsufficientData(format!(
                "need at least 5 résumés, got {}",
                resumes.len()
            )));
        }
        let x: Vec<Vec<f64>> = resumes.iter().map(|r| aggregate_features(&r.claims)).collect();
        let y: Vec<f64> = resumes.iter().map(|r| r.score).collect();

        let mut order: Vec<usize> = (0..resumes.len()).collect();
        order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
        let n_test = ((resumes.len() as f64 * TEST_FRACTION).ceil() as usize).max(1);
        let (test_idx, train_idx) = order.split_at(n_test);

        let x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| x[i].clone()).collect();
        let y_train: Vec<f64> = train_idx.iter().map(|&i| y[i]).collect();
        let scaler = StandardScaler::fit(&x_train)?;
        let ridge = RidgeRegression::fit(&scaler.transform_all(&x_train), &y_train, RIDGE_ALPHA)?;

        let errors: Vec<f64> = test_idx
            .iter()
            .map(|&i| ridge.predict(&scaler.transform(&x[i])) - y[i])
            .collect();
        let mae = mean(&errors.iter().map(|e| e.abs()).collect::<Vec<_>>());
        let rmse = mean(&errors.iter().map(|e| e * e).collect::<Vec<_>>()).sqrt();
        let metrics = RegressionMetrics {
            mae: round_to(mae, 2),
            rmse: round_to(rmse, 2),
            samples_train: train_idx.len(),
            samples_test: test_idx.len(),
        };
        info!(mae = metrics.mae, rmse = metrics.rmse, "Readiness model trained");

        Ok(ReadinessModel {
            schema_version: FEATURE_SCHEMA_VERSION,
            feature_names: aggregate_feature_names(),
            scaler,
            ridge,
            metrics,
        })
    }

    pub fn metrics(&self) -> RegressionMetrics {
        self.metrics
    }

    /// `None` when there are no claims to aggregate.
    pub fn predict(&self, claims: &[ExtractedClaim]) -> Option<ModelEstimate> {
        if claims.is_empty() {
            return None;
        }
        let current = aggregate_feature_names();
        let values = aggregate_features(claims);
        let row: Vec<f64> = self
            .feature_names
            .iter()
            .map(|name| {
                current
                    .iter()
                    .position(|n| n == name)
                    .map(|i| values[i])
                    .unwrap_or(0.0)
            })
            .collect();
        let score = round_to(self.ridge.predict(&self.scaler.transform(&row)).clamp(0.0, 100.0), 1);
        Some(ModelEstimate {
            score,
            level: ReadinessLevel::from_score(score),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        persist(self, path)?;
        info!(path = %path.display(), "Readiness model saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let model: ReadinessModel = restore(path)?;
        if model.schema_version != FEATURE_SCHEMA_VERSION {
            warn!(
                stored = model.schema_version,
                current = FEATURE_SCHEMA_VERSION,
                "Readiness model was trained on a different feature schema"
            );
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::synthetic::{QualityWeights, SyntheticGenerator};

    fn signal(risk: f64, metrics: bool) -> ClaimSignal {
        ClaimSignal {
            risk_probability: risk,
            has_metrics: metrics,
            has_tech_keyword: true,
        }
    }

    #[test]
    fn test_empty_is_not_assessed() {
        let report = score_from_signals(&[]);
        assert_eq!(report.score, 0.0);
        assert_eq!(report.level, ReadinessLevel::NotAssessed);
        assert!(report.breakdown.is_none());

        let report = score_readiness(&[], &RiskClassifier::new()).unwrap();
        assert_eq!(report.level, ReadinessLevel::NotAssessed);
    }

    #[test]
    fn test_depth_penalty_for_four_claims() {
        let signals = vec![signal(0.1, true); 4];
        let b = score_from_signals(&signals).breakdown.unwrap();
        assert_eq!(b.depth_penalty, 12.0);
        assert_eq!(b.metrics_penalty, 0.0);
        assert_eq!(b.consistency_penalty, 0.0);
        assert_eq!(b.base_score, 90.0);
    }

    #[test]
    fn test_no_depth_penalty_from_eight_claims() {
        assert_eq!(depth_penalty(8), 0.0);
        assert_eq!(depth_penalty(12), 0.0);
        assert_eq!(depth_penalty(1), 21.0);
    }

    #[test]
    fn test_metrics_penalty_tiers() {
        assert_eq!(metrics_penalty(0.0), 15.0);
        assert_eq!(metrics_penalty(0.2), 8.0);
        assert_eq!(metrics_penalty(0.39), 8.0);
        assert_eq!(metrics_penalty(0.4), 0.0);
    }

    #[test]
    fn test_breakdown_is_consistent_and_bounded() {
        let cases = vec![
            vec![signal(0.95, false); 2],
            vec![signal(0.02, true); 10],
            vec![signal(0.1, true), signal(0.9, false), signal(0.5, false)],
        ];
        for signals in cases {
            let report = score_from_signals(&signals);
            let b = report.breakdown.unwrap();
            assert!((0.0..=100.0).contains(&report.score));
            let penalties = b.depth_penalty + b.metrics_penalty + b.consistency_penalty;
            assert!((b.base_score - penalties - b.raw_score).abs() < 1e-9);
            assert!((b.total_penalty - penalties).abs() < 1e-9);
        }
    }

    #[test]
    fn test_score_rounds_the_exact_difference() {
        // 36.15 - 18 - 5.498 = 12.652
        let signals = vec![signal(0.3636, true), signal(0.9134, true)];
        let report = score_from_signals(&signals);
        let b = report.breakdown.unwrap();
        assert!((b.raw_score - 12.652).abs() < 1e-9, "raw was {}", b.raw_score);
        assert_eq!(report.score, 12.7);
        assert_eq!(report.level, ReadinessLevel::Weak);
    }

    #[test]
    fn test_score_with_uncapped_consistency_penalty() {
        let signals: Vec<_> = [0.3, 0.4, 0.5, 0.6].iter().map(|&r| signal(r, true)).collect();
        let report = score_from_signals(&signals);
        let b = report.breakdown.unwrap();
        assert_eq!(b.depth_penalty, 12.0);
        // population std 0.1118 -> 2.236
        assert!((b.consistency_penalty - 2.236_068).abs() < 1e-6);
        assert_eq!(report.score, 40.8);
        assert_eq!(report.level, ReadinessLevel::NeedsImprovement);
    }

    #[test]
    fn test_negative_raw_score_clamps_to_zero() {
        let report = score_from_signals(&[signal(0.95, false)]);
        let b = report.breakdown.unwrap();
        assert!(b.raw_score < 0.0);
        assert_eq!(report.score, 0.0);
        assert_eq!(report.level, ReadinessLevel::Weak);
    }

    #[test]
    fn test_consistency_penalty_caps_at_ten() {
        let signals = vec![signal(0.0, true), signal(1.0, true)];
        let b = score_from_signals(&signals).breakdown.unwrap();
        assert_eq!(b.consistency_penalty, 10.0);
    }

    #[test]
    fn test_levels() {
        assert_eq!(ReadinessLevel::from_score(80.0), ReadinessLevel::Excellent);
        assert_eq!(ReadinessLevel::from_score(79.9), ReadinessLevel::Good);
        assert_eq!(ReadinessLevel::from_score(40.0), ReadinessLevel::NeedsImprovement);
        assert_eq!(ReadinessLevel::from_score(39.9), ReadinessLevel::Weak);
    }

    #[test]
    fn test_aggregate_shape() {
        let claims = vec![
            ExtractedClaim::new("Built REST API using FastAPI", "projects"),
            ExtractedClaim::new("Reduced latency by 40%", "experience"),
        ];
        let row = aggregate_features(&claims);
        assert_eq!(row.len(), aggregate_feature_names().len());
        assert_eq!(row.len(), FEATURE_NAMES.len() * 3 + 1);
        assert_eq!(*row.last().unwrap(), 2.0);

        let single = aggregate_features(&claims[..1]);
        let std_start = FEATURE_NAMES.len() * 2;
        assert!(single[std_start..std_start + FEATURE_NAMES.len()].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_model_estimate_orders_strong_above_weak() {
        let mut generator = SyntheticGenerator::new(42);
        let resumes = generator.resume_dataset(400, &QualityWeights::default());
        let model = ReadinessModel::train(&resumes, 42).unwrap();
        assert!(model.metrics().mae < 20.0, "{:?}", model.metrics());

        let strong: Vec<_> = (0..8)
            .map(|i| {
                let text = format!("Reduced API latency by {}% using Redis caching", 20 + i);
                ExtractedClaim::new(text, "experience")
            })
            .collect();
        let weak: Vec<_> = (0..8)
            .map(|_| ExtractedClaim::new("Responsible for system maintenance", "experience"))
            .collect();
        let s = model.predict(&strong).unwrap();
        let w = model.predict(&weak).unwrap();
        assert!(s.score > w.score, "strong {s:?} weak {w:?}");
        assert!(model.predict(&[]).is_none());
    }

    #[test]
    fn test_model_round_trip() {
        let resumes = SyntheticGenerator::new(3).resume_dataset(80, &QualityWeights::default());
        let model = ReadinessModel::train(&resumes, 3).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readiness_model.bin");
        model.save(&path).unwrap();
        let loaded = ReadinessModel::load(&path).unwrap();
        let claims = &resumes[0].claims;
        assert_eq!(loaded.predict(claims), model.predict(claims));
    }
}

//! Calibrated logistic classifier for claim risk.
//!
//! The base model is an L2 logistic regression over standard-scaled
//! features with balanced class weights. Probabilities come from five
//! cross-validated fold models, each a logistic regression fitted on four
//! folds with a Platt sigmoid fitted on the fifth; the prediction is their
//! mean.

use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ml::dataset::{stratified_folds, stratified_split};
use crate::ml::features::{build_feature_vector, FeatureVector, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
use crate::ml::linear::{balanced_sample_weights, LogisticRegression, PlattScaling, StandardScaler};
use crate::ml::synthetic::LabeledClaim;
use crate::ml::{persist, restore, ModelError};
use crate::util::round_to;

const REGULARIZATION_C: f64 = 1.0;
const CALIBRATION_FOLDS: usize = 5;
const TEST_FRACTION: f64 = 0.2;

// ────────────────────────────────────────────────────────────────────────────
// Prediction types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Strict lower bounds: >0.75, >0.60, >0.45, >0.25.
    pub fn from_probability(p: f64) -> Self {
        if p > 0.75 {
            RiskLevel::VeryHigh
        } else if p > 0.60 {
            RiskLevel::High
        } else if p > 0.45 {
            RiskLevel::Medium
        } else if p > 0.25 {
            RiskLevel::Low
        } else {
            RiskLevel::VeryLow
        }
    }

    /// Medium and above get vulnerability analysis.
    pub fn is_risky(self) -> bool {
        self >= RiskLevel::Medium
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "very_low",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub risk_label: RiskLevel,
    /// `round(risk_probability · 100, 1)`
    pub risk_score: f64,
    pub risk_probability: f64,
}

impl RiskPrediction {
    fn from_probability(p: f64) -> Self {
        let risk_probability = round_to(p.clamp(0.0, 1.0), 4);
        RiskPrediction {
            risk_label: RiskLevel::from_probability(risk_probability),
            risk_score: round_to(risk_probability * 100.0, 1),
            risk_probability,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub samples_train: usize,
    pub samples_test: usize,
}

impl TrainingMetrics {
    /// Hold-out metrics with class 1 (risky) as the positive class.
    fn evaluate(predicted: &[u8], actual: &[u8]) -> Self {
        let mut tp = 0.0;
        let mut fp = 0.0;
        let mut fn_ = 0.0;
        let mut correct = 0.0;
        for (&p, &y) in predicted.iter().zip(actual) {
            match (p, y) {
                (1, 1) => tp += 1.0,
                (1, _) => fp += 1.0,
                (_, 1) => fn_ += 1.0,
                _ => {}
            }
            if p == y {
                correct += 1.0;
            }
        }
        let ratio = |num: f64, den: f64| if den > 0.0 { num / den } else { 0.0 };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = ratio(2.0 * precision * recall, precision + recall);
        TrainingMetrics {
            accuracy: round_to(ratio(correct, actual.len() as f64), 4),
            precision: round_to(precision, 4),
            recall: round_to(recall, 4),
            f1: round_to(f1, 4),
            samples_train: 0,
            samples_test: actual.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub weight: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CalibratedFold {
    model: LogisticRegression,
    platt: PlattScaling,
}

impl CalibratedFold {
    fn probability(&self, row: &[f64]) -> f64 {
        self.platt.calibrate(self.model.decision_function(row))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrainedRiskModel {
    schema_version: u32,
    feature_names: Vec<String>,
    scaler: StandardScaler,
    base: LogisticRegression,
    folds: Vec<CalibratedFold>,
    metrics: TrainingMetrics,
}

impl TrainedRiskModel {
    fn probability(&self, scaled: &[f64]) -> f64 {
        let total: f64 = self.folds.iter().map(|f| f.probability(scaled)).sum();
        total / self.folds.len().max(1) as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    trained: Option<TrainedRiskModel>,
}

fn select<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i].clone()).collect()
}

fn fit_weighted(x: &[Vec<f64>], y: &[u8]) -> Result<LogisticRegression, ModelError> {
    let weights = balanced_sample_weights(y);
    LogisticRegression::fit(x, y, &weights, REGULARIZATION_C)
}

impl RiskClassifier {
    pub fn new() -> Self {
        RiskClassifier::default()
    }

    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }

    pub fn metrics(&self) -> Option<TrainingMetrics> {
        self.trained.as_ref().map(|m| m.metrics)
    }

    /// Fits on a stratified 80 % of `rows` and reports metrics on the rest.
    pub fn train(&mut self, rows: &[LabeledClaim], seed: u64) -> Result<TrainingMetrics, ModelError> {
        let x: Vec<Vec<f64>> = rows
            .iter()
            .map(|r| build_feature_vector(&r.claim).values().to_vec())
            .collect();
        let y: Vec<u8> = rows.iter().map(|r| r.label).collect();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (train_idx, test_idx) = stratified_split(&y, TEST_FRACTION, &mut rng)?;

        let scaler = StandardScaler::fit(&select(&x, &train_idx))?;
        let x_train = scaler.transform_all(&select(&x, &train_idx));
        let y_train = select(&y, &train_idx);
        let x_test = scaler.transform_all(&select(&x, &test_idx));
        let y_test = select(&y, &test_idx);

        let base = fit_weighted(&x_train, &y_train)?;

        let mut folds = Vec::with_capacity(CALIBRATION_FOLDS);
        let held_out_folds = stratified_folds(&y_train, CALIBRATION_FOLDS)?;
        for held_out in &held_out_folds {
            let mut in_fold = vec![false; y_train.len()];
            for &i in held_out {
                in_fold[i] = true;
            }
            let fit_idx: Vec<usize> = (0..y_train.len()).filter(|&i| !in_fold[i]).collect();

            let model = fit_weighted(&select(&x_train, &fit_idx), &select(&y_train, &fit_idx))?;
            let decisions: Vec<f64> = held_out
                .iter()
                .map(|&i| model.decision_function(&x_train[i]))
                .collect();
            let platt = PlattScaling::fit(&decisions, &select(&y_train, held_out))?;
            folds.push(CalibratedFold { model, platt });
        }

        let mut trained = TrainedRiskModel {
            schema_version: FEATURE_SCHEMA_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            scaler,
            base,
            folds,
            metrics: TrainingMetrics::default(),
        };

        let predicted: Vec<u8> = x_test
            .iter()
            .map(|row| u8::from(trained.probability(row) > 0.5))
            .collect();
        let mut metrics = TrainingMetrics::evaluate(&predicted, &y_test);
        metrics.samples_train = y_train.len();
        trained.metrics = metrics;

        info!(
            accuracy = metrics.accuracy,
            precision = metrics.precision,
            recall = metrics.recall,
            f1 = metrics.f1,
            samples_train = metrics.samples_train,
            samples_test = metrics.samples_test,
            "Risk classifier trained"
        );

        self.trained = Some(trained);
        Ok(metrics)
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<RiskPrediction, ModelError> {
        let model = self.trained.as_ref().ok_or(ModelError::NotTrained("risk"))?;
        let scaled = model.scaler.transform(&features.project(&model.feature_names));
        Ok(RiskPrediction::from_probability(model.probability(&scaled)))
    }

    /// Signed base-model weights, largest magnitude first. Positive weights
    /// push toward risky.
    pub fn feature_importance(&self, top_n: usize) -> Vec<FeatureWeight> {
        let Some(model) = self.trained.as_ref() else {
            return Vec::new();
        };
        let mut weights: Vec<FeatureWeight> = model
            .feature_names
            .iter()
            .zip(&model.base.weights)
            .map(|(name, &weight)| FeatureWeight {
                feature: name.clone(),
                weight: round_to(weight, 4),
            })
            .collect();
        weights.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));
        weights.truncate(top_n);
        weights
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let model = self.trained.as_ref().ok_or(ModelError::NotTrained("risk"))?;
        persist(model, path)?;
        info!(path = %path.display(), "Risk classifier saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let model: TrainedRiskModel = restore(path)?;
        if model.schema_version != FEATURE_SCHEMA_VERSION {
            warn!(
                stored = model.schema_version,
                current = FEATURE_SCHEMA_VERSION,
                "Risk classifier was trained on a different feature schema; missing features read as 0"
            );
        }
        info!(path = %path.display(), features = model.feature_names.len(), "Risk classifier loaded");
        Ok(RiskClassifier { trained: Some(model) })
    }
}

//! Owns the trained models for the life of the process.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ml::readiness::ReadinessModel;
use crate::ml::risk_classifier::RiskClassifier;
use crate::ml::synthetic::{QualityWeights, SyntheticGenerator};
use crate::ml::ModelError;

pub const RISK_MODEL_FILE: &str = "risk_model.bin";
pub const READINESS_MODEL_FILE: &str = "readiness_model.bin";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub seed: u64,
    /// Generator units for the claim corpus; each unit yields four rows.
    pub samples_per_class: usize,
    pub readiness_resumes: usize,
    pub quality_weights: QualityWeights,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            seed: 42,
            samples_per_class: 250,
            readiness_resumes: 800,
            quality_weights: QualityWeights::default(),
        }
    }
}

/// Trained models, shared read-only behind an `Arc` once loaded.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    pub risk: RiskClassifier,
    pub readiness: Option<ReadinessModel>,
}

impl ModelRegistry {
    /// Trains both models from freshly generated synthetic data.
    pub fn train(config: &TrainingConfig) -> Result<Self, ModelError> {
        let mut generator = SyntheticGenerator::new(config.seed);

        let claims = generator.claim_dataset(config.samples_per_class);
        info!(rows = claims.len(), "Generated synthetic claim corpus");
        let mut risk = RiskClassifier::new();
        risk.train(&claims, config.seed)?;

        let resumes = generator.resume_dataset(config.readiness_resumes, &config.quality_weights);
        info!(resumes = resumes.len(), "Generated synthetic résumé corpus");
        let readiness = ReadinessModel::train(&resumes, config.seed)?;

        Ok(ModelRegistry {
            risk,
            readiness: Some(readiness),
        })
    }

    /// Loads the classifier from `dir`; a missing or unreadable readiness
    /// model is tolerated since its estimate is secondary.
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let risk = RiskClassifier::load(&dir.join(RISK_MODEL_FILE))?;
        let readiness = match ReadinessModel::load(&dir.join(READINESS_MODEL_FILE)) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!("Readiness model unavailable: {e}");
                None
            }
        };
        Ok(ModelRegistry { risk, readiness })
    }

    pub fn save(&self, dir: &Path) -> Result<(), ModelError> {
        fs::create_dir_all(dir)
            .map_err(|e| ModelError::io(format!("creating {}", dir.display()), e))?;
        self.risk.save(&dir.join(RISK_MODEL_FILE))?;
        if let Some(readiness) = &self.readiness {
            readiness.save(&dir.join(READINESS_MODEL_FILE))?;
        }
        Ok(())
    }

    /// Loads from `dir`, or trains and saves when no classifier is there
    /// and `train_if_missing` is set. Otherwise the registry stays
    /// untrained and predictions fail with `NotTrained`.
    pub fn load_or_train(
        dir: &Path,
        train_if_missing: bool,
        config: &TrainingConfig,
    ) -> Result<Self, ModelError> {
        if dir.join(RISK_MODEL_FILE).exists() {
            return Self::load(dir);
        }
        if !train_if_missing {
            warn!(dir = %dir.display(), "No trained models found; predictions will be unavailable");
            return Ok(ModelRegistry::default());
        }

        info!(dir = %dir.display(), "No trained models found, training from synthetic data");
        let registry = Self::train(config)?;
        if let Err(e) = registry.save(dir) {
            warn!("Could not persist trained models: {e}");
        }
        Ok(registry)
    }

    pub fn is_ready(&self) -> bool {
        self.risk.is_trained()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            seed: 11,
            samples_per_class: 60,
            readiness_resumes: 80,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_missing_models_without_training_stay_untrained() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ModelRegistry::load_or_train(dir.path(), false, &small_config()).unwrap();
        assert!(!registry.is_ready());
        assert!(registry.readiness.is_none());
    }

    #[test]
    fn test_train_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let models_dir = dir.path().join("models");
        let registry = ModelRegistry::load_or_train(&models_dir, true, &small_config()).unwrap();
        assert!(registry.is_ready());
        assert!(models_dir.join(RISK_MODEL_FILE).exists());
        assert!(models_dir.join(READINESS_MODEL_FILE).exists());

        let reloaded = ModelRegistry::load(&models_dir).unwrap();
        assert!(reloaded.is_ready());
        assert!(reloaded.readiness.is_some());
    }

    #[test]
    fn test_missing_readiness_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ModelRegistry::train(&small_config()).unwrap();
        registry.risk.save(&dir.path().join(RISK_MODEL_FILE)).unwrap();

        let loaded = ModelRegistry::load(dir.path()).unwrap();
        assert!(loaded.is_ready());
        assert!(loaded.readiness.is_none());
    }

    #[test]
    fn test_oversized_model_file_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RISK_MODEL_FILE);
        let file = fs::File::create(&path).unwrap();
        file.set_len(crate::ml::MAX_MODEL_FILE_BYTES + 1).unwrap();
        let err = ModelRegistry::load(dir.path()).unwrap_err();
        assert!(matches!(err, ModelError::FileTooLarge { .. }));
    }
}

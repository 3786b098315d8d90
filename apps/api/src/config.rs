use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::ml::TrainingConfig;

/// Application configuration loaded from environment variables.
/// Every variable has a default, so an empty environment starts the service.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub model_dir: PathBuf,
    /// Train from synthetic data at startup when no saved models exist.
    pub train_if_missing: bool,
    pub training: TrainingConfig,
    /// JSON file overriding the built-in section heading rules.
    pub section_rules_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    /// Browser origins allowed by CORS. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = TrainingConfig::default();
        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            model_dir: std::env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models")),
            train_if_missing: parse_env("TRAIN_IF_MISSING", true)?,
            training: TrainingConfig {
                seed: parse_env("TRAINING_SEED", defaults.seed)?,
                samples_per_class: parse_env("SYNTHETIC_SAMPLES_PER_CLASS", defaults.samples_per_class)?,
                readiness_resumes: parse_env("READINESS_TRAINING_RESUMES", defaults.readiness_resumes)?,
                quality_weights: defaults.quality_weights,
            },
            section_rules_path: std::env::var("SECTION_RULES_PATH").ok().map(PathBuf::from),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
        })
    }
}

/// Reads `key`, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Comma-separated values, trimmed, empties dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_and_override() {
        assert_eq!(parse_env("CLAIMPROBE_TEST_UNSET_VAR", 7u16).unwrap(), 7);

        std::env::set_var("CLAIMPROBE_TEST_PORT", "9090");
        assert_eq!(parse_env("CLAIMPROBE_TEST_PORT", 8080u16).unwrap(), 9090);

        std::env::set_var("CLAIMPROBE_TEST_BAD_PORT", "not-a-port");
        assert!(parse_env("CLAIMPROBE_TEST_BAD_PORT", 8080u16).is_err());

        std::env::set_var("CLAIMPROBE_TEST_FLAG", "false");
        assert!(!parse_env("CLAIMPROBE_TEST_FLAG", true).unwrap());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" https://app.example.com, ,http://localhost:3000 "),
            vec!["https://app.example.com", "http://localhost:3000"]
        );
        assert!(split_list("").is_empty());
    }
}

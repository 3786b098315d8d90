//! Feature space, trained models and the synthetic corpus they learn from.

pub mod dataset;
pub mod features;
pub mod linear;
pub mod readiness;
pub mod registry;
pub mod risk_classifier;
pub mod synthetic;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use features::{build_feature_vector, FeatureVector, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
pub use readiness::{score_readiness, ReadinessLevel, ReadinessModel, ReadinessReport};
pub use registry::{ModelRegistry, TrainingConfig};
pub use risk_classifier::{RiskClassifier, RiskLevel, RiskPrediction};

/// Model files larger than this are refused before deserializing.
pub(crate) const MAX_MODEL_FILE_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{0} model is not trained")]
    NotTrained(&'static str),

    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error while {context}: {source}")]
    Serialization {
        context: String,
        #[source]
        source: bincode::Error,
    },

    #[error("model file {path} is {size} bytes, refusing to load")]
    FileTooLarge { path: String, size: u64 },

    #[error("insufficient training data: {0}")]
    InsufficientData(String),

    #[error("numerical failure: {0}")]
    Numerical(String),
}

impl ModelError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ModelError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn serialization(context: impl Into<String>, source: bincode::Error) -> Self {
        ModelError::Serialization {
            context: context.into(),
            source,
        }
    }
}

/// Writes `value` to `path` with bincode.
pub(crate) fn persist<T: Serialize>(value: &T, path: &Path) -> Result<(), ModelError> {
    let file = File::create(path)
        .map_err(|e| ModelError::io(format!("creating {}", path.display()), e))?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, value)
        .map_err(|e| ModelError::serialization(format!("writing {}", path.display()), e))
}

/// Reads a bincode value from `path`, rejecting oversized files.
pub(crate) fn restore<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let file = File::open(path)
        .map_err(|e| ModelError::io(format!("opening {}", path.display()), e))?;
    let size = file
        .metadata()
        .map_err(|e| ModelError::io(format!("reading metadata of {}", path.display()), e))?
        .len();
    if size > MAX_MODEL_FILE_BYTES {
        return Err(ModelError::FileTooLarge {
            path: path.display().to_string(),
            size,
        });
    }
    let reader = BufReader::new(file);
    bincode::deserialize_from(reader)
        .map_err(|e| ModelError::serialization(format!("reading {}", path.display()), e))
}

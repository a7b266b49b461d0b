//! Core logic: observation schema, feature scaling, inference and verdict.

use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

mod assessment;
mod model;
mod observation;
mod scaler;

pub use assessment::{Assessment, Verdict};
pub use model::{Activation, DenseLayer, DenseModel};
pub use observation::{
    field_spec, FieldGroup, FieldKind, FieldSpec, PatientObservation, Profile, FEATURE_ORDER,
    FIELD_SPECS, SCALED_FEATURES, SCALED_INDICES,
};
pub use scaler::FeatureScaler;

/// Default threshold below which P(healthy) is reported as risk.
pub const DEFAULT_RISK_THRESHOLD: f64 = 0.5;

/// Where the assets live and how the model output is read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PulseConfig {
    /// Directory holding the model and scaler exports.
    pub assets_dir: PathBuf,
    pub model_file: String,
    pub scaler_file: String,
    /// P(healthy) strictly below this value is flagged as risk.
    pub risk_threshold: f64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("models"),
            model_file: "heart_disease_nn_model.json".to_string(),
            scaler_file: "scaler.json".to_string(),
            risk_threshold: DEFAULT_RISK_THRESHOLD,
        }
    }
}

impl PulseConfig {
    pub fn model_path(&self) -> PathBuf {
        self.assets_dir.join(&self.model_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.assets_dir.join(&self.scaler_file)
    }

    pub fn validate(&self) -> Result<(), PulseError> {
        if !(self.risk_threshold > 0.0 && self.risk_threshold < 1.0) {
            return Err(PulseError::Config(format!(
                "risk_threshold must lie in (0, 1), got {}",
                self.risk_threshold
            )));
        }
        Ok(())
    }
}

/// A field that failed form validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors raised while loading assets or running a prediction.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("models not found: {}", display_paths(.paths))]
    AssetsMissing { paths: Vec<PathBuf> },
    #[error("cannot read {}: {reason}", .path.display())]
    AssetUnreadable { path: PathBuf, reason: String },
    #[error("invalid asset: {0}")]
    InvalidAsset(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid input: {}", display_violations(.0))]
    Validation(Vec<FieldViolation>),
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("inference failed: {0}")]
    Inference(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The loaded model and scaler pair, built once and reused per submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Predictor {
    model: DenseModel,
    scaler: FeatureScaler,
    threshold: f64,
}

impl Predictor {
    /// Validates both assets and the threshold before accepting them.
    pub fn new(
        model: DenseModel,
        scaler: FeatureScaler,
        config: &PulseConfig,
    ) -> Result<Self, PulseError> {
        config.validate()?;
        model.validate()?;
        scaler.validate()?;
        Ok(Self {
            model,
            scaler,
            threshold: config.risk_threshold,
        })
    }

    pub fn model(&self) -> &DenseModel {
        &self.model
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Fixed-order vector with the continuous columns scaled.
    pub fn feature_vector(
        &self,
        observation: &PatientObservation,
    ) -> Result<[f64; 13], PulseError> {
        let mut features = observation.to_features();
        self.scaler.transform(&mut features)?;
        Ok(features)
    }

    /// P(healthy) for a validated observation.
    pub fn predict(&self, observation: &PatientObservation) -> Result<f64, PulseError> {
        observation.validate()?;
        let features = self.feature_vector(observation)?;
        debug!("scaled features {features:?}");

        let probability = self.model.forward(&features)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(PulseError::Inference(format!(
                "model output {probability} is not a probability"
            )));
        }
        debug!("P(healthy) = {probability}");
        Ok(probability)
    }

    pub fn assess(&self, observation: &PatientObservation) -> Result<Assessment, PulseError> {
        let probability = self.predict(observation)?;
        Ok(Assessment::from_probability(probability, self.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_paths() {
        let config = PulseConfig::default();
        assert_eq!(
            config.model_path(),
            PathBuf::from("models/heart_disease_nn_model.json")
        );
        assert_eq!(config.scaler_path(), PathBuf::from("models/scaler.json"));
        config.validate().unwrap();
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let config = PulseConfig {
            risk_threshold: 1.0,
            ..PulseConfig::default()
        };
        assert!(matches!(config.validate(), Err(PulseError::Config(_))));
    }

    #[test]
    fn missing_assets_message_lists_paths() {
        let err = PulseError::AssetsMissing {
            paths: vec![PathBuf::from("models/a.json"), PathBuf::from("models/b.json")],
        };
        assert_eq!(err.to_string(), "models not found: models/a.json, models/b.json");
    }
}

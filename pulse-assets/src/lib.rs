//! Loads the exported model and scaler artifacts into a `Predictor`.

use std::fs;
use std::path::Path;

use log::{debug, info};
use pulse_core::{DenseModel, FeatureScaler, Predictor, PulseConfig, PulseError};
use serde::de::DeserializeOwned;

/// Loads and validates both assets named by `config`.
///
/// Both files are checked before either is parsed so a missing pair is
/// reported in one error.
pub fn load_assets(config: &PulseConfig) -> Result<Predictor, PulseError> {
    let model_path = config.model_path();
    let scaler_path = config.scaler_path();

    let missing: Vec<_> = [&model_path, &scaler_path]
        .into_iter()
        .filter(|path| !path.is_file())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(PulseError::AssetsMissing { paths: missing });
    }

    let model = load_model(&model_path)?;
    let scaler = load_scaler(&scaler_path)?;
    let predictor = Predictor::new(model, scaler, config)?;

    info!(
        "loaded {} ({}) and scaler from {}",
        predictor.model().name.as_deref().unwrap_or("model"),
        predictor.model().architecture(),
        config.assets_dir.display()
    );
    Ok(predictor)
}

/// Builds a `Predictor` from in-memory JSON exports.
pub fn predictor_from_strs(
    model_json: &str,
    scaler_json: &str,
    config: &PulseConfig,
) -> Result<Predictor, PulseError> {
    let model = parse_model_str(model_json)?;
    let scaler = parse_scaler_str(scaler_json)?;
    Predictor::new(model, scaler, config)
}

/// Parses a dense model export.
pub fn parse_model_str(json: &str) -> Result<DenseModel, PulseError> {
    let model: DenseModel = parse_json(json, "model")?;
    model.validate()?;
    debug!("model with {} layers parsed", model.layers.len());
    Ok(model)
}

/// Parses a fitted scaler export.
pub fn parse_scaler_str(json: &str) -> Result<FeatureScaler, PulseError> {
    let scaler: FeatureScaler = parse_json(json, "scaler")?;
    scaler.validate()?;
    Ok(scaler)
}

pub fn load_model(path: &Path) -> Result<DenseModel, PulseError> {
    parse_model_str(&read_asset(path)?).map_err(|err| with_path(err, path))
}

pub fn load_scaler(path: &Path) -> Result<FeatureScaler, PulseError> {
    parse_scaler_str(&read_asset(path)?).map_err(|err| with_path(err, path))
}

fn read_asset(path: &Path) -> Result<String, PulseError> {
    fs::read_to_string(path).map_err(|err| PulseError::AssetUnreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

fn parse_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, PulseError> {
    serde_json::from_str(json)
        .map_err(|err| PulseError::InvalidAsset(format!("{what} export is malformed: {err}")))
}

fn with_path(err: PulseError, path: &Path) -> PulseError {
    match err {
        PulseError::InvalidAsset(reason) => PulseError::AssetUnreadable {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    }
}

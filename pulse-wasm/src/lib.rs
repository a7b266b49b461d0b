//! Framework-neutral WASM <-> JavaScript bridge.

use pulse_core::{PatientObservation, Profile, PulseConfig, PulseError, FIELD_SPECS};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsPulseConfig {
    #[serde(default)]
    risk_threshold: Option<f64>,
}

impl From<JsPulseConfig> for PulseConfig {
    fn from(cfg: JsPulseConfig) -> Self {
        let mut base = PulseConfig::default();
        if let Some(threshold) = cfg.risk_threshold {
            base.risk_threshold = threshold;
        }
        base
    }
}

/// Scores one observation against the model and scaler exports.
///
/// The browser has no filesystem, so both assets arrive as JSON text.
#[wasm_bindgen]
pub fn assess_observation(
    observation: JsValue,
    model_json: &str,
    scaler_json: &str,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let observation: PatientObservation = from_value(observation)
        .map_err(|err| JsValue::from_str(&format!("Cannot read observation: {err}")))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsPulseConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Cannot read config: {err}")))?;
            PulseConfig::from(cfg)
        }
        None => PulseConfig::default(),
    };

    let predictor = pulse_assets::predictor_from_strs(model_json, scaler_json, &cfg)
        .map_err(|err| JsValue::from_str(&format_pulse_error(err)))?;
    let assessment = predictor
        .assess(&observation)
        .map_err(|err| JsValue::from_str(&format_pulse_error(err)))?;

    to_value(&assessment)
        .map_err(|err| JsValue::from_str(&format!("Cannot serialize assessment: {err}")))
}

/// Observation pre-filled with the form defaults.
#[wasm_bindgen]
pub fn default_observation() -> Result<JsValue, JsValue> {
    to_value(&PatientObservation::default()).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Observation for a named quick-load profile (`healthy`, `high-risk`, `default`).
#[wasm_bindgen]
pub fn profile_observation(name: &str) -> Result<JsValue, JsValue> {
    let profile = Profile::parse(name)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown profile {name}")))?;
    to_value(&PatientObservation::profile(profile))
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// The form schema, for hosts that render their own inputs.
#[wasm_bindgen]
pub fn field_specs() -> Result<JsValue, JsValue> {
    to_value(&FIELD_SPECS[..]).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn format_pulse_error(err: PulseError) -> String {
    format!("LifePulse error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_override_replaces_default() {
        let cfg = PulseConfig::from(JsPulseConfig {
            risk_threshold: Some(0.7),
        });
        assert_eq!(cfg.risk_threshold, 0.7);
        assert_eq!(cfg.assets_dir, PulseConfig::default().assets_dir);
    }

    #[test]
    fn omitted_threshold_keeps_one_half() {
        let cfg = PulseConfig::from(JsPulseConfig {
            risk_threshold: None,
        });
        assert_eq!(cfg.risk_threshold, 0.5);
    }
}

//! Inference over an already trained feed-forward network.

use serde::{Deserialize, Serialize};

use crate::observation::FEATURE_ORDER;
use crate::PulseError;

/// Activation applied after a dense layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
    Linear,
}

impl Activation {
    fn apply(self, z: f64) -> f64 {
        match self {
            Self::Relu => z.max(0.0),
            Self::Sigmoid => 1.0 / (1.0 + (-z).exp()),
            Self::Tanh => z.tanh(),
            Self::Linear => z,
        }
    }
}

/// A fully connected layer as exported from the training framework.
///
/// `kernel` is laid out inputs x units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DenseLayer {
    pub units: usize,
    pub activation: Activation,
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

impl DenseLayer {
    pub fn inputs(&self) -> usize {
        self.kernel.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        (0..self.units)
            .map(|unit| {
                let z = input
                    .iter()
                    .zip(&self.kernel)
                    .fold(self.bias[unit], |acc, (x, row)| acc + x * row[unit]);
                self.activation.apply(z)
            })
            .collect()
    }
}

/// The trained classifier. Its single output is read as P(healthy).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DenseModel {
    #[serde(default)]
    pub name: Option<String>,
    /// Column order the network was trained on, when the export records it.
    #[serde(default)]
    pub features: Option<Vec<String>>,
    /// Held-out accuracy reported by the training run.
    #[serde(default)]
    pub reported_accuracy: Option<f64>,
    pub layers: Vec<DenseLayer>,
}

impl DenseModel {
    /// Checks that the layers chain from 13 inputs to a single output.
    pub fn validate(&self) -> Result<(), PulseError> {
        if let Some(features) = &self.features {
            if features.iter().map(String::as_str).ne(FEATURE_ORDER) {
                return Err(PulseError::InvalidAsset(format!(
                    "model was trained on {features:?}, expected {FEATURE_ORDER:?}"
                )));
            }
        }

        let Some(last) = self.layers.last() else {
            return Err(PulseError::InvalidAsset("model has no layers".to_string()));
        };
        if last.units != 1 {
            return Err(PulseError::InvalidAsset(format!(
                "model output layer has {} units, expected 1",
                last.units
            )));
        }

        let mut width = FEATURE_ORDER.len();
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.inputs() != width {
                return Err(PulseError::InvalidAsset(format!(
                    "layer {idx} takes {} inputs, previous width is {width}",
                    layer.inputs()
                )));
            }
            if layer.bias.len() != layer.units
                || layer.kernel.iter().any(|row| row.len() != layer.units)
            {
                return Err(PulseError::InvalidAsset(format!(
                    "layer {idx} weights do not match its {} units",
                    layer.units
                )));
            }
            let finite = layer
                .bias
                .iter()
                .chain(layer.kernel.iter().flatten())
                .all(|w| w.is_finite());
            if !finite {
                return Err(PulseError::InvalidAsset(format!(
                    "layer {idx} contains non-finite weights"
                )));
            }
            width = layer.units;
        }

        Ok(())
    }

    /// One forward pass, returning the single output scalar.
    ///
    /// The layer shapes are checked first, so a model that never went
    /// through [`DenseModel::validate`] errors instead of panicking.
    pub fn forward(&self, input: &[f64]) -> Result<f64, PulseError> {
        self.validate()?;
        if input.len() != FEATURE_ORDER.len() {
            return Err(PulseError::FeatureCount {
                expected: FEATURE_ORDER.len(),
                actual: input.len(),
            });
        }

        let mut activations = input.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        match activations.as_slice() {
            [output] => Ok(*output),
            other => Err(PulseError::Inference(format!(
                "model produced {} outputs",
                other.len()
            ))),
        }
    }

    pub fn hidden_layers(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }

    /// Short description shown next to the form.
    pub fn architecture(&self) -> String {
        match self.hidden_layers() {
            0 => "Logistic output (no hidden layers)".to_string(),
            1 => "Neural Network (1 Hidden Layer)".to_string(),
            n => format!("Neural Network ({n} Hidden Layers)"),
        }
    }
}

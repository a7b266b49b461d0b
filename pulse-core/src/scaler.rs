//! Fitted per-column normalization for the continuous features.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::observation::{SCALED_FEATURES, SCALED_INDICES};
use crate::PulseError;

/// Parameters of an already fitted scaler.
///
/// Both kinds store one value per entry of `columns`, which must equal
/// [`SCALED_FEATURES`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureScaler {
    /// `(x - mean) / scale`.
    Standard {
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// `x * scale + min`, the fitted form of min/max normalization.
    MinMax {
        columns: Vec<String>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl FeatureScaler {
    pub fn columns(&self) -> &[String] {
        match self {
            Self::Standard { columns, .. } | Self::MinMax { columns, .. } => columns,
        }
    }

    /// Checks column names and parameter lengths.
    pub fn validate(&self) -> Result<(), PulseError> {
        self.check_shape()?;

        if let Self::Standard { scale, .. } = self {
            for (column, value) in self.columns().iter().zip(scale) {
                if *value == 0.0 {
                    warn!("scaler column {column} has zero scale, values are only centred");
                }
            }
        }

        Ok(())
    }

    fn check_shape(&self) -> Result<(), PulseError> {
        let columns = self.columns();
        if columns.iter().map(String::as_str).ne(SCALED_FEATURES) {
            return Err(PulseError::InvalidAsset(format!(
                "scaler columns {columns:?} do not match {SCALED_FEATURES:?}"
            )));
        }

        let (offset, scale) = match self {
            Self::Standard { mean, scale, .. } => (mean, scale),
            Self::MinMax { min, scale, .. } => (min, scale),
        };
        for params in [offset, scale] {
            if params.len() != SCALED_FEATURES.len() {
                return Err(PulseError::InvalidAsset(format!(
                    "scaler expects {} parameters per vector, found {}",
                    SCALED_FEATURES.len(),
                    params.len()
                )));
            }
            if params.iter().any(|value| !value.is_finite()) {
                return Err(PulseError::InvalidAsset(
                    "scaler parameters must be finite".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Scales the five continuous positions of a feature vector in place.
    /// The discrete positions are left untouched.
    pub fn transform(&self, features: &mut [f64; 13]) -> Result<(), PulseError> {
        self.check_shape()?;
        for (slot, idx) in SCALED_INDICES.iter().enumerate() {
            let x = features[*idx];
            features[*idx] = match self {
                Self::Standard { mean, scale, .. } => {
                    let divisor = if scale[slot] == 0.0 { 1.0 } else { scale[slot] };
                    (x - mean[slot]) / divisor
                }
                Self::MinMax { min, scale, .. } => x * scale[slot] + min[slot],
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        SCALED_FEATURES.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn standard_only_touches_continuous_columns() {
        let scaler = FeatureScaler::Standard {
            columns: columns(),
            mean: vec![50.0, 120.0, 200.0, 150.0, 1.0],
            scale: vec![10.0, 20.0, 50.0, 25.0, 0.5],
        };
        scaler.validate().unwrap();

        let mut features = [60.0, 1.0, 2.0, 140.0, 250.0, 1.0, 2.0, 100.0, 1.0, 2.0, 1.0, 3.0, 2.0];
        scaler.transform(&mut features).unwrap();
        assert_eq!(
            features,
            [1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0, -2.0, 1.0, 2.0, 1.0, 3.0, 2.0]
        );
    }

    #[test]
    fn zero_scale_centres_only() {
        let scaler = FeatureScaler::Standard {
            columns: columns(),
            mean: vec![10.0, 0.0, 0.0, 0.0, 0.0],
            scale: vec![0.0, 1.0, 1.0, 1.0, 1.0],
        };
        let mut features = [12.0; 13];
        scaler.transform(&mut features).unwrap();
        assert_eq!(features[0], 2.0);
    }

    #[test]
    fn min_max_applies_fitted_affine() {
        let scaler = FeatureScaler::MinMax {
            columns: columns(),
            min: vec![-5.0, 0.0, 0.0, 0.0, 0.0],
            scale: vec![0.25, 1.0, 1.0, 1.0, 1.0],
        };
        let mut features = [20.0; 13];
        scaler.transform(&mut features).unwrap();
        assert_eq!(features[0], 0.0);
        assert_eq!(features[1], 20.0);
    }

    #[test]
    fn rejects_reordered_columns() {
        let mut cols = columns();
        cols.swap(0, 1);
        let scaler = FeatureScaler::Standard {
            columns: cols,
            mean: vec![0.0; 5],
            scale: vec![1.0; 5],
        };
        assert!(matches!(scaler.validate(), Err(PulseError::InvalidAsset(_))));
    }

    #[test]
    fn transform_rejects_unvalidated_short_parameters() {
        let scaler = FeatureScaler::Standard {
            columns: columns(),
            mean: vec![0.0; 3],
            scale: vec![1.0; 5],
        };
        let mut features = [1.0; 13];
        assert!(matches!(
            scaler.transform(&mut features),
            Err(PulseError::InvalidAsset(_))
        ));
        assert_eq!(features, [1.0; 13]);
    }

    #[test]
    fn rejects_short_parameters() {
        let scaler = FeatureScaler::MinMax {
            columns: columns(),
            min: vec![0.0; 4],
            scale: vec![1.0; 5],
        };
        assert!(scaler.validate().is_err());
    }
}

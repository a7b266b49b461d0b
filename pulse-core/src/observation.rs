//! The patient observation record and the form schema that produces it.

use serde::{Deserialize, Serialize};

use crate::{FieldViolation, PulseError};

/// Column order the model and scaler were fit on.
pub const FEATURE_ORDER: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Continuous columns that go through the fitted scaler, in scaler column order.
pub const SCALED_FEATURES: [&str; 5] = ["age", "trestbps", "chol", "thalach", "oldpeak"];

/// Positions of [`SCALED_FEATURES`] inside [`FEATURE_ORDER`].
pub const SCALED_INDICES: [usize; 5] = [0, 3, 4, 7, 9];

/// One form submission. Consumed once by the predictor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PatientObservation {
    /// Age in years.
    pub age: u32,
    /// Biological sex code: 0 female, 1 male.
    pub sex: u8,
    /// Chest pain type code.
    pub cp: u8,
    /// Resting blood pressure (mm Hg).
    pub trestbps: u32,
    /// Serum cholesterol (mg/dl).
    pub chol: u32,
    /// Fasting blood sugar above 120 mg/dl.
    pub fbs: bool,
    /// Resting ECG code.
    pub restecg: u8,
    /// Maximum heart rate reached during exercise.
    pub thalach: u32,
    /// Exercise induced angina.
    pub exang: bool,
    /// ST depression induced by exercise relative to rest.
    pub oldpeak: f64,
    /// Slope of the peak exercise ST segment.
    pub slope: u8,
    /// Number of major vessels colored by fluoroscopy.
    pub ca: u8,
    /// Thalassemia code.
    pub thal: u8,
}

/// Quick-load presets offered next to the form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Default,
    Healthy,
    HighRisk,
}

impl Profile {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "default" => Some(Self::Default),
            "healthy" => Some(Self::Healthy),
            "high-risk" | "risk" => Some(Self::HighRisk),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Healthy => "Healthy",
            Self::HighRisk => "High Risk",
        }
    }
}

impl Default for PatientObservation {
    fn default() -> Self {
        Self {
            age: 25,
            sex: 1,
            cp: 0,
            trestbps: 110,
            chol: 150,
            fbs: false,
            restecg: 0,
            thalach: 175,
            exang: false,
            oldpeak: 0.0,
            slope: 2,
            ca: 0,
            thal: 2,
        }
    }
}

impl PatientObservation {
    /// Observation pre-filled from a quick-load profile.
    pub fn profile(profile: Profile) -> Self {
        match profile {
            Profile::Default => Self::default(),
            Profile::Healthy => Self {
                age: 50,
                sex: 1,
                cp: 2,
                trestbps: 120,
                chol: 200,
                fbs: false,
                restecg: 0,
                thalach: 160,
                exang: false,
                oldpeak: 0.0,
                slope: 0,
                ca: 0,
                thal: 1,
            },
            Profile::HighRisk => Self {
                age: 65,
                sex: 1,
                cp: 0,
                trestbps: 160,
                chol: 300,
                fbs: true,
                restecg: 2,
                thalach: 100,
                exang: true,
                oldpeak: 2.5,
                slope: 1,
                ca: 2,
                thal: 1,
            },
        }
    }

    /// Unscaled feature vector in [`FEATURE_ORDER`].
    pub fn to_features(&self) -> [f64; 13] {
        [
            f64::from(self.age),
            f64::from(self.sex),
            f64::from(self.cp),
            f64::from(self.trestbps),
            f64::from(self.chol),
            flag(self.fbs),
            f64::from(self.restecg),
            f64::from(self.thalach),
            flag(self.exang),
            self.oldpeak,
            f64::from(self.slope),
            f64::from(self.ca),
            f64::from(self.thal),
        ]
    }

    /// Rebuilds an observation from an unscaled vector in [`FEATURE_ORDER`].
    ///
    /// Values are rounded to the field's integer type; range checks are left
    /// to [`PatientObservation::validate`].
    pub fn from_features(values: &[f64]) -> Result<Self, PulseError> {
        let v: &[f64; 13] = values.try_into().map_err(|_| PulseError::FeatureCount {
            expected: FEATURE_ORDER.len(),
            actual: values.len(),
        })?;

        Ok(Self {
            age: whole(v[0]),
            sex: code(v[1]),
            cp: code(v[2]),
            trestbps: whole(v[3]),
            chol: whole(v[4]),
            fbs: v[5] >= 0.5,
            restecg: code(v[6]),
            thalach: whole(v[7]),
            exang: v[8] >= 0.5,
            oldpeak: v[9],
            slope: code(v[10]),
            ca: code(v[11]),
            thal: code(v[12]),
        })
    }

    /// Checks every field against [`FIELD_SPECS`], collecting all violations.
    pub fn validate(&self) -> Result<(), PulseError> {
        let violations: Vec<FieldViolation> = FIELD_SPECS
            .iter()
            .zip(self.to_features())
            .filter_map(|(spec, value)| spec.check(value).err())
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(PulseError::Validation(violations))
        }
    }

    /// Raw value of a field by key.
    pub fn get(&self, key: &str) -> Option<f64> {
        FEATURE_ORDER
            .iter()
            .position(|name| *name == key)
            .map(|idx| self.to_features()[idx])
    }

    /// Sets a field by key from a raw value.
    ///
    /// Unknown keys and values the field's schema rejects leave the
    /// observation unchanged.
    pub fn set(&mut self, key: &str, value: f64) -> Result<(), PulseError> {
        let idx = FEATURE_ORDER
            .iter()
            .position(|name| *name == key)
            .ok_or_else(|| {
                PulseError::Validation(vec![FieldViolation {
                    field: key.to_string(),
                    message: "unknown field".to_string(),
                }])
            })?;
        FIELD_SPECS[idx]
            .check(value)
            .map_err(|violation| PulseError::Validation(vec![violation]))?;
        let mut values = self.to_features();
        values[idx] = value;
        *self = Self::from_features(&values)?;
        Ok(())
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn whole(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

fn code(value: f64) -> u8 {
    value.round().clamp(0.0, f64::from(u8::MAX)) as u8
}

/// Form section a field is rendered in.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    Vitals,
    StressTest,
    AdvancedMarkers,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 3] = [Self::Vitals, Self::StressTest, Self::AdvancedMarkers];

    pub fn title(self) -> &'static str {
        match self {
            Self::Vitals => "Patient Details & Vitals",
            Self::StressTest => "Cardiac Stress Test (ECG/EKG Data)",
            Self::AdvancedMarkers => "Advanced Markers (Blood/Scan)",
        }
    }
}

/// Input widget and accepted values for a field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Number { min: f64, max: f64, step: f64 },
    Choice { options: &'static [&'static str] },
    Flag,
}

/// Schema entry for one form field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub help: Option<&'static str>,
    pub group: FieldGroup,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Display label for a choice code, `"Yes"`/`"No"` for flags.
    pub fn option_label(&self, code: usize) -> Option<&'static str> {
        match self.kind {
            FieldKind::Choice { options } => options.get(code).copied(),
            FieldKind::Flag => match code {
                0 => Some("No"),
                1 => Some("Yes"),
                _ => None,
            },
            FieldKind::Number { .. } => None,
        }
    }

    /// Validates a raw value for this field.
    pub fn check(&self, value: f64) -> Result<(), FieldViolation> {
        let message = match self.kind {
            _ if !value.is_finite() => Some("must be a finite number".to_string()),
            FieldKind::Number { min, max, .. } if !(min..=max).contains(&value) => {
                Some(format!("{value} out of range [{min}, {max}]"))
            }
            FieldKind::Number { step, .. } if step.fract() == 0.0 && value.fract() != 0.0 => {
                Some(format!("{value} must be a whole number"))
            }
            FieldKind::Choice { options }
                if value.fract() != 0.0 || value < 0.0 || value >= options.len() as f64 =>
            {
                Some(format!("{value} is not one of 0..={}", options.len() - 1))
            }
            FieldKind::Flag if value != 0.0 && value != 1.0 => {
                Some(format!("{value} must be 0 or 1"))
            }
            _ => None,
        };

        match message {
            Some(message) => Err(FieldViolation {
                field: self.key.to_string(),
                message,
            }),
            None => Ok(()),
        }
    }
}

/// Looks up a field spec by key.
pub fn field_spec(key: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|spec| spec.key == key)
}

/// Form schema, one entry per feature in [`FEATURE_ORDER`].
pub static FIELD_SPECS: [FieldSpec; 13] = [
    FieldSpec {
        key: "age",
        label: "Age (Years)",
        help: None,
        group: FieldGroup::Vitals,
        kind: FieldKind::Number { min: 1.0, max: 120.0, step: 1.0 },
    },
    FieldSpec {
        key: "sex",
        label: "Biological Sex",
        help: None,
        group: FieldGroup::Vitals,
        kind: FieldKind::Choice { options: &["Female", "Male"] },
    },
    FieldSpec {
        key: "cp",
        label: "Chest Pain Type",
        help: None,
        group: FieldGroup::Vitals,
        kind: FieldKind::Choice {
            options: &["Typical Angina", "Atypical Angina", "Non-anginal Pain", "Asymptomatic"],
        },
    },
    FieldSpec {
        key: "trestbps",
        label: "Resting Blood Pressure (mm Hg)",
        help: None,
        group: FieldGroup::Vitals,
        kind: FieldKind::Number { min: 80.0, max: 200.0, step: 1.0 },
    },
    FieldSpec {
        key: "chol",
        label: "Cholesterol (mg/dl)",
        help: None,
        group: FieldGroup::Vitals,
        kind: FieldKind::Number { min: 100.0, max: 600.0, step: 1.0 },
    },
    FieldSpec {
        key: "fbs",
        label: "Fasting Blood Sugar > 120?",
        help: None,
        group: FieldGroup::Vitals,
        kind: FieldKind::Flag,
    },
    FieldSpec {
        key: "restecg",
        label: "Resting ECG",
        help: Some("Results from a resting EKG. Select 'Normal' if you haven't had one."),
        group: FieldGroup::StressTest,
        kind: FieldKind::Choice { options: &["Normal", "Abnormality", "Hypertrophy"] },
    },
    FieldSpec {
        key: "thalach",
        label: "Max Heart Rate",
        help: Some(
            "The highest heart rate you achieved during exercise. Normal is usually 220 minus your age.",
        ),
        group: FieldGroup::StressTest,
        kind: FieldKind::Number { min: 60.0, max: 220.0, step: 1.0 },
    },
    FieldSpec {
        key: "exang",
        label: "Pain during exercise?",
        help: Some("Did you feel chest pain (Angina) while exercising? Select 'No' if unsure."),
        group: FieldGroup::StressTest,
        kind: FieldKind::Flag,
    },
    FieldSpec {
        key: "oldpeak",
        label: "ST Depression",
        help: Some("A value measured on an ECG graph. 0.0 is normal. Higher numbers indicate stress."),
        group: FieldGroup::StressTest,
        kind: FieldKind::Number { min: 0.0, max: 6.2, step: 0.1 },
    },
    FieldSpec {
        key: "slope",
        label: "ST Slope",
        help: Some("The shape of the wave on your ECG. 'Upsloping' is usually healthy."),
        group: FieldGroup::StressTest,
        kind: FieldKind::Choice {
            options: &["Upsloping (Best)", "Flat (Ok)", "Downsloping (Bad)"],
        },
    },
    FieldSpec {
        key: "ca",
        label: "Major Vessels (Fluoroscopy)",
        help: Some(
            "How many major blood vessels were colored by dye during a scan. 0 is normal/clear. Higher means blockages.",
        ),
        group: FieldGroup::AdvancedMarkers,
        kind: FieldKind::Choice { options: &["0", "1", "2", "3", "4"] },
    },
    FieldSpec {
        key: "thal",
        label: "Thalassemia",
        help: Some(
            "A blood disorder. 'Normal' is... normal. 'Fixed/Reversable Defect' indicates blood flow issues.",
        ),
        group: FieldGroup::AdvancedMarkers,
        kind: FieldKind::Choice {
            options: &["Unknown", "Normal", "Fixed Defect", "Reversable Defect"],
        },
    },
];

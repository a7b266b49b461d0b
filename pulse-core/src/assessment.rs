//! Verdict derived from the model output and the text the result card shows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary outcome of a diagnostic scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Healthy,
    HighRisk,
}

impl Verdict {
    /// Risk is flagged strictly below the threshold; a probability equal to
    /// the threshold counts as healthy.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability < threshold {
            Self::HighRisk
        } else {
            Self::Healthy
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Self::Healthy => "Low Risk / Healthy Profile",
            Self::HighRisk => "High Cardiac Risk Detected",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Self::Healthy => "Patient vitals are within healthy parameters.",
            Self::HighRisk => {
                "LifePulse has identified patterns consistent with heart disease."
            }
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Healthy => "Maintain current lifestyle and routine checkups.",
            Self::HighRisk => "Immediate consultation with a cardiologist is advised.",
        }
    }

    pub fn next_step(self) -> &'static str {
        match self {
            Self::Healthy => "No immediate intervention required.",
            Self::HighRisk => "Perform detailed stress testing and angiography.",
        }
    }
}

/// Everything the result card renders for one submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub assessed_at: DateTime<Utc>,
    /// Raw model output, P(healthy).
    pub probability: f64,
    pub verdict: Verdict,
    /// Confidence in the verdict that was reached.
    pub confidence: f64,
    /// Fill level of the risk gauge, always within `[0, 1]`.
    pub gauge: f64,
    pub headline: String,
    pub summary: String,
    pub recommendation: String,
    pub next_step: String,
}

impl Assessment {
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        let verdict = Verdict::from_probability(probability, threshold);
        let confidence = match verdict {
            Verdict::Healthy => probability,
            Verdict::HighRisk => 1.0 - probability,
        };

        Self {
            assessed_at: Utc::now(),
            probability,
            verdict,
            confidence,
            gauge: probability.clamp(0.0, 1.0),
            headline: verdict.headline().to_string(),
            summary: verdict.summary().to_string(),
            recommendation: verdict.recommendation().to_string(),
            next_step: verdict.next_step().to_string(),
        }
    }

    pub fn is_risk(&self) -> bool {
        self.verdict == Verdict::HighRisk
    }

    /// Confidence as a percentage with one decimal, e.g. `97.3%`.
    pub fn confidence_label(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_half_is_healthy() {
        let assessment = Assessment::from_probability(0.5, 0.5);
        assert_eq!(assessment.verdict, Verdict::Healthy);
        assert_eq!(assessment.confidence, 0.5);
        assert_eq!(assessment.confidence_label(), "50.0%");
    }

    #[test]
    fn just_below_one_half_is_risk() {
        let p = 0.5 - f64::EPSILON;
        assert_eq!(Verdict::from_probability(p, 0.5), Verdict::HighRisk);
    }

    #[test]
    fn risk_confidence_is_inverted() {
        let assessment = Assessment::from_probability(0.25, 0.5);
        assert!(assessment.is_risk());
        assert_eq!(assessment.confidence, 0.75);
        assert_eq!(assessment.gauge, 0.25);
        assert_eq!(assessment.headline, "High Cardiac Risk Detected");
        assert_eq!(assessment.confidence_label(), "75.0%");
    }

    #[test]
    fn healthy_copy() {
        let assessment = Assessment::from_probability(0.875, 0.5);
        assert_eq!(assessment.verdict, Verdict::Healthy);
        assert_eq!(assessment.confidence_label(), "87.5%");
        assert_eq!(assessment.next_step, "No immediate intervention required.");
    }
}

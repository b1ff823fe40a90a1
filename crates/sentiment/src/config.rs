//! Scoring constants
//!
//! The calibration is a set of engineering priors, not domain truth, so every
//! constant is configuration rather than a literal in the scorer.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable constants for keyword scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Net signal must exceed this (in either direction) to leave Neutral
    pub threshold: f64,
    /// Confidence reported when there is no directional evidence
    pub baseline: f64,
    /// Confidence approached by overwhelming one-sided evidence
    pub ceiling: f64,
    /// Total signal at which evidence strength reaches ~63%
    pub evidence_scale: f64,
    /// Multiplier applied to the title tally relative to the summary
    pub title_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            baseline: 50.0,
            ceiling: 95.0,
            evidence_scale: 3.0,
            title_weight: 1.5,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::Threshold(self.threshold));
        }
        if !(0.0..=100.0).contains(&self.baseline)
            || !(0.0..=100.0).contains(&self.ceiling)
            || self.baseline > self.ceiling
        {
            return Err(ConfigError::Range {
                baseline: self.baseline,
                ceiling: self.ceiling,
            });
        }
        if !self.evidence_scale.is_finite() || self.evidence_scale <= 0.0 {
            return Err(ConfigError::EvidenceScale(self.evidence_scale));
        }
        if !self.title_weight.is_finite() || self.title_weight < 1.0 {
            return Err(ConfigError::TitleWeight(self.title_weight));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = ScoringConfig {
            threshold: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Threshold(0.0)));
    }

    #[test]
    fn test_baseline_above_ceiling_rejected() {
        let config = ScoringConfig {
            baseline: 90.0,
            ceiling: 80.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_title_weight_below_one_rejected() {
        let config = ScoringConfig {
            title_weight: 0.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TitleWeight(0.5)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ScoringConfig = serde_json::from_str(r#"{"threshold": 1.0}"#).unwrap();
        assert_eq!(config.threshold, 1.0);
        assert_eq!(config.baseline, 50.0);
    }
}

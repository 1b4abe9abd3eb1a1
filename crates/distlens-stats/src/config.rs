use serde::{Deserialize, Serialize};

use crate::{
    boxplot::{DEFAULT_WHISKER_MULTIPLIER, sanitize_whisker_multiplier},
    hypothesis::TestMode,
    kde::{DEFAULT_DENSITY_STEPS, sanitize_bandwidth_factor},
};

/// User-tunable knobs of a distribution analysis.
///
/// Deserializes from partial documents; missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use distlens_stats::{config::AnalysisConfig, hypothesis::TestMode};
///
/// let config: AnalysisConfig =
///     serde_json::from_str(r#"{"mode": "nonparametric", "density_steps": 0}"#).unwrap();
/// let config = config.sanitized();
/// assert_eq!(config.mode, TestMode::Nonparametric);
/// assert_eq!(config.whisker_multiplier, 1.5);
/// assert_eq!(config.density_steps, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fence distance in IQRs for box-plot outliers.
    pub whisker_multiplier: f64,
    /// Scale applied to the Silverman bandwidth.
    pub bandwidth_factor: f64,
    /// Number of grid points per density curve.
    pub density_steps: usize,
    pub mode: TestMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            whisker_multiplier: DEFAULT_WHISKER_MULTIPLIER,
            bandwidth_factor: 1.0,
            density_steps: DEFAULT_DENSITY_STEPS,
            mode: TestMode::Auto,
        }
    }
}

impl AnalysisConfig {
    /// Replaces invalid numeric settings with their defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            whisker_multiplier: sanitize_whisker_multiplier(self.whisker_multiplier),
            bandwidth_factor: sanitize_bandwidth_factor(self.bandwidth_factor),
            density_steps: self.density_steps.max(2),
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trip() {
        let json = serde_json::to_string(&AnalysisConfig::default()).unwrap();
        let parsed: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, AnalysisConfig::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        let parsed: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, AnalysisConfig::default());
    }

    #[test]
    fn test_sanitized_replaces_invalid_values() {
        let config = AnalysisConfig {
            whisker_multiplier: f64::INFINITY,
            bandwidth_factor: -1.0,
            density_steps: 1,
            mode: TestMode::Parametric,
        }
        .sanitized();
        assert_eq!(config.whisker_multiplier, DEFAULT_WHISKER_MULTIPLIER);
        assert_eq!(config.bandwidth_factor, 1.0);
        assert_eq!(config.density_steps, 2);
        assert_eq!(config.mode, TestMode::Parametric);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let config = AnalysisConfig {
            whisker_multiplier: 3.0,
            bandwidth_factor: 0.25,
            density_steps: 256,
            mode: TestMode::Nonparametric,
        };
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(serde_json::from_str::<AnalysisConfig>(r#"{"mode": "bayes"}"#).is_err());
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::waterfall::DEFAULT_RECOVERY_MARGIN;

/// How the inventory caption picks its "peak" quarter
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeakQuarterRule {
    /// The fourth entry of the quarterly plan, whatever its capital
    #[default]
    Positional,
    /// The quarter with the largest capital requirement (first one on ties)
    MaxCapital,
}

/// Top-level configuration. Every section is optional in YAML.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub decomposition: DecompositionConfig,
    #[serde(default)]
    pub captions: CaptionConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let margin = self.decomposition.recovery_margin;
        if !margin.is_finite() || !(0.0..=1.0).contains(&margin) {
            return Err(ValidationError::InvalidDecomposition(format!(
                "recovery_margin must be within [0, 1], got {}",
                margin
            )));
        }

        if self.captions.currency_symbol.is_empty() {
            return Err(ValidationError::InvalidCaptions(
                "currency_symbol cannot be empty".to_string(),
            ));
        }
        if self.captions.direct_channel.is_empty() {
            return Err(ValidationError::InvalidCaptions(
                "direct_channel cannot be empty".to_string(),
            ));
        }
        if !self.captions.ltv_per_unit.is_finite() || self.captions.ltv_per_unit < 0.0 {
            return Err(ValidationError::InvalidCaptions(format!(
                "ltv_per_unit must be a non-negative number, got {}",
                self.captions.ltv_per_unit
            )));
        }
        if !self.captions.baseline_epsilon.is_finite() || self.captions.baseline_epsilon < 0.0 {
            return Err(ValidationError::InvalidCaptions(format!(
                "baseline_epsilon must be a non-negative number, got {}",
                self.captions.baseline_epsilon
            )));
        }

        for (name, color) in self.palette.entries() {
            if color.trim().is_empty() {
                return Err(ValidationError::InvalidPalette(format!(
                    "{} color cannot be empty",
                    name
                )));
            }
        }

        if self.service.base_url.is_empty() {
            return Err(ValidationError::InvalidService(
                "base_url cannot be empty".to_string(),
            ));
        }
        if self.service.timeout.is_zero() {
            return Err(ValidationError::InvalidService(
                "timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DecompositionConfig {
    /// Margin assumed on previously lost sales that better inventory planning recovers
    #[serde(default = "default_recovery_margin")]
    pub recovery_margin: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CaptionConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Channel whose volume is valued as long-term customer relationships
    #[serde(default = "default_direct_channel")]
    pub direct_channel: String,
    /// Long-term value credited per unit sold through the direct channel
    #[serde(default = "default_ltv_per_unit")]
    pub ltv_per_unit: f64,
    #[serde(default)]
    pub peak_quarter: PeakQuarterRule,
    /// Historical baselines with a smaller magnitude get no percentage in captions
    #[serde(default = "default_baseline_epsilon")]
    pub baseline_epsilon: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaletteConfig {
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_neutral")]
    pub neutral: String,
    #[serde(default = "default_warning")]
    pub warning: String,
    #[serde(default = "default_highlight")]
    pub highlight: String,
}

impl PaletteConfig {
    fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("accent", self.accent.as_str()),
            ("neutral", self.neutral.as_str()),
            ("warning", self.warning.as_str()),
            ("highlight", self.highlight.as_str()),
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid decomposition configuration: {0}")]
    InvalidDecomposition(String),
    #[error("Invalid caption configuration: {0}")]
    InvalidCaptions(String),
    #[error("Invalid palette configuration: {0}")]
    InvalidPalette(String),
    #[error("Invalid service configuration: {0}")]
    InvalidService(String),
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_recovery_margin() -> f64 {
    DEFAULT_RECOVERY_MARGIN
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_direct_channel() -> String {
    "Own_Website".to_string()
}

fn default_ltv_per_unit() -> f64 {
    400.0
}

fn default_baseline_epsilon() -> f64 {
    1.0
}

fn default_accent() -> String {
    "#16a34a".to_string()
}

fn default_neutral() -> String {
    "#94a3b8".to_string()
}

fn default_warning() -> String {
    "#dc2626".to_string()
}

fn default_highlight() -> String {
    "#2563eb".to_string()
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

/// Default implementations
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            recovery_margin: default_recovery_margin(),
        }
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            direct_channel: default_direct_channel(),
            ltv_per_unit: default_ltv_per_unit(),
            peak_quarter: PeakQuarterRule::default(),
            baseline_epsilon: default_baseline_epsilon(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            accent: default_accent(),
            neutral: default_neutral(),
            warning: default_warning(),
            highlight: default_highlight(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.decomposition.recovery_margin, 0.30);
        assert_eq!(config.captions.currency_symbol, "₹");
        assert_eq!(config.captions.direct_channel, "Own_Website");
        assert_eq!(config.captions.peak_quarter, PeakQuarterRule::Positional);
        assert_eq!(config.service.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
decomposition:
  recovery_margin: 0.25
captions:
  peak_quarter: max_capital
  currency_symbol: "$"
service:
  base_url: "http://analytics.internal:8080"
  timeout: "45s"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.decomposition.recovery_margin, 0.25);
        assert_eq!(config.captions.peak_quarter, PeakQuarterRule::MaxCapital);
        assert_eq!(config.captions.currency_symbol, "$");
        assert_eq!(config.captions.ltv_per_unit, 400.0);
        assert_eq!(config.service.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.decomposition.recovery_margin = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidDecomposition(_))
        ));

        let mut config = Config::default();
        config.captions.direct_channel.clear();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCaptions(_))
        ));

        let mut config = Config::default();
        config.palette.warning = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPalette(_))
        ));

        let mut config = Config::default();
        config.service.timeout = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidService(_))
        ));
    }

    #[test]
    fn test_unknown_peak_rule_rejected() {
        let yaml = r#"
captions:
  peak_quarter: "largest"
"#;
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }
}

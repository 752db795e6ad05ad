//! Layered configuration
//!
//! Resolution order, later layers winning:
//! 1. Embedded defaults (compiled into binary)
//! 2. Override file: an explicit path, or ~/.local/share/pennywise/config.toml
//! 3. Environment variables

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::IncomeSign;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/pennywise.toml");

pub const INCOME_SIGN_ENV: &str = "PENNYWISE_INCOME_SIGN";
pub const CLASSIFIER_BACKEND_ENV: &str = "CLASSIFIER_BACKEND";
pub const CLASSIFIER_HOST_ENV: &str = "CLASSIFIER_HOST";
pub const LABEL_ENCODER_ENV: &str = "PENNYWISE_LABEL_ENCODER";

/// Where the fraud feature vector gets its time context from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureSource {
    /// Hour, weekday, day and month of the scored transaction
    #[default]
    Transaction,
    /// Configured placeholder values
    Fixed,
}

impl std::str::FromStr for FeatureSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transaction" => Ok(Self::Transaction),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!("Unknown feature source: {}", s)),
        }
    }
}

/// Placeholder context features for [`FeatureSource::Fixed`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFeatures {
    pub hour: u32,
    /// Monday = 0
    pub weekday: u32,
    pub day: u32,
    pub month: u32,
}

impl Default for FixedFeatures {
    fn default() -> Self {
        Self {
            hour: 14,
            weekday: 2,
            day: 15,
            month: 6,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    pub income_sign: IncomeSign,
}

#[derive(Debug, Clone)]
pub struct FraudConfig {
    pub feature_source: FeatureSource,
    pub fixed: FixedFeatures,
    pub default_hour: u32,
    pub unknown_code: i64,
    pub label_encoder: Option<PathBuf>,
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            feature_source: FeatureSource::Transaction,
            fixed: FixedFeatures::default(),
            default_hour: 12,
            unknown_code: -1,
            label_encoder: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// `http` or `mock`
    pub backend: String,
    pub host: String,
    pub timeout: Duration,
    pub mock_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: "mock".to_string(),
            host: "http://127.0.0.1:8500".to_string(),
            timeout: Duration::from_secs(10),
            mock_threshold: 1000.0,
        }
    }
}

/// Resolved Pennywise configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub analytics: AnalyticsConfig,
    pub fraud: FraudConfig,
    pub classifier: ClassifierConfig,
}

impl Config {
    /// Load defaults, the override file and environment variables
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = load_config(override_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML document on top of the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Apply environment-style overrides from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(sign) = lookup(INCOME_SIGN_ENV) {
            match sign.parse() {
                Ok(sign) => self.analytics.income_sign = sign,
                Err(e) => warn!(value = %sign, "Ignoring {}: {}", INCOME_SIGN_ENV, e),
            }
        }
        if let Some(backend) = lookup(CLASSIFIER_BACKEND_ENV) {
            self.classifier.backend = backend.to_lowercase();
        }
        if let Some(host) = lookup(CLASSIFIER_HOST_ENV) {
            self.classifier.host = host;
        }
        if let Some(path) = lookup(LABEL_ENCODER_ENV) {
            self.fraud.label_encoder = Some(PathBuf::from(path));
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("pennywise").join("config.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .filter(|p| p.exists());

    let content = match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading config override");
            fs::read_to_string(path)?
        }
        None => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    analytics: Option<RawAnalytics>,
    fraud: Option<RawFraud>,
    classifier: Option<RawClassifier>,
}

#[derive(Debug, Deserialize)]
struct RawAnalytics {
    income_sign: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFraud {
    feature_source: Option<String>,
    default_hour: Option<u32>,
    unknown_code: Option<i64>,
    label_encoder: Option<PathBuf>,
    fixed: Option<RawFixed>,
}

#[derive(Debug, Deserialize)]
struct RawFixed {
    hour: Option<u32>,
    weekday: Option<u32>,
    day: Option<u32>,
    month: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawClassifier {
    backend: Option<String>,
    host: Option<String>,
    timeout_secs: Option<u64>,
    mock_threshold: Option<f64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut config = Config::default();

    if let Some(analytics) = raw.analytics {
        if let Some(sign) = analytics.income_sign {
            match sign.parse() {
                Ok(sign) => config.analytics.income_sign = sign,
                Err(e) => warn!("{}, keeping {}", e, config.analytics.income_sign),
            }
        }
    }

    if let Some(fraud) = raw.fraud {
        if let Some(source) = fraud.feature_source {
            match source.parse() {
                Ok(source) => config.fraud.feature_source = source,
                Err(e) => warn!("{}, deriving features from transactions", e),
            }
        }
        if let Some(hour) = fraud.default_hour {
            config.fraud.default_hour = hour;
        }
        if let Some(code) = fraud.unknown_code {
            config.fraud.unknown_code = code;
        }
        config.fraud.label_encoder = fraud.label_encoder;
        if let Some(fixed) = fraud.fixed {
            let defaults = FixedFeatures::default();
            config.fraud.fixed = FixedFeatures {
                hour: fixed.hour.unwrap_or(defaults.hour),
                weekday: fixed.weekday.unwrap_or(defaults.weekday),
                day: fixed.day.unwrap_or(defaults.day),
                month: fixed.month.unwrap_or(defaults.month),
            };
        }
    }

    if let Some(classifier) = raw.classifier {
        if let Some(backend) = classifier.backend {
            config.classifier.backend = backend.to_lowercase();
        }
        if let Some(host) = classifier.host {
            config.classifier.host = host;
        }
        if let Some(timeout) = classifier.timeout_secs {
            config.classifier.timeout = Duration::from_secs(timeout);
        }
        if let Some(threshold) = classifier.mock_threshold {
            config.classifier.mock_threshold = threshold;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.analytics.income_sign, IncomeSign::Negative);
        assert_eq!(config.fraud.feature_source, FeatureSource::Transaction);
        assert_eq!(config.fraud.unknown_code, -1);
        assert_eq!(config.classifier.backend, "mock");
        assert!(config.fraud.label_encoder.is_none());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [fraud]
            feature_source = "fixed"

            [fraud.fixed]
            hour = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.fraud.feature_source, FeatureSource::Fixed);
        assert_eq!(config.fraud.fixed.hour, 3);
        assert_eq!(config.fraud.fixed.month, 6);
        assert_eq!(config.analytics.income_sign, IncomeSign::Negative);
        assert_eq!(config.classifier.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let config = Config::from_toml(
            r#"
            [analytics]
            income_sign = "sideways"
            [fraud]
            feature_source = "random"
            "#,
        )
        .unwrap();
        assert_eq!(config.analytics.income_sign, IncomeSign::Negative);
        assert_eq!(config.fraud.feature_source, FeatureSource::Transaction);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::from_toml("[analytics\nincome_sign = 1").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (INCOME_SIGN_ENV, "positive"),
            (CLASSIFIER_BACKEND_ENV, "HTTP"),
            (CLASSIFIER_HOST_ENV, "http://scorer:9000"),
            (LABEL_ENCODER_ENV, "/tmp/encoder.json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.analytics.income_sign, IncomeSign::Positive);
        assert_eq!(config.classifier.backend, "http");
        assert_eq!(config.classifier.host, "http://scorer:9000");
        assert_eq!(
            config.fraud.label_encoder,
            Some(PathBuf::from("/tmp/encoder.json"))
        );
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[classifier]\nbackend = \"http\"\ntimeout_secs = 3").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.classifier.backend, "http");
        assert_eq!(config.classifier.timeout, Duration::from_secs(3));
    }
}

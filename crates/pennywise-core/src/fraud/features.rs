//! Fraud feature vectors and the label encoder feeding them

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::primary_label;
use crate::config::{FeatureSource, FraudConfig};
use crate::error::Result;
use crate::models::Transaction;

/// Maps merchant and category labels to the integer codes the classifier
/// was trained on.
///
/// Loaded from a JSON file of the form
/// `{"merchant": {"Uber": 3, ...}, "category": {"Travel": 1, ...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    merchant: HashMap<String, i64>,
    category: HashMap<String, i64>,
    unknown_code: i64,
}

#[derive(Debug, Deserialize)]
struct RawEncoder {
    #[serde(default)]
    merchant: HashMap<String, i64>,
    #[serde(default)]
    category: HashMap<String, i64>,
}

impl LabelEncoder {
    /// Encoder with no known labels; everything maps to `unknown_code`
    pub fn empty(unknown_code: i64) -> Self {
        Self {
            merchant: HashMap::new(),
            category: HashMap::new(),
            unknown_code,
        }
    }

    /// Parse an encoder from its JSON form
    pub fn from_json(content: &str, unknown_code: i64) -> Result<Self> {
        let raw: RawEncoder = serde_json::from_str(content)?;
        Ok(Self {
            merchant: raw.merchant,
            category: raw.category,
            unknown_code,
        })
    }

    /// Load an encoder file
    pub fn load(path: &Path, unknown_code: i64) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let encoder = Self::from_json(&content, unknown_code)?;
        debug!(
            path = %path.display(),
            merchants = encoder.merchant.len(),
            categories = encoder.category.len(),
            "Loaded label encoder"
        );
        Ok(encoder)
    }

    /// The configured encoder file, or an empty encoder when none is set
    pub fn from_config(config: &FraudConfig) -> Result<Self> {
        match &config.label_encoder {
            Some(path) => Self::load(path, config.unknown_code),
            None => Ok(Self::empty(config.unknown_code)),
        }
    }

    pub fn with_merchant(mut self, label: &str, code: i64) -> Self {
        self.merchant.insert(label.to_string(), code);
        self
    }

    pub fn with_category(mut self, label: &str, code: i64) -> Self {
        self.category.insert(label.to_string(), code);
        self
    }

    pub fn encode_merchant(&self, label: Option<&str>) -> i64 {
        Self::encode(&self.merchant, label, self.unknown_code)
    }

    pub fn encode_category(&self, label: Option<&str>) -> i64 {
        Self::encode(&self.category, label, self.unknown_code)
    }

    fn encode(table: &HashMap<String, i64>, label: Option<&str>, unknown: i64) -> i64 {
        label
            .map(str::trim)
            .and_then(|l| table.get(l))
            .copied()
            .unwrap_or(unknown)
    }
}

/// Fixed-shape classifier input:
/// `[merchant_code, category_code, amount, hour, weekday, day, month]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub merchant_code: i64,
    pub category_code: i64,
    pub amount: f64,
    pub hour: u32,
    /// Monday = 0
    pub weekday: u32,
    pub day: u32,
    pub month: u32,
}

impl FeatureVector {
    /// Build the vector for `tx` using the configured context source
    pub fn from_transaction(tx: &Transaction, encoder: &LabelEncoder, config: &FraudConfig) -> Self {
        let category = tx.category.as_ref().and_then(primary_label);

        let (hour, weekday, day, month) = match config.feature_source {
            FeatureSource::Transaction => (
                tx.datetime.map(|dt| dt.hour()).unwrap_or(config.default_hour),
                tx.date.weekday().num_days_from_monday(),
                tx.date.day(),
                tx.date.month(),
            ),
            FeatureSource::Fixed => (
                config.fixed.hour,
                config.fixed.weekday,
                config.fixed.day,
                config.fixed.month,
            ),
        };

        Self {
            merchant_code: encoder.encode_merchant(tx.merchant_name.as_deref()),
            category_code: encoder.encode_category(category.as_deref()),
            amount: tx.amount,
            hour,
            weekday,
            day,
            month,
        }
    }

    /// Flattened form sent to the scoring service
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.merchant_code as f64,
            self.category_code as f64,
            self.amount,
            self.hour as f64,
            self.weekday as f64,
            self.day as f64,
            self.month as f64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::tx;
    use crate::config::FixedFeatures;
    use crate::models::RawCategory;
    use chrono::NaiveDate;
    use std::io::Write;

    fn sample() -> Transaction {
        // 2025-03-07 is a Friday
        let mut t = tx(1, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(), 89.4);
        t.merchant_name = Some("Tectra Inc".into());
        t.category = Some(RawCategory::Text("Food and Drink, Restaurants".into()));
        t
    }

    fn encoder() -> LabelEncoder {
        LabelEncoder::empty(-1)
            .with_merchant("Tectra Inc", 4)
            .with_category("Food and Drink", 2)
    }

    #[test]
    fn test_transaction_source_uses_real_date() {
        let config = FraudConfig::default();
        let features = FeatureVector::from_transaction(&sample(), &encoder(), &config);

        assert_eq!(features.merchant_code, 4);
        assert_eq!(features.category_code, 2);
        assert_eq!(features.hour, config.default_hour);
        assert_eq!(features.weekday, 4);
        assert_eq!(features.day, 7);
        assert_eq!(features.month, 3);
        assert_eq!(features.to_vec(), vec![4.0, 2.0, 89.4, 12.0, 4.0, 7.0, 3.0]);
    }

    #[test]
    fn test_transaction_source_uses_time_of_day() {
        let mut t = sample();
        t.datetime = t.date.and_hms_opt(21, 15, 0);
        let features = FeatureVector::from_transaction(&t, &encoder(), &FraudConfig::default());
        assert_eq!(features.hour, 21);
    }

    #[test]
    fn test_fixed_source_reproduces_placeholders() {
        let config = FraudConfig {
            feature_source: FeatureSource::Fixed,
            ..FraudConfig::default()
        };
        let features = FeatureVector::from_transaction(&sample(), &encoder(), &config);

        let fixed = FixedFeatures::default();
        assert_eq!(
            (features.hour, features.weekday, features.day, features.month),
            (fixed.hour, fixed.weekday, fixed.day, fixed.month)
        );
        assert_eq!(features.amount, 89.4);
    }

    #[test]
    fn test_unknown_labels_use_unknown_code() {
        let mut t = sample();
        t.merchant_name = Some("Nobody Ltd".into());
        t.category = None;
        let features = FeatureVector::from_transaction(&t, &LabelEncoder::empty(-7), &FraudConfig::default());
        assert_eq!(features.merchant_code, -7);
        assert_eq!(features.category_code, -7);
    }

    #[test]
    fn test_load_encoder_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"merchant": {{"Uber": 3}}, "category": {{"Travel": 1}}}}"#
        )
        .unwrap();

        let encoder = LabelEncoder::load(file.path(), -1).unwrap();
        assert_eq!(encoder.encode_merchant(Some("Uber")), 3);
        assert_eq!(encoder.encode_category(Some(" Travel ")), 1);
        assert_eq!(encoder.encode_category(Some("Shops")), -1);
        assert_eq!(encoder.encode_merchant(None), -1);
    }

    #[test]
    fn test_encoder_sections_optional() {
        let encoder = LabelEncoder::from_json(r#"{"merchant": {"Uber": 3}}"#, -1).unwrap();
        assert_eq!(encoder.encode_category(Some("Travel")), -1);
        assert!(LabelEncoder::from_json("not json", -1).is_err());
    }
}

//! Domain models for Pennywise

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Category field as it arrives from the provider or the store.
///
/// The same logical value (ordered labels, most specific first) shows up
/// either already decoded or as text: a JSON array literal, or a string with
/// brackets and quotes stripped (`Food and Drink, Restaurants`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCategory {
    /// Already-decoded ordered sequence
    Labels(Vec<String>),
    /// Raw text in one of the text encodings
    Text(String),
}

impl RawCategory {
    /// Storage tag written to the `category_kind` column
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Labels(_) => "labels",
            Self::Text(_) => "text",
        }
    }

    /// Value written to the `category` column
    pub fn to_column(&self) -> String {
        match self {
            // Serializing a Vec<String> cannot fail
            Self::Labels(labels) => serde_json::to_string(labels).unwrap_or_default(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Rebuild from the `category` / `category_kind` column pair
    pub fn from_column(value: String, kind: Option<&str>) -> Self {
        match kind {
            Some("labels") => match serde_json::from_str::<Vec<String>>(&value) {
                Ok(labels) => Self::Labels(labels),
                Err(_) => Self::Text(value),
            },
            _ => Self::Text(value),
        }
    }
}

impl From<Vec<String>> for RawCategory {
    fn from(labels: Vec<String>) -> Self {
        Self::Labels(labels)
    }
}

impl From<&str> for RawCategory {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Which amount sign marks money coming in.
///
/// Bank-link providers report amounts from the institution's point of view,
/// so a paycheck lands as a negative number. That is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeSign {
    #[default]
    Negative,
    Positive,
}

impl IncomeSign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Positive => "positive",
        }
    }

    /// Whether `amount` is money coming in under this convention
    pub fn is_incoming(&self, amount: f64) -> bool {
        match self {
            Self::Negative => amount < 0.0,
            Self::Positive => amount > 0.0,
        }
    }
}

impl std::str::FromStr for IncomeSign {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "negative" | "-" => Ok(Self::Negative),
            "positive" | "+" => Ok(Self::Positive),
            _ => Err(format!("Unknown income sign: {}", s)),
        }
    }
}

impl std::fmt::Display for IncomeSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    /// Timestamp with time-of-day, when the provider supplies one
    pub datetime: Option<NaiveDateTime>,
    /// Signed amount; see [`IncomeSign`] for the direction convention
    pub amount: f64,
    pub category: Option<RawCategory>,
    pub merchant_name: Option<String>,
    pub payment_channel: Option<String>,
    pub currency: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A new transaction to be stored (before insertion).
///
/// Deserializes from provider-shaped JSON, so `iso_currency_code` is
/// accepted as an alias for `currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_provider_datetime")]
    pub datetime: Option<NaiveDateTime>,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<RawCategory>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub payment_channel: Option<String>,
    #[serde(default, alias = "iso_currency_code")]
    pub currency: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Parse a provider timestamp.
///
/// RFC 3339 values with an offset (`2025-02-03T11:00:00Z`) keep their
/// wall-clock time at that offset; naive values are taken as-is.
pub fn parse_provider_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn deserialize_provider_datetime<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_provider_datetime(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime '{}'", raw)))
}

impl NewTransaction {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self {
            date,
            datetime: None,
            amount,
            category: None,
            merchant_name: None,
            payment_channel: None,
            currency: None,
            name: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<RawCategory>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_merchant(mut self, merchant: &str) -> Self {
        self.merchant_name = Some(merchant.to_string());
        self
    }

    pub fn with_datetime(mut self, datetime: NaiveDateTime) -> Self {
        self.datetime = Some(datetime);
        self
    }
}

/// Fraud-alert lifecycle state for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    /// No alert cycle has started
    #[default]
    None,
    /// A transaction was flagged and awaits the user's answer
    Pending,
    /// The user confirmed the transaction
    Resolved,
    /// The user reported the transaction as fraud
    Reported,
}

impl AlertState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Reported => "reported",
        }
    }

    /// Resolved and reported close the cycle until the next flag
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Reported)
    }
}

impl std::str::FromStr for AlertState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            "reported" => Ok(Self::Reported),
            _ => Err(format!("Unknown alert state: {}", s)),
        }
    }
}

impl std::fmt::Display for AlertState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An app user and the analytic fields derived for them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string, never serialized out
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Savings target
    pub amount: Option<f64>,
    /// Savings horizon in months
    pub time_months: Option<i64>,
    /// Monthly savings figure, always recomputed from amount / time_months
    pub saving_goal: Option<f64>,
    /// Amount of the detected pay-day transaction
    pub income: Option<f64>,
    pub top_spender: Option<String>,
    pub top2_spender: Option<String>,
    /// Day of month of the detected pay-day
    pub day_paid: Option<u32>,
    pub alert_state: AlertState,
    /// Annotation recorded when an alert is reported
    pub alert_transaction: Option<String>,
    /// Transaction flagged in the current alert cycle
    pub flagged_transaction_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Tri-state alert flag: unset before any cycle, true while pending
    pub fn is_alert(&self) -> Option<bool> {
        match self.alert_state {
            AlertState::None => None,
            AlertState::Pending => Some(true),
            AlertState::Resolved | AlertState::Reported => Some(false),
        }
    }
}

//! Fraud-alert lifecycle
//!
//! Per-user state machine:
//!
//! ```text
//! none ──flag──▶ pending ──yes────▶ resolved ──flag──▶ pending ...
//!                        └─report─▶ reported ──flag──▶ pending ...
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::classifier::{ClassifierClient, FraudClassifier};
use super::features::{FeatureVector, LabelEncoder};
use crate::config::{Config, FraudConfig};
use crate::error::{Error, Result};
use crate::models::{AlertState, Transaction};
use crate::store::{TransactionStore, UserStore};

/// Annotation stored on the user when an alert is reported
pub const REPORTED_ANNOTATION: &str = "Transaction reported as fraudulent by user";

/// The transaction an alert was raised for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedTransaction {
    pub id: i64,
    pub merchant: Option<String>,
    pub amount: f64,
}

impl From<&Transaction> for FlaggedTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            merchant: tx.merchant_name.clone(),
            amount: tx.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "transaction", rename_all = "snake_case")]
pub enum ScoreOutcome {
    /// The store holds no transactions
    NoTransactions,
    /// The latest transaction was classified as legitimate
    Clear,
    /// A new alert cycle started
    Flagged(FlaggedTransaction),
    /// An alert is already awaiting an answer; the classifier was not called.
    /// `None` when the flagged transaction has since been deleted.
    AlreadyPending(Option<FlaggedTransaction>),
}

/// The user's answer to a pending alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveAction {
    /// "yes": the transaction was theirs
    Confirm,
    /// "report": the transaction was fraudulent
    Report,
}

impl ResolveAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirm => "yes",
            Self::Report => "report",
        }
    }
}

impl std::str::FromStr for ResolveAction {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(Self::Confirm),
            "report" => Ok(Self::Report),
            _ => Err(Error::InvalidInput(format!(
                "unknown action '{}', expected 'yes' or 'report'",
                s.trim()
            ))),
        }
    }
}

impl std::fmt::Display for ResolveAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolveOutcome {
    Resolved,
    Reported,
    /// The cycle was already closed; nothing changed
    AlreadyResolved { state: AlertState },
    /// No alert cycle has started for this user
    NoActiveAlert,
}

/// Read-only view of a user's alert fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertStatus {
    pub username: String,
    pub state: AlertState,
    pub is_alert: Option<bool>,
    pub flagged_transaction_id: Option<i64>,
    pub annotation: Option<String>,
}

/// Drives alert cycles against a store and an injected classifier
pub struct FraudAlertController<'a, S, C> {
    store: &'a S,
    classifier: C,
    encoder: LabelEncoder,
    config: FraudConfig,
}

impl<'a, S> FraudAlertController<'a, S, ClassifierClient>
where
    S: TransactionStore + UserStore,
{
    /// Build the configured classifier and load the label encoder
    pub fn from_config(store: &'a S, config: &Config) -> Result<Self> {
        let classifier = ClassifierClient::from_config(&config.classifier)?;
        let encoder = LabelEncoder::from_config(&config.fraud)?;
        Ok(Self::new(store, classifier, encoder, config.fraud.clone()))
    }
}

impl<'a, S> FraudAlertController<'a, S, ()>
where
    S: UserStore,
{
    /// A controller that answers and inspects alerts but cannot score.
    ///
    /// Neither the classifier nor the label encoder file is touched.
    pub fn without_classifier(store: &'a S, config: &FraudConfig) -> Self {
        Self {
            store,
            classifier: (),
            encoder: LabelEncoder::empty(config.unknown_code),
            config: config.clone(),
        }
    }
}

impl<'a, S, C> FraudAlertController<'a, S, C>
where
    S: TransactionStore + UserStore,
    C: FraudClassifier,
{
    pub fn new(store: &'a S, classifier: C, encoder: LabelEncoder, config: FraudConfig) -> Self {
        Self {
            store,
            classifier,
            encoder,
            config,
        }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Score the latest transaction and open an alert cycle if it is flagged
    pub async fn score(&self, username: &str) -> Result<ScoreOutcome> {
        let mut user = self.store.require_user(username)?;

        let Some(tx) = self.store.latest()? else {
            debug!(user = username, "No transactions to score");
            return Ok(ScoreOutcome::NoTransactions);
        };

        if user.alert_state == AlertState::Pending {
            let flagged = match user.flagged_transaction_id {
                Some(id) => self.store.get(id)?.as_ref().map(FlaggedTransaction::from),
                None => None,
            };
            debug!(user = username, "Alert already pending, not rescoring");
            return Ok(ScoreOutcome::AlreadyPending(flagged));
        }

        let features = FeatureVector::from_transaction(&tx, &self.encoder, &self.config);
        debug!(
            transaction = tx.id,
            classifier = self.classifier.name(),
            ?features,
            "Scoring latest transaction"
        );

        if !self.classifier.predict(&features).await? {
            return Ok(ScoreOutcome::Clear);
        }

        let previous = user.alert_state;
        user.alert_state = AlertState::Pending;
        user.flagged_transaction_id = Some(tx.id);
        user.alert_transaction = None;
        self.store.save(&user)?;

        info!(
            user = username,
            transaction = tx.id,
            from = %previous,
            "Transaction flagged, alert pending"
        );
        Ok(ScoreOutcome::Flagged(FlaggedTransaction::from(&tx)))
    }
}

impl<'a, S, C> FraudAlertController<'a, S, C>
where
    S: UserStore,
{
    /// Answer a pending alert with a raw action string ("yes" or "report")
    pub fn resolve(&self, username: &str, action: &str) -> Result<ResolveOutcome> {
        let action: ResolveAction = action.parse()?;
        self.resolve_action(username, action)
    }

    pub fn resolve_action(&self, username: &str, action: ResolveAction) -> Result<ResolveOutcome> {
        let mut user = self.store.require_user(username)?;

        match user.alert_state {
            AlertState::None => return Ok(ResolveOutcome::NoActiveAlert),
            state if state.is_terminal() => {
                debug!(user = username, %state, "Alert already resolved");
                return Ok(ResolveOutcome::AlreadyResolved { state });
            }
            _ => {}
        }

        let outcome = match action {
            ResolveAction::Confirm => {
                user.alert_state = AlertState::Resolved;
                ResolveOutcome::Resolved
            }
            ResolveAction::Report => {
                user.alert_state = AlertState::Reported;
                user.alert_transaction = Some(REPORTED_ANNOTATION.to_string());
                ResolveOutcome::Reported
            }
        };
        self.store.save(&user)?;

        info!(user = username, %action, state = %user.alert_state, "Alert resolved");
        Ok(outcome)
    }

    /// Current alert fields for the user
    pub fn status(&self, username: &str) -> Result<AlertStatus> {
        let user = self.store.require_user(username)?;
        Ok(AlertStatus {
            is_alert: user.is_alert(),
            username: user.username,
            state: user.alert_state,
            flagged_transaction_id: user.flagged_transaction_id,
            annotation: user.alert_transaction,
        })
    }
}

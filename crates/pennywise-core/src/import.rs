//! Transaction import from provider JSON
//!
//! Accepts either a bare array of transactions or a provider response
//! object carrying them under `transactions`, as bank-link sync endpoints
//! return them.

use std::io::Read;

use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::models::NewTransaction;
use crate::store::TransactionStore;

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Bare(Vec<NewTransaction>),
    Wrapped { transactions: Vec<NewTransaction> },
}

/// Parse transactions from a JSON reader
pub fn parse_transactions<R: Read>(reader: R) -> Result<Vec<NewTransaction>> {
    let payload: Payload = serde_json::from_reader(reader)?;
    Ok(match payload {
        Payload::Bare(transactions) => transactions,
        Payload::Wrapped { transactions } => transactions,
    })
}

/// Store every transaction, returning how many were inserted
pub fn import_transactions<S: TransactionStore>(
    store: &S,
    transactions: &[NewTransaction],
) -> Result<usize> {
    for tx in transactions {
        store.insert(tx)?;
    }
    info!(count = transactions.len(), "Imported transactions");
    Ok(transactions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::RawCategory;
    use crate::store::TransactionFilter;

    #[test]
    fn test_parse_bare_array() {
        let json = r#"[
            {"date": "2025-02-14", "amount": -2000, "name": "PAYROLL"},
            {"date": "2025-02-15", "amount": 12.5, "category": "Food and Drink, Restaurants"}
        ]"#;
        let txs = parse_transactions(json.as_bytes()).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].amount, -2000.0);
        assert_eq!(
            txs[1].category,
            Some(RawCategory::Text("Food and Drink, Restaurants".into()))
        );
    }

    #[test]
    fn test_parse_wrapped_response() {
        let json = r#"{"transactions": [
            {"date": "2025-02-14", "amount": 4.33, "category": ["Travel", "Taxi"],
             "merchant_name": "Uber", "iso_currency_code": "USD"}
        ], "total_transactions": 1}"#;
        let txs = parse_transactions(json.as_bytes()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].merchant_name.as_deref(), Some("Uber"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_transactions("{\"nope\": 1}".as_bytes()).is_err());
        assert!(parse_transactions("[{\"amount\": 1}]".as_bytes()).is_err());
    }

    #[test]
    fn test_offset_datetime_feeds_hour_feature() {
        use crate::config::FraudConfig;
        use crate::fraud::{FeatureVector, LabelEncoder};

        let json = r#"{"transactions": [
            {"date": "2025-02-03", "amount": 2.0},
            {"date": "2025-02-03", "datetime": "2025-02-03T11:00:00Z", "amount": 5.0}
        ]}"#;
        let txs = parse_transactions(json.as_bytes()).unwrap();
        assert_eq!(txs.len(), 2);

        let db = Database::in_memory().unwrap();
        import_transactions(&db, &txs).unwrap();
        let latest = db.latest().unwrap().unwrap();

        let encoder = LabelEncoder::empty(-1);
        let features = FeatureVector::from_transaction(&latest, &encoder, &FraudConfig::default());
        assert_eq!(features.hour, 11);
    }

    #[test]
    fn test_import_into_store() {
        let db = Database::in_memory().unwrap();
        let txs = parse_transactions(
            r#"[{"date": "2025-02-14", "amount": 1}, {"date": "2025-02-15", "amount": 2}]"#
                .as_bytes(),
        )
        .unwrap();

        assert_eq!(import_transactions(&db, &txs).unwrap(), 2);
        assert_eq!(db.list(&TransactionFilter::all()).unwrap().len(), 2);
    }
}

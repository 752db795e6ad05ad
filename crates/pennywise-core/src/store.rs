//! Storage interfaces consumed by the analytics and fraud components
//!
//! [`crate::db::Database`] implements both traits over SQLite. The engine only
//! depends on these traits, so any store with read-modify-write atomicity per
//! user record can stand in.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{NewTransaction, Transaction, User};

/// Filter for transaction listing. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Only transactions with a category value
    pub categorized_only: bool,
}

impl TransactionFilter {
    /// Every stored transaction
    pub fn all() -> Self {
        Self::default()
    }

    /// Transactions dated within `[from, to]`
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn categorized() -> Self {
        Self {
            categorized_only: true,
            ..Self::default()
        }
    }
}

pub trait TransactionStore {
    /// Transactions matching `filter`, ordered by date then id
    fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    fn get(&self, id: i64) -> Result<Option<Transaction>>;

    /// Most recent transaction (latest date, then highest id)
    fn latest(&self) -> Result<Option<Transaction>>;

    /// Store a transaction and return its id
    fn insert(&self, tx: &NewTransaction) -> Result<i64>;

    /// Delete a transaction; `Error::NotFound` when absent
    fn delete(&self, id: i64) -> Result<()>;
}

pub trait UserStore {
    fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Upsert the user's analytic and alert fields
    fn save(&self, user: &User) -> Result<()>;

    /// Register a user with a hashed password; `Error::InvalidInput` on duplicates
    fn create_user(&self, username: &str, password: &str) -> Result<User>;

    /// Fetch a user or fail with `Error::NotFound`
    fn require_user(&self, username: &str) -> Result<User> {
        self.get_by_username(username)?
            .ok_or_else(|| crate::error::Error::NotFound(format!("user '{}'", username)))
    }
}

//! User store operations

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHasher};
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{AlertState, User};
use crate::store::UserStore;

const USER_COLUMNS: &str = "id, username, password, amount, time_months, saving_goal, income, \
     top_spender, top2_spender, day_paid, alert_state, alert_transaction, flagged_transaction_id, \
     created_at";

/// Hash a password into an Argon2 PHC string
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Encryption(format!("Failed to hash password: {}", e)))
}

impl Database {
    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let alert_state_str: String = row.get(10)?;
        let created_at_str: String = row.get(13)?;

        let alert_state = alert_state_str.parse::<AlertState>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(10, rusqlite::types::Type::Text, e.into())
        })?;

        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
            amount: row.get(3)?,
            time_months: row.get(4)?,
            saving_goal: row.get(5)?,
            income: row.get(6)?,
            top_spender: row.get(7)?,
            top2_spender: row.get(8)?,
            day_paid: row.get(9)?,
            alert_state,
            alert_transaction: row.get(11)?,
            flagged_transaction_id: row.get(12)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Check a password against the stored hash
    pub fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let Some(user) = self.get_by_username(username)? else {
            return Ok(false);
        };
        let parsed = PasswordHash::new(&user.password)
            .map_err(|e| Error::Encryption(format!("Stored hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

impl UserStore for Database {
    fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
        let user = conn
            .query_row(&sql, params![username], Self::row_to_user)
            .optional()?;
        Ok(user)
    }

    fn save(&self, user: &User) -> Result<()> {
        let conn = self.conn()?;

        // Single statement, so concurrent saves of one user cannot interleave
        conn.execute(
            r#"
            INSERT INTO users (username, password, amount, time_months, saving_goal, income,
                               top_spender, top2_spender, day_paid, alert_state, alert_transaction,
                               flagged_transaction_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(username) DO UPDATE SET
                amount = excluded.amount,
                time_months = excluded.time_months,
                saving_goal = excluded.saving_goal,
                income = excluded.income,
                top_spender = excluded.top_spender,
                top2_spender = excluded.top2_spender,
                day_paid = excluded.day_paid,
                alert_state = excluded.alert_state,
                alert_transaction = excluded.alert_transaction,
                flagged_transaction_id = excluded.flagged_transaction_id
            "#,
            params![
                user.username,
                user.password,
                user.amount,
                user.time_months,
                user.saving_goal,
                user.income,
                user.top_spender,
                user.top2_spender,
                user.day_paid,
                user.alert_state.as_str(),
                user.alert_transaction,
                user.flagged_transaction_id,
            ],
        )?;

        Ok(())
    }

    fn create_user(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidInput("username cannot be empty".to_string()));
        }
        if self.get_by_username(username)?.is_some() {
            return Err(Error::InvalidInput(format!(
                "user '{}' already exists",
                username
            )));
        }

        let hash = hash_password(password)?;
        {
            let conn = self.conn()?;
            conn.execute(
                "INSERT INTO users (username, password) VALUES (?, ?)",
                params![username, hash],
            )?;
        }

        self.require_user(username)
    }
}

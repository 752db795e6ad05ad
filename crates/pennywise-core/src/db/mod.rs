//! SQLite implementations of the store traits
//!
//! `transactions.rs` backs [`TransactionStore`](crate::store::TransactionStore),
//! `users.rs` backs [`UserStore`](crate::store::UserStore).

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{Error, Result};

mod transactions;
mod users;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Passphrase variable for encrypted databases
pub const DB_KEY_ENV: &str = "PENNYWISE_DB_KEY";

/// Fixed Argon2 salt: the key depends only on the passphrase, so a database
/// stays readable after being moved. Changing it locks out existing files.
const KEY_SALT: &[u8] = b"pennywise-salt-1";

const POOL_SIZE: u32 = 10;

/// Stretch a passphrase into a 256-bit SQLCipher raw key, hex encoded
fn derive_key(passphrase: &str) -> Result<String> {
    let mut key = [0u8; 32];
    argon2::Argon2::default()
        .hash_password_into(passphrase.as_bytes(), KEY_SALT, &mut key)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;
    Ok(hex::encode(key))
}

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Pooled SQLite (or SQLCipher) store for users and transactions
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    db_path: String,
}

impl Database {
    /// Open an encrypted database keyed by `PENNYWISE_DB_KEY`
    pub fn new(path: &str) -> Result<Self> {
        let passphrase = std::env::var(DB_KEY_ENV).map_err(|_| {
            Error::Encryption(format!(
                "{} is not set; export a passphrase or pass --no-encrypt",
                DB_KEY_ENV
            ))
        })?;
        Self::new_with_key(path, Some(&passphrase))
    }

    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Open `path`, keying every pooled connection when a passphrase is given
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let key_pragma = passphrase
            .map(derive_key)
            .transpose()?
            .map(|key| format!("PRAGMA key = \"x'{}'\";", key));

        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            if let Some(pragma) = &key_pragma {
                conn.execute_batch(pragma)?;
            }
            Ok(())
        });
        let pool = Pool::builder().max_size(POOL_SIZE).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.init_schema()?;
        Ok(db)
    }

    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Fresh unencrypted scratch database for tests.
    ///
    /// Backed by a file in the temp dir since pooled `:memory:` connections
    /// would each get a separate database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NEXT: AtomicU64 = AtomicU64::new(0);

        let path = std::env::temp_dir().join(format!(
            "pennywise-scratch-{}-{}.db",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Self::new_unencrypted(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Row counts for the status command: (users, transactions)
    pub fn counts(&self) -> Result<(i64, i64)> {
        let conn = self.conn()?;
        let users: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        let transactions: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok((users, transactions))
    }

    /// Create tables if they do not exist yet
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Users and their derived analytics / alert state
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                amount REAL,                               -- savings target
                time_months INTEGER,                       -- savings horizon
                saving_goal REAL,                          -- amount / time_months
                income REAL,                               -- detected pay-day amount
                top_spender TEXT,
                top2_spender TEXT,
                day_paid INTEGER,                          -- day of month, 1-31
                alert_state TEXT NOT NULL DEFAULT 'none',  -- none, pending, resolved, reported
                alert_transaction TEXT,                    -- annotation set on report
                flagged_transaction_id INTEGER,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Transactions as delivered by the ingestion side
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                date DATE NOT NULL,
                datetime TEXT,                             -- optional time-of-day
                amount REAL NOT NULL,
                category TEXT,                             -- JSON array or raw text
                category_kind TEXT,                        -- labels, text
                merchant_name TEXT,
                payment_channel TEXT,
                currency TEXT,
                name TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

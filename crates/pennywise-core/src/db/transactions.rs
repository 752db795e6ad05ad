//! Transaction store operations

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, RawCategory, Transaction};
use crate::store::{TransactionFilter, TransactionStore};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const TRANSACTION_COLUMNS: &str = "id, date, datetime, amount, category, category_kind, \
     merchant_name, payment_channel, currency, name, created_at";

impl Database {
    /// Map a row selected with `TRANSACTION_COLUMNS` to a Transaction
    fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let date_str: String = row.get(1)?;
        let datetime_str: Option<String> = row.get(2)?;
        let category: Option<String> = row.get(4)?;
        let category_kind: Option<String> = row.get(5)?;
        let created_at_str: String = row.get(10)?;

        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Transaction {
            id: row.get(0)?,
            date,
            datetime: datetime_str
                .and_then(|s| NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).ok()),
            amount: row.get(3)?,
            category: category.map(|c| RawCategory::from_column(c, category_kind.as_deref())),
            merchant_name: row.get(6)?,
            payment_channel: row.get(7)?,
            currency: row.get(8)?,
            name: row.get(9)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Get a single transaction by id
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS);
        let tx = conn
            .query_row(&sql, params![id], Self::row_to_transaction)
            .optional()?;
        Ok(tx)
    }
}

impl TransactionStore for Database {
    fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(from) = filter.from {
            conditions.push("date >= ?");
            params.push(Box::new(from.to_string()));
        }
        if let Some(to) = filter.to {
            conditions.push("date <= ?");
            params.push(Box::new(to.to_string()));
        }
        if filter.categorized_only {
            conditions.push("category IS NOT NULL");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {} FROM transactions {} ORDER BY date ASC, id ASC",
            TRANSACTION_COLUMNS, where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let transactions = stmt
            .query_map(params_refs.as_slice(), Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    fn get(&self, id: i64) -> Result<Option<Transaction>> {
        self.get_transaction(id)
    }

    fn latest(&self) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transactions ORDER BY date DESC, id DESC LIMIT 1",
            TRANSACTION_COLUMNS
        );
        let tx = conn
            .query_row(&sql, [], Self::row_to_transaction)
            .optional()?;
        Ok(tx)
    }

    fn insert(&self, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (date, datetime, amount, category, category_kind, merchant_name, payment_channel, currency, name)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.date.to_string(),
                tx.datetime.map(|dt| dt.format(DATETIME_FORMAT).to_string()),
                tx.amount,
                tx.category.as_ref().map(RawCategory::to_column),
                tx.category.as_ref().map(RawCategory::kind),
                tx.merchant_name,
                tx.payment_channel,
                tx.currency,
                tx.name,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("transaction {}", id)));
        }
        Ok(())
    }
}

//! Transaction operations

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{Database, TRANSACTION_COLUMNS};
use crate::error::Result;
use crate::models::{Transaction, TransactionInput, TIMESTAMP_FORMAT};

impl Database {
    /// Insert a transaction stamped with `date`, returning its new id
    pub fn insert_transaction(&self, date: NaiveDateTime, tx: &TransactionInput) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (date, type, category, amount, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                date.format(TIMESTAMP_FORMAT).to_string(),
                tx.kind.storage_tag(),
                tx.category,
                tx.amount,
                tx.description,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Insert many dated transactions in one SQL transaction
    ///
    /// Either every row is written or none is.
    pub fn insert_transactions(&self, rows: &[(NaiveDateTime, TransactionInput)]) -> Result<usize> {
        let mut conn = self.conn()?;
        let sql_tx = conn.transaction()?;
        {
            let mut stmt = sql_tx.prepare(
                r#"
                INSERT INTO transactions (date, type, category, amount, description)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )?;
            for (date, tx) in rows {
                stmt.execute(params![
                    date.format(TIMESTAMP_FORMAT).to_string(),
                    tx.kind.storage_tag(),
                    tx.category,
                    tx.amount,
                    tx.description,
                ])?;
            }
        }
        sql_tx.commit()?;

        Ok(rows.len())
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;

        let tx = conn
            .query_row(
                &format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS),
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;

        Ok(tx)
    }

    /// Replace the editable fields of a transaction; `date` is left alone
    ///
    /// Returns false when no row has this id.
    pub fn update_transaction(&self, id: i64, tx: &TransactionInput) -> Result<bool> {
        let conn = self.conn()?;

        let changed = conn.execute(
            r#"
            UPDATE transactions
            SET type = ?, category = ?, amount = ?, description = ?
            WHERE id = ?
            "#,
            params![
                tx.kind.storage_tag(),
                tx.category,
                tx.amount,
                tx.description,
                id
            ],
        )?;

        Ok(changed > 0)
    }

    /// Delete a transaction permanently
    ///
    /// Returns false when no row has this id.
    pub fn delete_transaction(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        Ok(changed > 0)
    }

    /// Delete every transaction, returning how many were removed
    pub fn delete_all_transactions(&self) -> Result<usize> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM transactions", [])?;
        Ok(removed)
    }

    /// List transactions, newest first
    ///
    /// Rows with the same timestamp are ordered by id, newest first.
    pub fn list_transactions(&self, limit: Option<i64>) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let sql = format!(
            r#"
            SELECT {}
            FROM transactions
            ORDER BY date DESC, id DESC
            LIMIT ?
            "#,
            TRANSACTION_COLUMNS
        );
        debug!(limit = ?limit, "Listing transactions");

        let mut stmt = conn.prepare(&sql)?;
        // SQLite treats a negative LIMIT as "no limit"
        let transactions = stmt
            .query_map(params![limit.unwrap_or(-1)], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Count stored transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}

//! Database access layer
//!
//! This module is organized by domain:
//! - `transactions` - Transaction CRUD
//! - `reports` - Aggregate queries (sums by kind, category and date window)

use std::time::Duration;

use chrono::NaiveDateTime;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Kind, Transaction, TIMESTAMP_FORMAT};

/// How long a caller waits for the pooled connection
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

mod reports;
mod transactions;

#[cfg(test)]
mod tests;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Columns selected for every transaction read, in `row_to_transaction` order
pub(crate) const TRANSACTION_COLUMNS: &str = "id, date, type, category, amount, description";

/// Parse a stored `"YYYY-MM-DD HH:MM:SS"` timestamp
pub(crate) fn parse_timestamp(s: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
}

/// Database wrapper around the process-scoped connection
///
/// The pool holds exactly one connection: there is a single user and a
/// single writer. Callers must not hold a `DbConn` while calling another
/// `Database` method.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
    /// Directory removed when the last clone of a scratch database drops
    #[cfg(any(test, feature = "test-utils"))]
    scratch_dir: Option<std::sync::Arc<tempfile::TempDir>>,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists
    ///
    /// An unopenable file fails immediately with `Error::Database`.
    pub fn new(path: &str) -> Result<Self> {
        // The pool retries failed connects until its timeout; surface engine
        // errors such as a missing directory before building it.
        rusqlite::Connection::open(path)?;

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(CONNECTION_TIMEOUT)
            .build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
            #[cfg(any(test, feature = "test-utils"))]
            scratch_dir: None,
        };
        db.run_migrations()?;

        info!(path = %path, "Opened database");
        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a file in a fresh temporary directory rather than `:memory:` so
    /// the pooled connection can be recycled without losing data. The
    /// directory is deleted when the database (and every clone) is dropped.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("famfin_test_").tempdir()?;
        let path = dir.path().join("ledger.db");

        let mut db = Self::new(&path.to_string_lossy())?;
        db.scratch_dir = Some(std::sync::Arc::new(dir));
        Ok(db)
    }

    /// Get the connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Create the schema if it is missing
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Transactions (income and expense records)
            -- AUTOINCREMENT keeps ids from being reused after deletion
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,              -- "YYYY-MM-DD HH:MM:SS"
                type TEXT NOT NULL,              -- 收入 (income) / 支出 (expense)
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                description TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_type ON transactions(type);
            "#,
        )?;

        debug!("Schema ready");
        Ok(())
    }

    /// Map a row selected with `TRANSACTION_COLUMNS`
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let date: String = row.get(1)?;
        let date = parse_timestamp(&date).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let kind: String = row.get(2)?;
        let kind = kind.parse::<Kind>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?;

        let description: Option<String> = row.get(5)?;

        Ok(Transaction {
            id: row.get(0)?,
            date,
            kind,
            category: row.get(3)?,
            amount: row.get(4)?,
            description: description.unwrap_or_default(),
        })
    }
}

//! Transaction service: validated mutations and running totals
//!
//! All input is validated before the store is touched, so a rejected call
//! leaves the database exactly as it was.

use chrono::{Local, NaiveDateTime, Timelike};
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{parse_amount, Kind, Totals, Transaction, TransactionInput};

/// Add, edit, delete and list transactions
pub struct TransactionService<'a> {
    db: &'a Database,
}

impl<'a> TransactionService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Record a new transaction stamped with the current local time
    pub fn add(
        &self,
        kind: Kind,
        category: &str,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        self.add_at(now(), kind, category, amount, description)
    }

    /// Record a new transaction from form text, where the amount is unparsed
    pub fn add_raw(
        &self,
        kind: Kind,
        category: &str,
        amount: &str,
        description: &str,
    ) -> Result<Transaction> {
        let amount = parse_amount(amount).inspect_err(|e| warn!("Rejected add: {}", e))?;
        self.add(kind, category, amount, description)
    }

    /// Record a new transaction with an explicit timestamp
    pub fn add_at(
        &self,
        date: NaiveDateTime,
        kind: Kind,
        category: &str,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        let input = TransactionInput::new(kind, category, amount, description)
            .validated()
            .inspect_err(|e| warn!("Rejected add: {}", e))?;

        let id = self.db.insert_transaction(date, &input)?;
        info!(id, kind = %input.kind, category = %input.category, amount = input.amount, "Added transaction");

        Ok(Transaction {
            id,
            date,
            kind: input.kind,
            category: input.category,
            amount: input.amount,
            description: input.description,
        })
    }

    /// Replace kind, category, amount and description of an existing record
    pub fn update(
        &self,
        id: i64,
        kind: Kind,
        category: &str,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        let input = TransactionInput::new(kind, category, amount, description)
            .validated()
            .inspect_err(|e| warn!(id, "Rejected update: {}", e))?;

        if !self.db.update_transaction(id, &input)? {
            return Err(not_found(id));
        }
        info!(id, "Updated transaction");

        self.get(id)
    }

    /// Delete a transaction permanently
    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.db.delete_transaction(id)? {
            return Err(not_found(id));
        }
        info!(id, "Deleted transaction");
        Ok(())
    }

    /// Fetch one transaction
    pub fn get(&self, id: i64) -> Result<Transaction> {
        self.db.get_transaction(id)?.ok_or_else(|| not_found(id))
    }

    /// All transactions, newest first
    pub fn list(&self) -> Result<Vec<Transaction>> {
        self.db.list_transactions(None)
    }

    /// The newest `limit` transactions
    pub fn recent(&self, limit: i64) -> Result<Vec<Transaction>> {
        self.db.list_transactions(Some(limit))
    }

    /// All-time income, expense and balance
    pub fn totals(&self) -> Result<Totals> {
        let income = self.db.sum_by_kind(Kind::Income)?;
        let expense = self.db.sum_by_kind(Kind::Expense)?;
        Ok(Totals::new(income, expense))
    }

    /// Remove every transaction, returning how many were deleted
    pub fn clear_all(&self) -> Result<usize> {
        let removed = self.db.delete_all_transactions()?;
        info!(removed, "Cleared all transactions");
        Ok(removed)
    }
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("transaction {}", id))
}

/// Current local time truncated to whole seconds
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

//! famfin core library
//!
//! Shared functionality for the famfin family finance ledger:
//! - SQLite transaction store
//! - Transaction service (validated add/edit/delete, running totals)
//! - Reports (monthly, per-category, yearly)
//! - CSV export and restore
//! - Analysis client for a remote chat-completions service

pub mod analysis;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod reports;

/// Test utilities including a mock chat-completions server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analysis::{Action, AnalysisBackend, AnalysisClient, ChatCompletionsBackend, MockBackend};
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use export::{ExportLocale, ExportRecord, ExportService};
pub use ledger::TransactionService;
pub use models::{
    CategoryBreakdown, CategoryTotal, CategoryTotalsByKind, DateWindow, Kind, MonthlyTotals,
    Totals, Transaction, TransactionInput, YearlyReport,
};
pub use reports::ReportService;

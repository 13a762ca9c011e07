//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use famfin_core::export::ExportLocale;
use famfin_core::models::Kind;

/// famfin - Family finance ledger
#[derive(Parser)]
#[command(name = "famfin")]
#[command(about = "Record household income and expenses, report on them, export them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (overrides config and FAMFIN_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file (default: <data dir>/famfin/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record a transaction stamped with the current time
    Add {
        /// income or expense (收入 / 支出 also accepted)
        #[arg(short, long)]
        kind: Kind,

        #[arg(short, long)]
        category: String,

        /// Positive amount
        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Replace kind, category, amount and description of a transaction
    Edit {
        id: i64,

        #[arg(short, long)]
        kind: Kind,

        #[arg(short, long)]
        category: String,

        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete a transaction
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show one transaction
    Show { id: i64 },

    /// List transactions, newest first
    List {
        /// Maximum number of rows (all when omitted)
        #[arg(short, long, value_parser = clap::value_parser!(i64).range(1..))]
        limit: Option<i64>,
    },

    /// All-time income, expense and balance
    Totals,

    /// Delete every transaction
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        report: ReportType,
    },

    /// Export all transactions to CSV
    Export {
        /// Output file (default: family_finance_export_<timestamp>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Header language: zh or en (default from config)
        #[arg(short, long)]
        locale: Option<ExportLocale>,
    },

    /// Restore transactions from an export file
    Import {
        /// CSV file written by `famfin export`
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Ask the analysis service about this month's spending
    Analyze,

    /// Ask the analysis service for advice on the last three months
    Advise,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Income, expense and balance for one month
    Month {
        /// Year (default: current)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month 1-12 (default: current)
        #[arg(short, long)]
        month: Option<u32>,
    },

    /// Per-category totals and shares
    Categories {
        #[arg(short, long, default_value = "expense")]
        kind: Kind,
    },

    /// Twelve monthly rows plus a yearly total
    Year {
        /// Year (default: current)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

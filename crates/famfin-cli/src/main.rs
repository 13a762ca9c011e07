//! famfin CLI - Family finance ledger
//!
//! Usage:
//!   famfin init                                   Initialize database
//!   famfin add -k expense -c 餐饮 -a 35.5          Record a transaction
//!   famfin report month                           This month's totals
//!   famfin export --locale en                     Export to CSV
//!   famfin advise                                 Ask for budgeting advice

mod cli;
mod commands;


use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use famfin_core::config::Config;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    let db_path: PathBuf = cli.db.clone().unwrap_or_else(|| config.database.path.clone());
    debug!(db = %db_path.display(), "Resolved database path");

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path),
        Commands::Add {
            kind,
            category,
            amount,
            description,
        } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_add(&db, kind, &category, &amount, &description).map(|_| ())
        }
        Commands::Edit {
            id,
            kind,
            category,
            amount,
            description,
        } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_edit(&db, id, kind, &category, &amount, &description).map(|_| ())
        }
        Commands::Delete { id, yes } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_delete(&db, id, yes).map(|_| ())
        }
        Commands::Show { id } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_show(&db, id)
        }
        Commands::List { limit } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_list(&db, limit)
        }
        Commands::Totals => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_totals(&db)
        }
        Commands::Clear { yes } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_clear(&db, yes).map(|_| ())
        }
        Commands::Report { report } => {
            let db = commands::open_db(&db_path)?;
            match report {
                ReportType::Month { year, month } => {
                    commands::cmd_report_month(&db, year, month).map(|_| ())
                }
                ReportType::Categories { kind } => commands::cmd_report_categories(&db, kind),
                ReportType::Year { year } => commands::cmd_report_year(&db, year).map(|_| ()),
            }
        }
        Commands::Export { output, locale } => {
            let db = commands::open_db(&db_path)?;
            let locale = locale.unwrap_or(config.export.locale);
            commands::cmd_export(&db, output.as_deref(), locale).map(|_| ())
        }
        Commands::Import { file } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_import(&db, &file).map(|_| ())
        }
        Commands::Analyze => {
            let client = commands::analysis_client(&config.analysis)?;
            let db = commands::open_db(&db_path)?;
            commands::cmd_analyze(&db, &client).await.map(|_| ())
        }
        Commands::Advise => {
            let client = commands::analysis_client(&config.analysis)?;
            let db = commands::open_db(&db_path)?;
            commands::cmd_advise(&db, &client).await.map(|_| ())
        }
    }
}

//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use famfin_core::db::Database;

/// Open the database file, creating it and its schema if absent
pub fn open_db(db_path: &Path) -> Result<Database> {
    Database::new(&db_path.to_string_lossy())
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let count = db.count_transactions()?;

    println!("✅ Database ready at {} ({} transactions).", db.path(), count);
    println!();
    println!("Next steps:");
    println!("  1. Record something: famfin add --kind expense --category 餐饮 --amount 35.5");
    println!("  2. See this month: famfin report month");

    Ok(())
}

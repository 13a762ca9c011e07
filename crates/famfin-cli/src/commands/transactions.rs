//! Transaction command implementations

use anyhow::Result;
use famfin_core::db::Database;
use famfin_core::ledger::TransactionService;
use famfin_core::models::{parse_amount, Kind, Transaction};

use super::{confirm, money, truncate};

fn print_row(tx: &Transaction) {
    let amount_str = match tx.kind {
        Kind::Expense => format!("\x1b[31m-{}\x1b[0m", money(tx.amount)), // Red for expenses
        Kind::Income => format!("\x1b[32m+{}\x1b[0m", money(tx.amount)),  // Green for income
    };

    println!(
        "   [{:>4}] {} │ {:<12} │ {:>12} │ {}",
        tx.id,
        tx.date_str(),
        truncate(&tx.category, 12),
        amount_str,
        truncate(&tx.description, 30)
    );
}

pub fn cmd_add(
    db: &Database,
    kind: Kind,
    category: &str,
    amount: &str,
    description: &str,
) -> Result<Transaction> {
    let tx = TransactionService::new(db).add_raw(kind, category, amount, description)?;

    println!("✅ Added transaction {}:", tx.id);
    print_row(&tx);

    Ok(tx)
}

pub fn cmd_edit(
    db: &Database,
    id: i64,
    kind: Kind,
    category: &str,
    amount: &str,
    description: &str,
) -> Result<Transaction> {
    let amount = parse_amount(amount)?;
    let tx = TransactionService::new(db).update(id, kind, category, amount, description)?;

    println!("✅ Updated transaction {}:", id);
    print_row(&tx);

    Ok(tx)
}

/// Delete one transaction; returns false when the user cancels
pub fn cmd_delete(db: &Database, id: i64, yes: bool) -> Result<bool> {
    let service = TransactionService::new(db);
    let tx = service.get(id)?;

    if !yes {
        let message = format!(
            "⚠️  This will permanently delete transaction {}:\n   {} │ {} │ {} │ {}",
            tx.id,
            tx.date_str(),
            tx.kind,
            tx.category,
            money(tx.amount)
        );
        if !confirm(&message)? {
            println!("Cancelled.");
            return Ok(false);
        }
    }

    service.delete(id)?;
    println!("✅ Deleted transaction {}.", id);

    Ok(true)
}

pub fn cmd_show(db: &Database, id: i64) -> Result<()> {
    let tx = TransactionService::new(db).get(id)?;

    println!();
    println!("📄 Transaction {}", tx.id);
    println!("   ─────────────────────────────");
    println!("   Date:        {}", tx.date_str());
    println!("   Type:        {} ({})", tx.kind, tx.kind.storage_tag());
    println!("   Category:    {}", tx.category);
    println!("   Amount:      {}", money(tx.amount));
    if !tx.description.is_empty() {
        println!("   Description: {}", tx.description);
    }

    Ok(())
}

pub fn cmd_list(db: &Database, limit: Option<i64>) -> Result<()> {
    let service = TransactionService::new(db);
    let transactions = match limit {
        Some(n) => service.recent(n)?,
        None => service.list()?,
    };

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  famfin add --kind expense --category 餐饮 --amount 35.5");
        return Ok(());
    }

    println!();
    println!("📝 Transactions");
    println!("   ─────────────────────────────────────────────────────────────────────────");

    for tx in &transactions {
        print_row(tx);
    }

    Ok(())
}

pub fn cmd_totals(db: &Database) -> Result<()> {
    let totals = TransactionService::new(db).totals()?;

    println!();
    println!("💰 All-time Totals");
    println!("   ─────────────────────────────");
    println!("   Income:  {:>14}", money(totals.income));
    println!("   Expense: {:>14}", money(totals.expense));
    println!("   Balance: {:>14}", money(totals.balance));

    Ok(())
}

/// Delete every transaction; returns the number removed (0 when cancelled)
pub fn cmd_clear(db: &Database, yes: bool) -> Result<usize> {
    let service = TransactionService::new(db);

    if !yes {
        let count = db.count_transactions()?;
        let message = format!(
            "⚠️  This will permanently delete all {} transactions.\n   Export first if you want a copy: famfin export",
            count
        );
        if !confirm(&message)? {
            println!("Cancelled.");
            return Ok(0);
        }
    }

    let removed = service.clear_all()?;
    println!("✅ Removed {} transactions.", removed);

    Ok(removed)
}

//! Report command implementations

use anyhow::Result;
use chrono::Datelike;
use famfin_core::db::Database;
use famfin_core::models::{Kind, MonthlyTotals, YearlyReport};
use famfin_core::reports::{today, ReportService};

use super::{money, truncate};

/// Resolve optional year/month flags against today's date
pub fn resolve_month(year: Option<i32>, month: Option<u32>) -> (i32, u32) {
    let now = today();
    (year.unwrap_or(now.year()), month.unwrap_or(now.month()))
}

pub fn cmd_report_month(
    db: &Database,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<MonthlyTotals> {
    let service = ReportService::new(db);
    let report = match (year, month) {
        (None, None) => service.current_month_totals()?,
        _ => {
            let (year, month) = resolve_month(year, month);
            service.monthly_totals(year, month)?
        }
    };

    println!();
    println!("📅 {}-{:02}", report.year, report.month);
    println!("   ─────────────────────────────");
    println!("   Income:  {:>14}", money(report.totals.income));
    println!("   Expense: {:>14}", money(report.totals.expense));
    println!("   Balance: {:>14}", money(report.totals.balance));

    Ok(report)
}

pub fn cmd_report_categories(db: &Database, kind: Kind) -> Result<()> {
    let breakdown = ReportService::new(db).category_breakdown(kind)?;

    if breakdown.categories.is_empty() {
        println!("No {} transactions recorded yet.", kind);
        return Ok(());
    }

    println!();
    println!("📊 {} by Category", capitalize(kind.as_str()));
    println!("   ───────────────────────────────────────────────");

    for cat in &breakdown.categories {
        let bar_width = (cat.percentage / 5.0).round() as usize;
        let bar = "█".repeat(bar_width);
        println!(
            "   {:<16} {:>12} {:>6.1}% {}",
            truncate(&cat.category, 16),
            money(cat.amount),
            cat.percentage,
            bar
        );
    }

    println!("   ───────────────────────────────────────────────");
    println!("   {:<16} {:>12}", "Total", money(breakdown.total));

    Ok(())
}

pub fn cmd_report_year(db: &Database, year: Option<i32>) -> Result<YearlyReport> {
    let year = year.unwrap_or(today().year());
    let report = ReportService::new(db).yearly_totals(year)?;

    println!();
    println!("📆 {} by Month", report.year);
    println!("   ─────────────────────────────────────────────────");
    println!("   {:<7} {:>13} {:>13} {:>13}", "Month", "Income", "Expense", "Balance");

    for m in &report.months {
        println!(
            "   {}-{:02} {:>13} {:>13} {:>13}",
            m.year,
            m.month,
            money(m.totals.income),
            money(m.totals.expense),
            money(m.totals.balance)
        );
    }

    println!("   ─────────────────────────────────────────────────");
    println!(
        "   {:<7} {:>13} {:>13} {:>13}",
        "Total",
        money(report.total.income),
        money(report.total.expense),
        money(report.total.balance)
    );

    Ok(report)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

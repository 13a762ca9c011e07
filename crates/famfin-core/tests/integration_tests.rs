//! Integration tests for famfin-core
//!
//! These tests exercise the full record → report → export → restore workflow.

use chrono::NaiveDateTime;
use famfin_core::{
    analysis::{AnalysisClient, MockBackend},
    db::Database,
    export::{read_csv, ExportLocale, ExportRecord, ExportService},
    ledger::TransactionService,
    models::{Kind, Totals, TIMESTAMP_FORMAT},
    reports::{advice_window, ReportService},
};

/// Open a ledger in a fresh temp directory; keep the guard alive while in use
fn open_ledger() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("family_finance.db");
    let db = Database::new(&path.to_string_lossy()).expect("Failed to create database");
    (dir, db)
}

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
}

/// A quarter of household activity spanning a year boundary
fn seed_household(db: &Database) {
    let ledger = TransactionService::new(db);
    let rows = [
        ("2024-11-05 09:00:00", Kind::Income, "工资", 8000.0, ""),
        ("2024-11-12 19:30:00", Kind::Expense, "餐饮", 320.0, "家庭聚餐"),
        ("2024-11-30 23:59:00", Kind::Expense, "房租", 3000.0, ""),
        ("2024-12-05 09:00:00", Kind::Income, "工资", 8000.0, ""),
        ("2024-12-24 18:00:00", Kind::Expense, "礼物", 650.0, "圣诞"),
        ("2024-12-31 22:00:00", Kind::Expense, "餐饮", 180.0, "跨年"),
        ("2025-01-05 09:00:00", Kind::Income, "工资", 8200.0, ""),
        ("2025-01-18 12:15:00", Kind::Expense, "交通", 60.0, "地铁, 公交"),
    ];
    for (date, kind, category, amount, description) in rows {
        ledger
            .add_at(ts(date), kind, category, amount, description)
            .expect("seed transaction");
    }
}

#[test]
fn test_record_then_report() {
    let (_dir, db) = open_ledger();
    seed_household(&db);

    let ledger = TransactionService::new(&db);
    let totals = ledger.totals().unwrap();
    assert_eq!(totals, Totals::new(24200.0, 4210.0));
    assert_eq!(totals.balance, totals.income - totals.expense);

    let reports = ReportService::new(&db);
    let nov = reports.monthly_totals(2024, 11).unwrap();
    assert_eq!(nov.totals, Totals::new(8000.0, 3320.0));

    let year = reports.yearly_totals(2024).unwrap();
    let summed: Totals = year.months.iter().map(|m| m.totals).sum();
    assert!((summed.income - year.total.income).abs() < 1e-9);
    assert!((summed.expense - year.total.expense).abs() < 1e-9);
    assert_eq!(year.total, Totals::new(16000.0, 4150.0));

    let breakdown = reports.category_breakdown(Kind::Expense).unwrap();
    assert_eq!(breakdown.categories[0].category, "房租");
    let shares: f64 = breakdown.categories.iter().map(|c| c.percentage).sum();
    assert!((shares - 100.0).abs() < 1e-9);
}

#[test]
fn test_export_restore_workflow() {
    let (_source_dir, source) = open_ledger();
    seed_household(&source);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("family_finance_export.csv");
    let exported = ExportService::new(&source)
        .export_csv(&path, ExportLocale::Zh)
        .unwrap();
    assert_eq!(exported, 8);

    let expected: Vec<ExportRecord> = source
        .list_transactions(None)
        .unwrap()
        .iter()
        .map(ExportRecord::from)
        .collect();
    let parsed = read_csv(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(parsed, expected);

    let (_target_dir, target) = open_ledger();
    let restored = ExportService::new(&target).import_csv(&path).unwrap();
    assert_eq!(restored, 8);

    let restored_totals = TransactionService::new(&target).totals().unwrap();
    let source_totals = TransactionService::new(&source).totals().unwrap();
    assert_eq!(restored_totals, source_totals);

    let source_year = ReportService::new(&source).yearly_totals(2024).unwrap();
    let target_year = ReportService::new(&target).yearly_totals(2024).unwrap();
    assert_eq!(source_year, target_year);
}

#[tokio::test]
async fn test_advice_request_uses_trailing_window() {
    let (_dir, db) = open_ledger();
    seed_household(&db);

    let window = advice_window(chrono::NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()).unwrap();
    let totals = ReportService::new(&db).category_totals_in(&window).unwrap();
    assert_eq!(totals.income.get("工资"), Some(&24200.0));
    assert_eq!(totals.expense.get("餐饮"), Some(&500.0));

    let mock = MockBackend::with_reply("建议减少外出就餐");
    let client = AnalysisClient::mock(mock.clone());
    let reply = client.advise(&totals).await.unwrap();
    assert_eq!(reply, "建议减少外出就餐");

    let prompts = mock.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("请分析以下advice数据：\n"));
    assert!(prompts[0].contains("\"礼物\": 650.0"));
}

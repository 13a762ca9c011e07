//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rusqlite::params;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    fn input(kind: Kind, category: &str, amount: f64) -> TransactionInput {
        TransactionInput::new(kind, category, amount, "")
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.count_transactions().unwrap(), 0);
        assert!(db.list_transactions(None).unwrap().is_empty());
    }

    #[test]
    fn test_open_missing_directory_fails_fast() {
        let started = std::time::Instant::now();
        let result = Database::new("/nonexistent_famfin_dir/ledger.db");

        assert!(matches!(result, Err(crate::error::Error::Database(_))));
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_scratch_database_removed_on_drop() {
        let db = Database::in_memory().unwrap();
        let path = std::path::PathBuf::from(db.path());
        let copy = db.clone();
        assert!(path.exists());

        drop(db);
        assert!(path.exists(), "a live clone keeps the file");

        drop(copy);
        assert!(!path.exists());
    }

    #[test]
    fn test_transactions_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'date', 'type', 'category', 'amount', 'description')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 6, "transactions table should have 6 expected columns");
    }

    #[test]
    fn test_reopen_is_idempotent_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new(path).unwrap();
            db.insert_transaction(ts("2024-03-01 09:00:00"), &input(Kind::Income, "Salary", 100.0))
                .unwrap();
        }

        let db = Database::new(path).unwrap();
        assert_eq!(db.count_transactions().unwrap(), 1);
    }

    #[test]
    fn test_insert_and_get() {
        let db = Database::in_memory().unwrap();
        let id = db
            .insert_transaction(
                ts("2024-05-10 12:30:00"),
                &TransactionInput::new(Kind::Expense, "餐饮", 35.5, "午饭"),
            )
            .unwrap();

        let tx = db.get_transaction(id).unwrap().unwrap();
        assert_eq!(tx.id, id);
        assert_eq!(tx.date_str(), "2024-05-10 12:30:00");
        assert_eq!(tx.kind, Kind::Expense);
        assert_eq!(tx.category, "餐饮");
        assert_eq!(tx.amount, 35.5);
        assert_eq!(tx.description, "午饭");

        assert!(db.get_transaction(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_kind_stored_as_legacy_tag() {
        let db = Database::in_memory().unwrap();
        let id = db
            .insert_transaction(ts("2024-05-10 12:30:00"), &input(Kind::Income, "Salary", 1.0))
            .unwrap();

        let conn = db.conn().unwrap();
        let tag: String = conn
            .query_row("SELECT type FROM transactions WHERE id = ?", params![id], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(tag, "收入");
    }

    #[test]
    fn test_null_description_reads_as_empty() {
        let db = Database::in_memory().unwrap();
        {
            let conn = db.conn().unwrap();
            conn.execute(
                "INSERT INTO transactions (date, type, category, amount, description) VALUES ('2024-01-01 00:00:00', '支出', 'Rent', 900, NULL)",
                [],
            )
            .unwrap();
        }

        let txs = db.list_transactions(None).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "");
    }

    #[test]
    fn test_update_keeps_date() {
        let db = Database::in_memory().unwrap();
        let id = db
            .insert_transaction(ts("2024-01-02 08:00:00"), &input(Kind::Expense, "Food", 10.0))
            .unwrap();

        let updated = db
            .update_transaction(id, &TransactionInput::new(Kind::Income, "Refund", 12.0, "x"))
            .unwrap();
        assert!(updated);

        let tx = db.get_transaction(id).unwrap().unwrap();
        assert_eq!(tx.date_str(), "2024-01-02 08:00:00");
        assert_eq!(tx.kind, Kind::Income);
        assert_eq!(tx.category, "Refund");
        assert_eq!(tx.amount, 12.0);
        assert_eq!(tx.description, "x");
    }

    #[test]
    fn test_update_missing_returns_false() {
        let db = Database::in_memory().unwrap();
        assert!(!db
            .update_transaction(42, &input(Kind::Expense, "Food", 1.0))
            .unwrap());
    }

    #[test]
    fn test_delete_and_ids_not_reused() {
        let db = Database::in_memory().unwrap();
        let first = db
            .insert_transaction(ts("2024-01-01 00:00:00"), &input(Kind::Expense, "A", 1.0))
            .unwrap();
        let second = db
            .insert_transaction(ts("2024-01-01 00:00:01"), &input(Kind::Expense, "B", 1.0))
            .unwrap();

        assert!(db.delete_transaction(second).unwrap());
        assert!(!db.delete_transaction(second).unwrap());

        let third = db
            .insert_transaction(ts("2024-01-01 00:00:02"), &input(Kind::Expense, "C", 1.0))
            .unwrap();
        assert!(third > second);
        assert!(second > first);
    }

    #[test]
    fn test_list_orders_by_date_then_id() {
        let db = Database::in_memory().unwrap();
        let old = db
            .insert_transaction(ts("2023-12-31 23:59:59"), &input(Kind::Expense, "Old", 1.0))
            .unwrap();
        let tie_a = db
            .insert_transaction(ts("2024-02-01 10:00:00"), &input(Kind::Expense, "A", 1.0))
            .unwrap();
        let tie_b = db
            .insert_transaction(ts("2024-02-01 10:00:00"), &input(Kind::Expense, "B", 1.0))
            .unwrap();

        let ids: Vec<i64> = db
            .list_transactions(None)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![tie_b, tie_a, old]);

        let limited = db.list_transactions(Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, tie_b);
    }

    #[test]
    fn test_delete_all() {
        let db = Database::in_memory().unwrap();
        for i in 0..3 {
            db.insert_transaction(
                ts(&format!("2024-01-0{} 00:00:00", i + 1)),
                &input(Kind::Expense, "X", 1.0),
            )
            .unwrap();
        }
        assert_eq!(db.delete_all_transactions().unwrap(), 3);
        assert_eq!(db.count_transactions().unwrap(), 0);
    }

    #[test]
    fn test_insert_transactions_batch() {
        let db = Database::in_memory().unwrap();
        let rows = vec![
            (ts("2024-01-01 00:00:00"), input(Kind::Income, "Salary", 100.0)),
            (ts("2024-01-02 00:00:00"), input(Kind::Expense, "Food", 20.0)),
        ];
        assert_eq!(db.insert_transactions(&rows).unwrap(), 2);
        assert_eq!(db.count_transactions().unwrap(), 2);
    }

    #[test]
    fn test_sums_default_to_zero() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.sum_by_kind(Kind::Income).unwrap(), 0.0);
        assert_eq!(db.sum_by_kind(Kind::Expense).unwrap(), 0.0);
        assert_eq!(db.sums_for_year(2024).unwrap(), (0.0, 0.0));

        let window = DateWindow::month(2024, 6).unwrap();
        assert_eq!(db.sum_by_kind_in(Kind::Income, &window).unwrap(), 0.0);
        assert!(db.category_sums_in(&window).unwrap().is_empty());
    }

    #[test]
    fn test_month_window_includes_last_day() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(ts("2024-04-30 23:15:00"), &input(Kind::Expense, "Food", 7.0))
            .unwrap();
        db.insert_transaction(ts("2024-04-01 00:00:00"), &input(Kind::Expense, "Food", 3.0))
            .unwrap();
        db.insert_transaction(ts("2024-05-01 00:00:00"), &input(Kind::Expense, "Food", 100.0))
            .unwrap();
        db.insert_transaction(ts("2024-03-31 23:59:59"), &input(Kind::Expense, "Food", 100.0))
            .unwrap();

        let april = DateWindow::month(2024, 4).unwrap();
        assert_eq!(db.sum_by_kind_in(Kind::Expense, &april).unwrap(), 10.0);
        assert_eq!(db.sum_by_kind_in(Kind::Income, &april).unwrap(), 0.0);
    }

    #[test]
    fn test_sums_for_year_filters_year() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(ts("2024-01-15 00:00:00"), &input(Kind::Income, "Salary", 50.0))
            .unwrap();
        db.insert_transaction(ts("2024-12-31 22:00:00"), &input(Kind::Expense, "Gift", 20.0))
            .unwrap();
        db.insert_transaction(ts("2025-01-01 00:00:00"), &input(Kind::Expense, "Gift", 99.0))
            .unwrap();

        assert_eq!(db.sums_for_year(2024).unwrap(), (50.0, 20.0));
        assert_eq!(db.sums_for_year(2025).unwrap(), (0.0, 99.0));
    }

    #[test]
    fn test_category_sums_ordering() {
        let db = Database::in_memory().unwrap();
        let day = ts("2024-01-01 00:00:00");
        db.insert_transaction(day, &input(Kind::Expense, "Food", 30.0)).unwrap();
        db.insert_transaction(day, &input(Kind::Expense, "Rent", 100.0)).unwrap();
        db.insert_transaction(day, &input(Kind::Expense, "Food", 40.0)).unwrap();
        db.insert_transaction(day, &input(Kind::Income, "Salary", 500.0)).unwrap();

        let sums = db.category_sums(Kind::Expense).unwrap();
        assert_eq!(
            sums,
            vec![("Rent".to_string(), 100.0), ("Food".to_string(), 70.0)]
        );
        assert_eq!(
            db.category_sums(Kind::Income).unwrap(),
            vec![("Salary".to_string(), 500.0)]
        );
    }

    #[test]
    fn test_category_sums_in_window() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(ts("2024-02-10 00:00:00"), &input(Kind::Income, "Salary", 5000.0))
            .unwrap();
        db.insert_transaction(ts("2024-02-11 00:00:00"), &input(Kind::Expense, "Food", 20.0))
            .unwrap();
        db.insert_transaction(ts("2024-02-12 00:00:00"), &input(Kind::Expense, "Food", 5.0))
            .unwrap();
        db.insert_transaction(ts("2024-03-01 00:00:00"), &input(Kind::Expense, "Food", 999.0))
            .unwrap();

        let window = DateWindow {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        let totals = db.category_sums_in(&window).unwrap();
        assert_eq!(totals.income.get("Salary"), Some(&5000.0));
        assert_eq!(totals.expense.get("Food"), Some(&25.0));
        assert_eq!(totals.expense.len(), 1);
    }
}

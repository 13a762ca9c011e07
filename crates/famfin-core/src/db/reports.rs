//! Aggregate queries for totals and reports

use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{CategoryTotalsByKind, DateWindow, Kind};

impl Database {
    /// Sum of all amounts of one kind
    pub fn sum_by_kind(&self, kind: Kind) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE type = ?",
            params![kind.storage_tag()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Sum of amounts of one kind inside a date window
    pub fn sum_by_kind_in(&self, kind: Kind, window: &DateWindow) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE type = ?1 AND date >= ?2 AND date < ?3
            "#,
            params![kind.storage_tag(), window.start_str(), window.end_str()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Income and expense sums for a calendar year in a single query
    pub fn sums_for_year(&self, year: i32) -> Result<(f64, f64)> {
        let conn = self.conn()?;
        let sums = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN type = ?1 THEN amount ELSE 0 END), 0) AS total_income,
                COALESCE(SUM(CASE WHEN type = ?2 THEN amount ELSE 0 END), 0) AS total_expense
            FROM transactions
            WHERE strftime('%Y', date) = ?3
            "#,
            params![
                Kind::Income.storage_tag(),
                Kind::Expense.storage_tag(),
                format!("{:04}", year)
            ],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(sums)
    }

    /// Per-category sums for one kind, largest first
    pub fn category_sums(&self, kind: Kind) -> Result<Vec<(String, f64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, SUM(amount) AS total
            FROM transactions
            WHERE type = ?
            GROUP BY category
            ORDER BY total DESC, category ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![kind.storage_tag()], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Per-(kind, category) sums inside a date window
    pub fn category_sums_in(&self, window: &DateWindow) -> Result<CategoryTotalsByKind> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT type, category, SUM(amount) AS total
            FROM transactions
            WHERE date >= ?1 AND date < ?2
            GROUP BY type, category
            "#,
        )?;

        let rows = stmt
            .query_map(params![window.start_str(), window.end_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut totals = CategoryTotalsByKind::default();
        for (tag, category, amount) in rows {
            // Anything not tagged as income counts as expense
            let kind = match tag.parse::<Kind>() {
                Ok(Kind::Income) => Kind::Income,
                _ => Kind::Expense,
            };
            totals.insert(kind, category, amount);
        }

        Ok(totals)
    }
}

//! Domain models for famfin

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Timestamp layout used in the `date` column and in exports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Transaction polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Literal stored in the `type` column. Existing ledger files use
    /// these tags.
    pub fn storage_tag(&self) -> &'static str {
        match self {
            Self::Income => "收入",
            Self::Expense => "支出",
        }
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" | "收入" => Ok(Self::Income),
            "expense" | "out" | "支出" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Creation time; never changed by edits
    pub date: NaiveDateTime,
    pub kind: Kind,
    pub category: String,
    pub amount: f64,
    pub description: String,
}

impl Transaction {
    /// Date formatted the way it is stored
    pub fn date_str(&self) -> String {
        self.date.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// User-editable fields of a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub kind: Kind,
    pub category: String,
    pub amount: f64,
    pub description: String,
}

impl TransactionInput {
    pub fn new(kind: Kind, category: &str, amount: f64, description: &str) -> Self {
        Self {
            kind,
            category: category.to_string(),
            amount,
            description: description.to_string(),
        }
    }

    /// Check and normalize the input.
    ///
    /// Category and description are trimmed; the category must not be empty
    /// and the amount must be a finite number greater than zero.
    pub fn validated(self) -> Result<Self> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(Error::Validation("category must not be empty".into()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::Validation(format!(
                "amount must be greater than 0 (got {})",
                self.amount
            )));
        }
        Ok(Self {
            kind: self.kind,
            category: category.to_string(),
            amount: self.amount,
            description: self.description.trim().to_string(),
        })
    }
}

/// Parse an amount typed by the user
pub fn parse_amount(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| Error::Validation(format!("amount is not a number: {:?}", text)))
}

/// Income, expense and their difference over some scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl Totals {
    pub fn new(income: f64, expense: f64) -> Self {
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

impl std::ops::Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Totals {
        Totals::new(self.income + rhs.income, self.expense + rhs.expense)
    }
}

impl std::iter::Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Self {
        iter.fold(Totals::default(), |acc, t| acc + t)
    }
}

/// Totals for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Twelve monthly rows plus the whole-year aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyReport {
    pub year: i32,
    pub months: Vec<MonthlyTotals>,
    /// Summed directly from the store, not from `months`
    pub total: Totals,
}

/// One category's share of a kind's total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    /// Percentage of the kind's total (0 when the total is 0)
    pub percentage: f64,
}

/// Categories of one kind, largest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub kind: Kind,
    pub total: f64,
    pub categories: Vec<CategoryTotal>,
}

/// Per-category totals for both kinds, as sent to the analysis endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotalsByKind {
    pub income: BTreeMap<String, f64>,
    pub expense: BTreeMap<String, f64>,
}

impl CategoryTotalsByKind {
    pub fn insert(&mut self, kind: Kind, category: String, amount: f64) {
        let map = match kind {
            Kind::Income => &mut self.income,
            Kind::Expense => &mut self.expense,
        };
        *map.entry(category).or_insert(0.0) += amount;
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expense.is_empty()
    }
}

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The calendar month `year-month`
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = first_of_month(year, month)?;
        let (ny, nm) = shift_month(year, month, 1);
        Ok(Self {
            start,
            end: first_of_month(ny, nm)?,
        })
    }

    /// From the first day of `months_back` months before `date`'s month
    /// through the end of `date`'s month
    pub fn trailing_months(date: NaiveDate, months_back: u32) -> Result<Self> {
        let (sy, sm) = shift_month(date.year(), date.month(), -(months_back as i32));
        let current = Self::month(date.year(), date.month())?;
        Ok(Self {
            start: first_of_month(sy, sm)?,
            end: current.end,
        })
    }

    /// Last day included in the window
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.end)
    }

    pub fn start_str(&self) -> String {
        self.start.to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.to_string()
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.last_day())
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::Validation(format!("invalid month: {}-{}", year, month)))
}

/// Move `year-month` by `delta` months, carrying across year boundaries
fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_all_spellings() {
        assert_eq!("income".parse::<Kind>().unwrap(), Kind::Income);
        assert_eq!("Expense".parse::<Kind>().unwrap(), Kind::Expense);
        assert_eq!("收入".parse::<Kind>().unwrap(), Kind::Income);
        assert_eq!("支出".parse::<Kind>().unwrap(), Kind::Expense);
        assert!("transfer".parse::<Kind>().is_err());
    }

    #[test]
    fn test_input_validation() {
        let ok = TransactionInput::new(Kind::Expense, "  Food ", 12.5, " lunch ")
            .validated()
            .unwrap();
        assert_eq!(ok.category, "Food");
        assert_eq!(ok.description, "lunch");

        assert!(TransactionInput::new(Kind::Expense, "   ", 1.0, "")
            .validated()
            .is_err());
        assert!(TransactionInput::new(Kind::Expense, "Food", 0.0, "")
            .validated()
            .is_err());
        assert!(TransactionInput::new(Kind::Expense, "Food", -3.0, "")
            .validated()
            .is_err());
        assert!(TransactionInput::new(Kind::Expense, "Food", f64::NAN, "")
            .validated()
            .is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 42.5 ").unwrap(), 42.5);
        assert!(matches!(parse_amount("abc"), Err(Error::Validation(_))));
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_totals_sum() {
        let total: Totals = vec![Totals::new(10.0, 4.0), Totals::new(5.0, 1.0)]
            .into_iter()
            .sum();
        assert_eq!(total, Totals::new(15.0, 5.0));
        assert_eq!(total.balance, 10.0);
    }

    #[test]
    fn test_month_window() {
        let w = DateWindow::month(2024, 2).unwrap();
        assert_eq!(w.start_str(), "2024-02-01");
        assert_eq!(w.end_str(), "2024-03-01");
        assert_eq!(w.last_day().to_string(), "2024-02-29");

        let dec = DateWindow::month(2023, 12).unwrap();
        assert_eq!(dec.end_str(), "2024-01-01");

        assert!(DateWindow::month(2024, 0).is_err());
        assert!(DateWindow::month(2024, 13).is_err());
    }

    #[test]
    fn test_trailing_months_rolls_over_year() {
        let jan = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let w = DateWindow::trailing_months(jan, 2).unwrap();
        assert_eq!(w.start_str(), "2024-11-01");
        assert_eq!(w.end_str(), "2025-02-01");

        let feb = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let w = DateWindow::trailing_months(feb, 2).unwrap();
        assert_eq!(w.start_str(), "2024-12-01");

        let may = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
        let w = DateWindow::trailing_months(may, 2).unwrap();
        assert_eq!(w.start_str(), "2025-03-01");
        assert_eq!(w.end_str(), "2025-06-01");
    }
}

//! Reporting engine: monthly, category and yearly aggregates
//!
//! Also computes the date windows used to collect data for analysis
//! requests.

use chrono::{Datelike, Local, NaiveDate};
use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::{
    CategoryBreakdown, CategoryTotal, CategoryTotalsByKind, DateWindow, Kind, MonthlyTotals,
    Totals, YearlyReport,
};

/// Months before the current one included in the advice window
const ADVICE_LOOKBACK_MONTHS: u32 = 2;

pub struct ReportService<'a> {
    db: &'a Database,
}

impl<'a> ReportService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Income, expense and balance for one calendar month
    ///
    /// Every timestamp from the first day through the last day of the month
    /// counts. A month without transactions yields zeros.
    pub fn monthly_totals(&self, year: i32, month: u32) -> Result<MonthlyTotals> {
        let window = DateWindow::month(year, month)?;
        let income = self.db.sum_by_kind_in(Kind::Income, &window)?;
        let expense = self.db.sum_by_kind_in(Kind::Expense, &window)?;
        debug!(year, month, income, expense, "Monthly totals");

        Ok(MonthlyTotals {
            year,
            month,
            totals: Totals::new(income, expense),
        })
    }

    /// `monthly_totals` for the current local month
    pub fn current_month_totals(&self) -> Result<MonthlyTotals> {
        let today = today();
        self.monthly_totals(today.year(), today.month())
    }

    /// Categories of one kind with their sums and shares, largest first
    pub fn category_breakdown(&self, kind: Kind) -> Result<CategoryBreakdown> {
        let sums = self.db.category_sums(kind)?;
        let total: f64 = sums.iter().map(|(_, amount)| amount).sum();

        let categories = sums
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category,
                amount,
                percentage: if total > 0.0 {
                    amount / total * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Ok(CategoryBreakdown {
            kind,
            total,
            categories,
        })
    }

    /// Twelve monthly rows plus a whole-year aggregate
    ///
    /// The aggregate is read from the store independently of the monthly
    /// rows; both paths must agree.
    pub fn yearly_totals(&self, year: i32) -> Result<YearlyReport> {
        let months = (1..=12)
            .map(|month| self.monthly_totals(year, month))
            .collect::<Result<Vec<_>>>()?;

        let (income, expense) = self.db.sums_for_year(year)?;

        Ok(YearlyReport {
            year,
            months,
            total: Totals::new(income, expense),
        })
    }

    /// Category totals inside a window, grouped by kind
    pub fn category_totals_in(&self, window: &DateWindow) -> Result<CategoryTotalsByKind> {
        self.db.category_sums_in(window)
    }
}

/// Window for an analysis request: the month containing `today`
pub fn analysis_window(today: NaiveDate) -> Result<DateWindow> {
    DateWindow::month(today.year(), today.month())
}

/// Window for an advice request: the month containing `today` and the two
/// months before it, carried into the previous year when needed
pub fn advice_window(today: NaiveDate) -> Result<DateWindow> {
    DateWindow::trailing_months(today, ADVICE_LOOKBACK_MONTHS)
}

/// Today's local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

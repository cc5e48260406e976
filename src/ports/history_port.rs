//! Daily close history port trait.

use chrono::NaiveDate;

use crate::domain::error::DashboardError;
use crate::domain::input::Symbol;
use crate::domain::price::PriceSeries;

pub trait HistoryPort {
    /// Closes for trading days in `[start, end]`, oldest first. Non-trading
    /// days are simply absent.
    fn fetch_history(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DashboardError>;
}

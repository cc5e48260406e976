//! Spot price lookup port trait.

use crate::domain::error::DashboardError;
use crate::domain::input::Symbol;

pub trait QuotePort {
    /// Latest traded price in INR. Every call may fail with `DataUnavailable`.
    fn spot_price(&self, symbol: &Symbol) -> Result<f64, DashboardError>;
}

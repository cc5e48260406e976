//! Dashboard actions: one method per user command.
//!
//! The dashboard owns the portfolio for the lifetime of a session and borrows
//! the market-data ports. Each action either completes or returns an error
//! with the ledger untouched.

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

use crate::domain::config_validation::DEFAULT_HISTORY_DAYS;
use crate::domain::error::DashboardError;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SLOW};
use crate::domain::indicator::{ema_series, macd_series, IndicatorSeries};
use crate::domain::input::{parse_share_count, parse_symbol, Symbol};
use crate::domain::portfolio::{AllocationSlice, Portfolio, PortfolioRow};
use crate::domain::position::PortfolioEntry;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;
use crate::ports::quote_port::QuotePort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSettings {
    pub history_days: u64,
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            history_days: DEFAULT_HISTORY_DAYS as u64,
            fast_period: DEFAULT_FAST,
            slow_period: DEFAULT_SLOW,
        }
    }
}

impl DashboardSettings {
    /// Reads `[history] days` and `[indicators]`; run `validate_config` first.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        let positive = |value: i64, fallback: u64| {
            u64::try_from(value)
                .ok()
                .filter(|v| *v > 0)
                .unwrap_or(fallback)
        };
        Self {
            history_days: positive(
                config.get_int("history", "days", DEFAULT_HISTORY_DAYS),
                defaults.history_days,
            ),
            fast_period: positive(
                config.get_int("indicators", "fast_period", DEFAULT_FAST as i64),
                defaults.fast_period as u64,
            ) as usize,
            slow_period: positive(
                config.get_int("indicators", "slow_period", DEFAULT_SLOW as i64),
                defaults.slow_period as u64,
            ) as usize,
        }
    }
}

/// Everything needed to draw the price/MACD chart for one symbol. Every
/// indicator series carries the dates of `series`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChart {
    pub symbol: Symbol,
    pub series: PriceSeries,
    pub fast_ema: IndicatorSeries,
    pub slow_ema: IndicatorSeries,
    pub macd: IndicatorSeries,
}

pub struct Dashboard<'a> {
    portfolio: Portfolio,
    quotes: &'a dyn QuotePort,
    history: &'a dyn HistoryPort,
    settings: DashboardSettings,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        quotes: &'a dyn QuotePort,
        history: &'a dyn HistoryPort,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            portfolio: Portfolio::new(),
            quotes,
            history,
            settings,
        }
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn spot_price(&self, symbol_text: &str) -> Result<(Symbol, f64), DashboardError> {
        let symbol = parse_symbol(symbol_text)?;
        let price = self.quotes.spot_price(&symbol)?;
        Ok((symbol, price))
    }

    /// Buys at the current spot price. Inputs are validated before any lookup.
    pub fn add_stock(
        &mut self,
        symbol_text: &str,
        shares_text: &str,
    ) -> Result<PortfolioEntry, DashboardError> {
        let symbol = parse_symbol(symbol_text)?;
        let shares = parse_share_count(shares_text)?;
        if shares == 0 {
            return Err(DashboardError::invalid_input(
                "number of shares must be greater than zero",
            ));
        }
        let price = self.quotes.spot_price(&symbol)?;
        let entry = self.portfolio.add_shares(&symbol, shares, price)?;
        Ok(entry.clone())
    }

    /// Returns the shares of `symbol` still held afterwards.
    pub fn delete_stock(
        &mut self,
        symbol_text: &str,
        shares_text: &str,
    ) -> Result<(Symbol, u64, u64), DashboardError> {
        let symbol = parse_symbol(symbol_text)?;
        let shares = parse_share_count(shares_text)?;
        let remaining = self.portfolio.delete_shares(&symbol, shares)?;
        Ok((symbol, shares, remaining))
    }

    pub fn rows(&self) -> Vec<PortfolioRow> {
        self.portfolio.rows()
    }

    pub fn total_value(&self) -> f64 {
        self.portfolio.total_value()
    }

    pub fn allocation(&self) -> Vec<AllocationSlice> {
        self.portfolio.allocation()
    }

    /// Closes for the configured window ending `today`, plus today's spot
    /// price when the quote lookup succeeds. A spot price for a date already
    /// in the history replaces that close.
    pub fn price_history(
        &self,
        symbol_text: &str,
        today: NaiveDate,
    ) -> Result<(Symbol, PriceSeries), DashboardError> {
        let symbol = parse_symbol(symbol_text)?;
        let start = today
            .checked_sub_days(Days::new(self.settings.history_days))
            .ok_or_else(|| DashboardError::invalid_input("history window is out of range"))?;

        debug!(symbol = %symbol, %start, end = %today, "fetching history");
        let history = self.history.fetch_history(&symbol, start, today)?;
        if history.is_empty() {
            return Err(DashboardError::data_unavailable(
                symbol.as_str(),
                format!("no prices between {} and {}", start, today),
            ));
        }

        let series = match self.quotes.spot_price(&symbol) {
            Ok(price) => with_spot(history, today, price),
            Err(e) => {
                warn!(
                    symbol = %symbol,
                    error = %e,
                    "spot price unavailable, showing history only"
                );
                history
            }
        };
        Ok((symbol, series))
    }

    pub fn price_chart(
        &self,
        symbol_text: &str,
        today: NaiveDate,
    ) -> Result<PriceChart, DashboardError> {
        let (symbol, series) = self.price_history(symbol_text, today)?;
        let (fast, slow) = (self.settings.fast_period, self.settings.slow_period);
        Ok(PriceChart {
            fast_ema: ema_series(&series, fast)?,
            slow_ema: ema_series(&series, slow)?,
            macd: macd_series(&series, fast, slow)?,
            symbol,
            series,
        })
    }
}

/// Appends the spot price as today's close. A history that already ends
/// today gets that close replaced instead, so the series never holds two
/// points for one date.
fn with_spot(history: PriceSeries, today: NaiveDate, price: f64) -> PriceSeries {
    let mut points = history.points().to_vec();
    match points.last_mut() {
        Some(last) if last.date == today => last.price = price,
        _ => points.push(PricePoint { date: today, price }),
    }
    PriceSeries::from_points(points)
}

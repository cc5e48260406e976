//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow). No signal line or histogram.
//!
//! Default parameters: fast=8, slow=20

use crate::domain::error::DashboardError;
use crate::domain::indicator::{calculate_ema, IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PriceSeries;

pub const DEFAULT_FAST: usize = 8;
pub const DEFAULT_SLOW: usize = 20;

/// MACD line plus the two EMAs it was derived from, all aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdResult {
    pub line: Vec<f64>,
    pub fast_ema: Vec<f64>,
    pub slow_ema: Vec<f64>,
}

pub fn calculate_macd(
    prices: &[f64],
    fast: usize,
    slow: usize,
) -> Result<MacdResult, DashboardError> {
    let fast_ema = calculate_ema(prices, fast)?;
    let slow_ema = calculate_ema(prices, slow)?;

    let line = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    Ok(MacdResult {
        line,
        fast_ema,
        slow_ema,
    })
}

pub fn calculate_macd_default(prices: &[f64]) -> Result<MacdResult, DashboardError> {
    calculate_macd(prices, DEFAULT_FAST, DEFAULT_SLOW)
}

pub fn macd_series(
    series: &PriceSeries,
    fast: usize,
    slow: usize,
) -> Result<IndicatorSeries, DashboardError> {
    let macd = calculate_macd(&series.closes(), fast, slow)?;
    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Macd { fast, slow },
        values: series
            .points()
            .iter()
            .zip(macd.line)
            .map(|(p, value)| IndicatorPoint {
                date: p.date,
                value,
            })
            .collect(),
    })
}

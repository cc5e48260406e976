//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first price (no SMA warmup),
//! then EMA[i] = (C[i] - EMA[i-1]) * k + EMA[i-1].
//! Every output point is valid, so the period may exceed the series length.

use crate::domain::error::DashboardError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PriceSeries;

pub fn calculate_ema(prices: &[f64], period: usize) -> Result<Vec<f64>, DashboardError> {
    if period == 0 {
        return Err(DashboardError::invalid_input("EMA period must be at least 1"));
    }
    let Some((&seed, rest)) = prices.split_first() else {
        return Err(DashboardError::invalid_input("price series is empty"));
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(prices.len());
    let mut ema = seed;
    values.push(ema);

    for &price in rest {
        ema = (price - ema) * k + ema;
        values.push(ema);
    }

    Ok(values)
}

/// EMA of a dated series, keeping each input date.
pub fn ema_series(series: &PriceSeries, period: usize) -> Result<IndicatorSeries, DashboardError> {
    let values = calculate_ema(&series.closes(), period)?;
    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values: series
            .points()
            .iter()
            .zip(values)
            .map(|(p, value)| IndicatorPoint {
                date: p.date,
                value,
            })
            .collect(),
    })
}

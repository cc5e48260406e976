//! Technical indicator implementations.
//!
//! - `calculate_ema` / `calculate_macd`: raw value vectors aligned with the input prices
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a dated series, one point per input price

pub mod ema;
pub mod macd;

pub use ema::{calculate_ema, ema_series};
pub use macd::{calculate_macd, calculate_macd_default, macd_series, MacdResult};

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Macd { fast: usize, slow: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn raw_values(&self) -> Vec<f64> {
        self.values.iter().map(|p| p.value).collect()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA {}", period),
            IndicatorType::Macd { fast, slow } => write!(f, "MACD {}/{}", fast, slow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display_ema() {
        assert_eq!(IndicatorType::Ema(20).to_string(), "EMA 20");
    }

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd { fast: 8, slow: 20 };
        assert_eq!(macd.to_string(), "MACD 8/20");
    }

    #[test]
    fn indicator_type_hash_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(IndicatorType::Ema(8), "fast");
        map.insert(IndicatorType::Ema(20), "slow");

        assert_eq!(map.get(&IndicatorType::Ema(8)), Some(&"fast"));
        assert_eq!(map.get(&IndicatorType::Ema(20)), Some(&"slow"));
        assert_eq!(map.get(&IndicatorType::Ema(9)), None);
    }
}

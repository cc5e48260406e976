#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use stockdash::domain::error::DashboardError;
use stockdash::domain::input::Symbol;
pub use stockdash::domain::price::{PricePoint, PriceSeries};
use stockdash::ports::history_port::HistoryPort;
use stockdash::ports::quote_port::QuotePort;

/// Quotes keyed by symbol; prices can be changed between calls.
pub struct MockQuotePort {
    pub prices: RefCell<HashMap<String, f64>>,
    pub calls: Cell<usize>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            prices: RefCell::new(HashMap::new()),
            calls: Cell::new(0),
        }
    }

    pub fn with_price(self, symbol: &str, price: f64) -> Self {
        self.set_price(symbol, price);
        self
    }

    pub fn set_price(&self, symbol: &str, price: f64) {
        self.prices.borrow_mut().insert(symbol.to_string(), price);
    }

    pub fn remove_price(&self, symbol: &str) {
        self.prices.borrow_mut().remove(symbol);
    }
}

impl QuotePort for MockQuotePort {
    fn spot_price(&self, symbol: &Symbol) -> Result<f64, DashboardError> {
        self.calls.set(self.calls.get() + 1);
        self.prices
            .borrow()
            .get(symbol.as_str())
            .copied()
            .ok_or_else(|| DashboardError::data_unavailable(symbol.as_str(), "no quote"))
    }
}

/// Daily closes keyed by symbol, filtered to the requested window.
pub struct MockHistoryPort {
    pub data: HashMap<String, Vec<PricePoint>>,
}

impl MockHistoryPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }
}

impl HistoryPort for MockHistoryPort {
    fn fetch_history(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DashboardError> {
        let points: Vec<PricePoint> = self
            .data
            .get(symbol.as_str())
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start && p.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if points.is_empty() {
            return Err(DashboardError::data_unavailable(
                symbol.as_str(),
                "no data returned",
            ));
        }
        Ok(PriceSeries::from_points(points))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily closes ending the day before `today`.
pub fn closes_before(today: NaiveDate, prices: &[f64]) -> Vec<PricePoint> {
    let n = prices.len() as u64;
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            date: today - chrono::Days::new(n - i as u64),
            price,
        })
        .collect()
}

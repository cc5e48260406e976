//! Offline quotes from the `[prices]` config section.

use std::collections::HashMap;

use crate::domain::error::DashboardError;
use crate::domain::input::Symbol;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;

#[derive(Debug, Clone, Default)]
pub struct StaticQuoteAdapter {
    prices: HashMap<String, f64>,
}

impl StaticQuoteAdapter {
    pub fn new(prices: HashMap<String, f64>) -> Self {
        Self {
            prices: prices
                .into_iter()
                .map(|(symbol, price)| (symbol.trim().to_uppercase(), price))
                .collect(),
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let prices = config
            .keys("prices")
            .into_iter()
            .filter_map(|key| {
                let price = config.get_double("prices", &key, f64::NAN);
                (price.is_finite() && price > 0.0).then_some((key, price))
            })
            .collect();
        Self::new(prices)
    }
}

impl QuotePort for StaticQuoteAdapter {
    fn spot_price(&self, symbol: &Symbol) -> Result<f64, DashboardError> {
        self.prices.get(symbol.as_str()).copied().ok_or_else(|| {
            DashboardError::data_unavailable(symbol.as_str(), "no price in [prices] section")
        })
    }
}

//! Spot price scraped from the Google Finance quote page.
//!
//! Tries `{base_url}/{SYMBOL}:{EXCHANGE}` for each configured exchange in
//! order (NSE, then BOM by default); the first page with a readable price wins.

use reqwest::blocking::Client;
use tracing::debug;

use crate::adapters::http_client::{fetch_text, GatewaySettings};
use crate::domain::error::DashboardError;
use crate::domain::input::Symbol;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;

pub const DEFAULT_QUOTE_URL: &str = "https://www.google.com/finance/quote";
pub const DEFAULT_EXCHANGES: [&str; 2] = ["NSE", "BOM"];

const PRICE_CLASS: &str = "class=\"YMlKec fxKbKc\"";

pub struct GoogleQuoteAdapter {
    client: Client,
    base_url: String,
    exchanges: Vec<String>,
}

impl GoogleQuoteAdapter {
    pub fn new(client: Client, base_url: String, exchanges: Vec<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            exchanges,
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DashboardError> {
        let client = GatewaySettings::from_config(config).build_client()?;
        let base_url = config
            .get_string("quote", "base_url")
            .unwrap_or_else(|| DEFAULT_QUOTE_URL.to_string());
        let exchanges = config
            .get_list("quote", "exchanges")
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_EXCHANGES.iter().map(|s| s.to_string()).collect());
        Ok(Self::new(client, base_url, exchanges))
    }

    pub fn quote_url(&self, symbol: &Symbol, exchange: &str) -> String {
        format!("{}/{}:{}", self.base_url, symbol, exchange)
    }

    fn try_exchange(&self, symbol: &Symbol, exchange: &str) -> Result<f64, String> {
        let url = self.quote_url(symbol, exchange);
        debug!(%url, "fetching quote page");
        let html = fetch_text(&self.client, &url).map_err(|e| e.to_string())?;
        extract_quote_price(&html).ok_or_else(|| "price element not found".to_string())
    }
}

impl QuotePort for GoogleQuoteAdapter {
    fn spot_price(&self, symbol: &Symbol) -> Result<f64, DashboardError> {
        for exchange in &self.exchanges {
            match self.try_exchange(symbol, exchange) {
                Ok(price) => {
                    debug!(symbol = %symbol, %exchange, price, "quote found");
                    return Ok(price);
                }
                Err(reason) => {
                    debug!(symbol = %symbol, %exchange, %reason, "quote lookup failed");
                }
            }
        }
        Err(DashboardError::data_unavailable(
            symbol.as_str(),
            format!("no price found on {}", self.exchanges.join(" or ")),
        ))
    }
}

/// Price text of the first quote element in a Google Finance page.
pub fn extract_quote_price(html: &str) -> Option<f64> {
    let class_at = html.find(PRICE_CLASS)?;
    let after_class = &html[class_at + PRICE_CLASS.len()..];
    let text_start = after_class.find('>')? + 1;
    let text = &after_class[text_start..];
    let text_end = text.find('<')?;
    parse_price_text(&text[..text_end])
}

/// Parses text such as `₹3,512.45`; zero and negative values are rejected.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .replace("&#8377;", "")
        .chars()
        .filter(|c| *c != '₹' && *c != ',' && !c.is_whitespace())
        .collect();
    let price: f64 = cleaned.parse().ok()?;
    (price.is_finite() && price > 0.0).then_some(price)
}

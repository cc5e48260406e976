//! Daily close history from the Yahoo Finance chart API.
//!
//! Symbols get an exchange suffix (`.NS` by default). Adjusted closes are
//! preferred over raw closes; days with a null close are skipped.

use chrono::{DateTime, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::http_client::{fetch_text, GatewaySettings};
use crate::domain::error::DashboardError;
use crate::domain::input::Symbol;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;

pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_SUFFIX: &str = ".NS";

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

pub struct YahooHistoryAdapter {
    client: Client,
    base_url: String,
    suffix: String,
}

impl YahooHistoryAdapter {
    pub fn new(client: Client, base_url: String, suffix: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            suffix,
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DashboardError> {
        let client = GatewaySettings::from_config(config).build_client()?;
        let base_url = config
            .get_string("history", "base_url")
            .unwrap_or_else(|| DEFAULT_CHART_URL.to_string());
        let suffix = config
            .get_string("history", "suffix")
            .unwrap_or_else(|| DEFAULT_SUFFIX.to_string());
        Ok(Self::new(client, base_url, suffix))
    }

    /// `period2` is exclusive, so the end date is pushed one day forward.
    pub fn chart_url(&self, symbol: &Symbol, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/{}{}?period1={}&period2={}&interval=1d",
            self.base_url,
            symbol,
            self.suffix,
            unix_midnight(start),
            unix_midnight(end) + SECONDS_PER_DAY,
        )
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

impl HistoryPort for YahooHistoryAdapter {
    fn fetch_history(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DashboardError> {
        let url = self.chart_url(symbol, start, end);
        debug!(%url, "fetching price history");
        let body = fetch_text(&self.client, &url)
            .map_err(|e| DashboardError::data_unavailable(symbol.as_str(), e.to_string()))?;

        let series = parse_chart_response(&body)
            .map_err(|reason| DashboardError::data_unavailable(symbol.as_str(), reason))?;

        let points: Vec<PricePoint> = series
            .points()
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .cloned()
            .collect();
        if points.is_empty() {
            return Err(DashboardError::data_unavailable(
                symbol.as_str(),
                "no data returned",
            ));
        }
        Ok(PriceSeries::from_points(points))
    }
}

/// Parses a chart API body into exchange-local dated closes.
pub fn parse_chart_response(json: &str) -> Result<PriceSeries, String> {
    let response: ChartResponse =
        serde_json::from_str(json).map_err(|e| format!("unreadable chart response: {}", e))?;

    if let Some(error) = response.chart.error {
        return Err(format!("API error [{}]: {}", error.code, error.description));
    }

    let data = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| "no data returned".to_string())?;

    let closes = data
        .indicators
        .adjclose
        .and_then(|a| a.into_iter().next())
        .map(|a| a.adjclose)
        .filter(|values| values.iter().any(Option::is_some))
        .or_else(|| {
            data.indicators
                .quote
                .into_iter()
                .next()
                .map(|q| q.close)
        })
        .ok_or_else(|| "no close prices in response".to_string())?;

    let mut series = PriceSeries::new();
    for (ts, close) in data.timestamp.iter().zip(closes) {
        let Some(price) = close.filter(|p| p.is_finite() && *p > 0.0) else {
            continue;
        };
        let Some(local) = DateTime::from_timestamp(ts + data.meta.gmtoffset, 0) else {
            continue;
        };
        series.push(local.date_naive(), price);
    }
    Ok(series)
}

//! CSV file history adapter.
//!
//! Reads `{dir}/{SYMBOL}.csv` with a header row containing `date` and
//! `close` columns (any order, extra columns ignored). Closes that are not
//! positive finite numbers are skipped.

use crate::domain::error::DashboardError;
use crate::domain::input::Symbol;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::history_port::HistoryPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvHistoryAdapter {
    base_path: PathBuf,
}

impl CsvHistoryAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &Symbol) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

impl HistoryPort for CsvHistoryAdapter {
    fn fetch_history(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DashboardError> {
        let unavailable = |reason: String| DashboardError::data_unavailable(symbol.as_str(), reason);

        let path = self.csv_path(symbol);
        debug!(path = %path.display(), "reading price history");
        let content = fs::read_to_string(&path)
            .map_err(|e| unavailable(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| unavailable(format!("CSV parse error: {}", e)))?
            .clone();
        let date_col = column(&headers, "date")
            .ok_or_else(|| unavailable("missing date column".into()))?;
        let close_col = column(&headers, "close")
            .ok_or_else(|| unavailable("missing close column".into()))?;

        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| unavailable(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_col)
                .ok_or_else(|| unavailable("missing date value".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| unavailable(format!("invalid date '{}': {}", date_str, e)))?;

            if date < start || date > end {
                continue;
            }

            let close_str = record
                .get(close_col)
                .ok_or_else(|| unavailable("missing close value".into()))?;
            let price: f64 = close_str
                .trim()
                .parse()
                .map_err(|e| unavailable(format!("invalid close '{}': {}", close_str, e)))?;
            if !price.is_finite() || price <= 0.0 {
                debug!(%date, price, "skipping non-positive close");
                continue;
            }

            points.push(PricePoint { date, price });
        }

        if points.is_empty() {
            return Err(unavailable(format!(
                "no prices between {} and {}",
                start, end
            )));
        }

        points.sort_by_key(|p| p.date);
        Ok(PriceSeries::from_points(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::input::parse_symbol;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-17,3720.0,3760.0,3700.0,3755.5,50000\n\
            2024-01-15,3700.0,3740.0,3690.0,3712.0,60000\n\
            2024-01-16,3712.0,3730.0,3680.0,3701.25,55000\n";
        fs::write(path.join("TCS.csv"), csv_content).unwrap();
        fs::write(path.join("INFY.csv"), "close,date\n1510.5,2024-01-15\n").unwrap();
        fs::write(path.join("WIPRO.csv"), "date,price\n2024-01-15,450\n").unwrap();

        (dir, path)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn fetch_history_sorted_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);

        let series = adapter
            .fetch_history(&parse_symbol("tcs").unwrap(), date(1), date(31))
            .unwrap();

        assert_eq!(series.dates(), vec![date(15), date(16), date(17)]);
        assert_eq!(series.closes(), vec![3712.0, 3701.25, 3755.5]);
    }

    #[test]
    fn fetch_history_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);

        let series = adapter
            .fetch_history(&parse_symbol("TCS").unwrap(), date(16), date(16))
            .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.first().unwrap().date, date(16));
    }

    #[test]
    fn columns_located_by_header() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);

        let series = adapter
            .fetch_history(&parse_symbol("INFY").unwrap(), date(1), date(31))
            .unwrap();
        assert_eq!(series.closes(), vec![1510.5]);
    }

    #[test]
    fn missing_close_column_is_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);

        let err = adapter
            .fetch_history(&parse_symbol("WIPRO").unwrap(), date(1), date(31))
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);

        let err = adapter
            .fetch_history(&parse_symbol("XYZ").unwrap(), date(1), date(31))
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { symbol, .. } if symbol == "XYZ"));
    }

    #[test]
    fn empty_window_is_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        assert!(
            adapter
                .fetch_history(&parse_symbol("TCS").unwrap(), start, end)
                .is_err()
        );
    }

    #[test]
    fn non_positive_and_non_finite_closes_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "date,close\n2024-01-10,NaN\n2024-01-11,-5\n2024-01-12,0\n2024-01-13,inf\n2024-01-14,101.5\n",
        )
        .unwrap();
        let adapter = CsvHistoryAdapter::new(dir.path().to_path_buf());

        let series = adapter
            .fetch_history(&parse_symbol("BAD").unwrap(), date(1), date(31))
            .unwrap();
        assert_eq!(series.dates(), vec![date(14)]);
        assert_eq!(series.closes(), vec![101.5]);
    }

    #[test]
    fn only_invalid_closes_is_unavailable() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "date,close\n2024-01-10,NaN\n2024-01-11,-5\n2024-01-12,0\n",
        )
        .unwrap();
        let adapter = CsvHistoryAdapter::new(dir.path().to_path_buf());

        let err = adapter
            .fetch_history(&parse_symbol("BAD").unwrap(), date(1), date(31))
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }
}

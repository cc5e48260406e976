//! Concrete adapter implementations for ports.

#[cfg(feature = "net")]
pub mod google_quote_adapter;
#[cfg(feature = "net")]
pub mod http_client;
#[cfg(feature = "net")]
pub mod yahoo_history_adapter;
pub mod csv_history_adapter;
pub mod file_config_adapter;
pub mod static_quote_adapter;
pub mod svg_chart_adapter;

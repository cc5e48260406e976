//! Port traits implemented by the adapters.

pub mod chart_port;
pub mod config_port;
pub mod history_port;
pub mod quote_port;

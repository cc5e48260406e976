//! stockdash — terminal stock dashboard: spot quotes, a session share
//! portfolio, and 30-day price charts with EMA/MACD overlays.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;

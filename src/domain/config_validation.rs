//! Configuration validation.
//!
//! Every key is optional; only values that are present get checked.

use crate::domain::error::DashboardError;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SLOW};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_HISTORY_DAYS: i64 = 30;
pub const DEFAULT_TIMEOUT_SECS: i64 = 10;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    validate_timeout(config)?;
    validate_history_days(config)?;
    validate_indicator_periods(config)?;
    validate_exchanges(config)?;
    validate_static_prices(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DashboardError {
    DashboardError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Absent keys take the default; present keys must parse as integers.
fn require_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, DashboardError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(section, key, format!("'{}' is not an integer", raw))),
    }
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let value = require_int(config, "gateway", "timeout_secs", DEFAULT_TIMEOUT_SECS)?;
    if value <= 0 {
        return Err(invalid("gateway", "timeout_secs", "timeout_secs must be positive"));
    }
    Ok(())
}

fn validate_history_days(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let value = require_int(config, "history", "days", DEFAULT_HISTORY_DAYS)?;
    if value <= 0 {
        return Err(invalid("history", "days", "days must be positive"));
    }
    Ok(())
}

fn validate_indicator_periods(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let fast = require_int(config, "indicators", "fast_period", DEFAULT_FAST as i64)?;
    let slow = require_int(config, "indicators", "slow_period", DEFAULT_SLOW as i64)?;
    if fast <= 0 {
        return Err(invalid("indicators", "fast_period", "fast_period must be positive"));
    }
    if slow <= 0 {
        return Err(invalid("indicators", "slow_period", "slow_period must be positive"));
    }
    if fast >= slow {
        return Err(invalid(
            "indicators",
            "fast_period",
            format!("fast_period ({}) must be less than slow_period ({})", fast, slow),
        ));
    }
    Ok(())
}

fn validate_exchanges(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    match config.get_list("quote", "exchanges") {
        Some(exchanges) if exchanges.is_empty() => Err(invalid(
            "quote",
            "exchanges",
            "at least one exchange is required",
        )),
        _ => Ok(()),
    }
}

fn validate_static_prices(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    for key in config.keys("prices") {
        let value = config.get_double("prices", &key, f64::NAN);
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid("prices", &key, "price must be a positive number"));
        }
    }
    Ok(())
}

//! Validation of user-typed symbol and share-count text.

use std::fmt;

use crate::domain::error::DashboardError;

/// A ticker symbol: trimmed, uppercase, never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn parse_symbol(text: &str) -> Result<Symbol, DashboardError> {
    let symbol = text.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(DashboardError::invalid_input("enter a stock symbol"));
    }
    if symbol.chars().any(char::is_whitespace) {
        return Err(DashboardError::invalid_input(format!(
            "symbol '{}' must not contain spaces",
            symbol
        )));
    }
    Ok(Symbol(symbol))
}

/// Digits only: no sign, no decimal point, no separators.
pub fn parse_share_count(text: &str) -> Result<u64, DashboardError> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DashboardError::invalid_input(format!(
            "'{}' is not a valid number of shares",
            text
        )));
    }
    text.parse::<u64>().map_err(|_| {
        DashboardError::invalid_input(format!("share count '{}' is too large", text))
    })
}

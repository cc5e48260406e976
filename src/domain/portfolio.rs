//! In-memory share ledger keyed by symbol.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::info;

use super::error::DashboardError;
use super::input::Symbol;
use super::position::{validate_unit_price, PortfolioEntry};

/// One display row of the portfolio table.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioRow {
    pub symbol: Symbol,
    pub shares: u64,
    pub unit_price: f64,
    pub value: f64,
}

/// A symbol's share of total portfolio value; `weight` is in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSlice {
    pub symbol: Symbol,
    pub value: f64,
    pub weight: f64,
}

/// Rows iterate in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    entries: BTreeMap<Symbol, PortfolioEntry>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shares(
        &mut self,
        symbol: &Symbol,
        shares: u64,
        unit_price: f64,
    ) -> Result<&PortfolioEntry, DashboardError> {
        if shares == 0 {
            return Err(DashboardError::invalid_input(
                "number of shares must be greater than zero",
            ));
        }
        validate_unit_price(unit_price)?;

        match self.entries.entry(symbol.clone()) {
            Entry::Occupied(mut held) => held.get_mut().accumulate(shares, unit_price)?,
            Entry::Vacant(slot) => {
                slot.insert(PortfolioEntry::new(symbol.clone(), shares, unit_price)?);
            }
        }

        let entry = &self.entries[symbol];
        info!(
            symbol = %symbol,
            added = shares,
            held = entry.shares(),
            unit_price,
            "shares added"
        );
        Ok(entry)
    }

    /// Returns the shares still held; the entry is dropped when that reaches zero.
    pub fn delete_shares(&mut self, symbol: &Symbol, shares: u64) -> Result<u64, DashboardError> {
        if shares == 0 {
            return Err(DashboardError::invalid_input(
                "number of shares must be greater than zero",
            ));
        }
        let entry = self
            .entries
            .get_mut(symbol)
            .ok_or_else(|| DashboardError::NotFound {
                symbol: symbol.to_string(),
            })?;

        let remaining = entry.reduce(shares)?;
        if remaining == 0 {
            self.entries.remove(symbol);
        }
        info!(symbol = %symbol, deleted = shares, remaining, "shares deleted");
        Ok(remaining)
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&PortfolioEntry> {
        self.entries.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_value(&self) -> f64 {
        self.entries.values().map(PortfolioEntry::market_value).sum()
    }

    pub fn rows(&self) -> Vec<PortfolioRow> {
        self.entries
            .values()
            .map(|e| PortfolioRow {
                symbol: e.symbol().clone(),
                shares: e.shares(),
                unit_price: e.unit_price(),
                value: e.market_value(),
            })
            .collect()
    }

    pub fn allocation(&self) -> Vec<AllocationSlice> {
        let total = self.total_value();
        if total <= 0.0 {
            return Vec::new();
        }
        self.entries
            .values()
            .map(|e| {
                let value = e.market_value();
                AllocationSlice {
                    symbol: e.symbol().clone(),
                    value,
                    weight: value / total,
                }
            })
            .collect()
    }
}

//! A held share position.

use crate::domain::error::DashboardError;
use crate::domain::input::Symbol;

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioEntry {
    symbol: Symbol,
    shares: u64,
    unit_price: f64,
}

impl PortfolioEntry {
    pub fn new(symbol: Symbol, shares: u64, unit_price: f64) -> Result<Self, DashboardError> {
        if shares == 0 {
            return Err(DashboardError::invalid_input(
                "number of shares must be greater than zero",
            ));
        }
        validate_unit_price(unit_price)?;
        Ok(Self {
            symbol,
            shares,
            unit_price,
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn shares(&self) -> u64 {
        self.shares
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn market_value(&self) -> f64 {
        self.shares as f64 * self.unit_price
    }

    /// Adds shares and replaces the unit price with the latest one.
    pub(crate) fn accumulate(&mut self, shares: u64, unit_price: f64) -> Result<(), DashboardError> {
        let total = self.shares.checked_add(shares).ok_or_else(|| {
            DashboardError::invalid_input(format!("share count for {} overflows", self.symbol))
        })?;
        self.shares = total;
        self.unit_price = unit_price;
        Ok(())
    }

    pub(crate) fn reduce(&mut self, shares: u64) -> Result<u64, DashboardError> {
        if shares > self.shares {
            return Err(DashboardError::InsufficientShares {
                symbol: self.symbol.to_string(),
                held: self.shares,
                requested: shares,
            });
        }
        self.shares -= shares;
        Ok(self.shares)
    }
}

pub fn validate_unit_price(unit_price: f64) -> Result<(), DashboardError> {
    if !unit_price.is_finite() || unit_price <= 0.0 {
        return Err(DashboardError::invalid_input(format!(
            "unit price {} must be a positive number",
            unit_price
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::input::parse_symbol;

    fn tcs() -> Symbol {
        parse_symbol("TCS").unwrap()
    }

    #[test]
    fn new_entry() {
        let entry = PortfolioEntry::new(tcs(), 10, 100.0).unwrap();
        assert_eq!(entry.symbol().as_str(), "TCS");
        assert_eq!(entry.shares(), 10);
        assert!((entry.unit_price() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_shares_rejected() {
        assert!(PortfolioEntry::new(tcs(), 0, 100.0).is_err());
    }

    #[test]
    fn bad_prices_rejected() {
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(PortfolioEntry::new(tcs(), 1, price).is_err(), "{price}");
        }
    }

    #[test]
    fn market_value() {
        let entry = PortfolioEntry::new(tcs(), 15, 110.0).unwrap();
        assert!((entry.market_value() - 1650.0).abs() < f64::EPSILON);
    }

    #[test]
    fn accumulate_overwrites_price() {
        let mut entry = PortfolioEntry::new(tcs(), 10, 100.0).unwrap();
        entry.accumulate(5, 110.0).unwrap();
        assert_eq!(entry.shares(), 15);
        assert!((entry.unit_price() - 110.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reduce_more_than_held_leaves_entry_unchanged() {
        let mut entry = PortfolioEntry::new(tcs(), 15, 110.0).unwrap();
        let err = entry.reduce(999).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InsufficientShares {
                held: 15,
                requested: 999,
                ..
            }
        ));
        assert_eq!(entry.shares(), 15);
    }

    #[test]
    fn reduce_to_zero() {
        let mut entry = PortfolioEntry::new(tcs(), 15, 110.0).unwrap();
        assert_eq!(entry.reduce(15).unwrap(), 0);
    }
}

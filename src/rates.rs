//! Interest rate math and money formatting

use serde::{Deserialize, Serialize};

/// A yearly interest rate in percent (e.g. `1.5` for 1.5 %/a).
///
/// Monthly accrual uses the nominal rate divided by twelve, which is how
/// banks quote the products modeled here; no compounding conversion is done.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestRate {
    rate_per_year: f64,
}

impl InterestRate {
    /// Create a rate from a yearly percentage
    pub fn new(rate_per_year: f64) -> Self {
        Self { rate_per_year }
    }

    /// Interest earned by `balance` over one month
    pub fn per_month(&self, balance: f64) -> f64 {
        balance * (self.rate_per_year / 100.0 / 12.0)
    }

    /// The yearly rate in percent
    pub fn rate_per_year(&self) -> f64 {
        self.rate_per_year
    }
}

/// Format a value as an amount of money, i.e. with two decimals.
///
/// Presentation-boundary helper only; the simulation itself never rounds.
pub fn money(value: f64) -> String {
    format!("{value:.2}")
}

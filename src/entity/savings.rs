//! Interest-bearing savings account

use crate::rates::{money, InterestRate};
use crate::recorder::TimeSeriesRecorder;

/// An account holding a balance that earns monthly interest.
///
/// Besides deposits and deductions routed through transactions, a recurring
/// monthly `payment` can be set which is added as part of the account's own
/// tick (and therefore earns interest from the month it arrives, unlike a
/// transaction deposit).
#[derive(Debug, Clone)]
pub struct Savings {
    name: String,
    value: f64,
    interests: InterestRate,
    accumulated_interests: f64,
    payment: f64,
    min_value: f64,
}

impl Savings {
    pub fn new(name: impl Into<String>, start_value: f64, interest_rate: f64) -> Self {
        Self {
            name: name.into(),
            value: start_value,
            interests: InterestRate::new(interest_rate),
            accumulated_interests: 0.0,
            payment: 0.0,
            min_value: start_value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current balance
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Total interest earned so far
    pub fn accumulated_interests(&self) -> f64 {
        self.accumulated_interests
    }

    /// Lowest balance seen after any tick
    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    /// Set the recurring monthly addition
    pub fn set_payment(&mut self, payment: f64) {
        self.payment = payment;
    }

    pub fn next_month(&mut self) {
        let interests = self.interests.per_month(self.value);
        self.accumulated_interests += interests;
        self.value += self.payment + interests;

        if self.value < self.min_value {
            self.min_value = self.value;
        }
    }

    pub fn deposit(&mut self, amount: f64) {
        self.value += amount;
    }

    pub fn deduct(&mut self, amount: f64) {
        self.value -= amount;
    }

    pub fn record_state(&self, recorder: &mut TimeSeriesRecorder) {
        recorder.add(&self.name, self.value);
    }

    pub fn get_summary(&self) -> String {
        format!(
            "Interests: {}\nMin Value: {}",
            money(self.accumulated_interests),
            money(self.min_value)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interest_accrual() {
        let mut savings = Savings::new("s", 1200.0, 1.0);
        savings.next_month();

        // 1 %/a on 1200 is exactly 1 per month
        assert_relative_eq!(savings.value(), 1201.0);
        assert_relative_eq!(savings.accumulated_interests(), 1.0);
    }

    #[test]
    fn test_payment_added_each_month() {
        let mut savings = Savings::new("s", 0.0, 0.0);
        savings.set_payment(100.0);

        savings.next_month();
        savings.next_month();
        assert_relative_eq!(savings.value(), 200.0);
    }

    #[test]
    fn test_min_value_tracks_low_water_mark() {
        let mut savings = Savings::new("s", 500.0, 0.0);
        savings.deduct(400.0);
        savings.next_month();
        savings.deposit(1000.0);
        savings.next_month();

        assert_relative_eq!(savings.min_value(), 100.0);
        assert_relative_eq!(savings.value(), 1100.0);
    }

    #[test]
    fn test_summary() {
        let mut savings = Savings::new("s", 1200.0, 1.0);
        savings.next_month();
        assert_eq!(savings.get_summary(), "Interests: 1.00\nMin Value: 1200.00");
    }
}

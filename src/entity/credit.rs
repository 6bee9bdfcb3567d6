//! Annuity loan with monthly interest and fixed repayments

use serde::{Deserialize, Serialize};

use crate::rates::{money, InterestRate};
use crate::recorder::TimeSeriesRecorder;

/// Lifecycle of a loan. Transitions are one-directional:
/// `Initial -> Credit -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditPhase {
    /// Money not retrieved from the bank yet
    Initial,
    /// Money retrieved, interest applies, paying back monthly
    Credit,
    /// Everything paid back
    Done,
}

/// An annuity loan: the bank grants a principal which is paid back with a
/// fixed monthly repayment while monthly interest accrues on the remaining
/// debt.
///
/// The outstanding debt is held as a positive number, so `deposit` means
/// repayment and reduces it. A repayment that clears the debt completes the
/// loan immediately; once done, further ticks are no-ops with the balance
/// pinned at zero.
///
/// Fixed costs (e.g. a land register entry) are expected to be folded into
/// the effective yearly interest rate quoted by the bank.
pub struct Credit {
    name: String,
    principal: f64,
    interests: InterestRate,
    payment: f64,
    value: f64,
    accumulated_interests: f64,
    last_interests: f64,
    phase: CreditPhase,
}

impl Credit {
    pub fn new(name: impl Into<String>, principal: f64, interest_rate: f64, payment: f64) -> Self {
        Self {
            name: name.into(),
            principal,
            interests: InterestRate::new(interest_rate),
            payment,
            value: 0.0,
            accumulated_interests: 0.0,
            last_interests: 0.0,
            phase: CreditPhase::Initial,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outstanding debt (positive while the loan is open)
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn phase(&self) -> CreditPhase {
        self.phase
    }

    /// Interest charged in the most recent month
    pub fn last_interests(&self) -> f64 {
        self.last_interests
    }

    /// Total cost of the loan so far: all interest paid to the bank
    pub fn get_cost(&self) -> f64 {
        self.accumulated_interests
    }

    /// The contractual monthly repayment while the loan is open, 0 otherwise
    pub fn current_payment(&self) -> f64 {
        match self.phase {
            CreditPhase::Credit => self.payment,
            CreditPhase::Initial | CreditPhase::Done => 0.0,
        }
    }

    pub fn next_month(&mut self) {
        match self.phase {
            CreditPhase::Initial => {
                // First tick: the principal is retrieved from the bank and
                // starts accruing interest right away.
                self.phase = CreditPhase::Credit;
                self.value = self.principal;
                self.accrue();
            }
            CreditPhase::Credit => self.accrue(),
            CreditPhase::Done => {
                self.value = 0.0;
                self.last_interests = 0.0;
            }
        }
    }

    fn accrue(&mut self) {
        self.last_interests = self.interests.per_month(self.value);
        self.accumulated_interests += self.last_interests;
        self.value += self.last_interests;

        if self.value <= 0.0 {
            self.complete();
        }
    }

    /// Repay debt. Completes the loan as soon as the debt is cleared, so an
    /// overpaying final installment never accrues interest on a negative
    /// balance.
    pub fn deposit(&mut self, amount: f64) {
        self.value -= amount;

        if self.phase == CreditPhase::Credit && self.value <= 0.0 {
            self.complete();
        }
    }

    fn complete(&mut self) {
        self.phase = CreditPhase::Done;
        self.value = 0.0;
        log::info!("loan {} fully repaid", self.name);
    }

    pub fn record_state(&self, recorder: &mut TimeSeriesRecorder) {
        recorder.add(&self.name, self.value);
        recorder.add(&format!("{}.interests", self.name), self.last_interests);
    }

    pub fn get_description(&self) -> String {
        format!(
            "Credit: {}\nInterest rate: {} %/a\nPayment: {}",
            money(self.principal),
            self.interests.rate_per_year(),
            money(self.payment)
        )
    }

    pub fn get_summary(&self) -> String {
        format!("Cost: {}", money(self.get_cost()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_tick_retrieves_principal_and_accrues() {
        let mut credit = Credit::new("loan", 2000.0, 1.0, 1000.0);
        assert_eq!(credit.phase(), CreditPhase::Initial);
        assert_relative_eq!(credit.current_payment(), 0.0);

        credit.next_month();
        assert_eq!(credit.phase(), CreditPhase::Credit);
        assert_relative_eq!(credit.value(), 2000.0 * (1.0 + 0.01 / 12.0));
        assert_relative_eq!(credit.current_payment(), 1000.0);
    }

    #[test]
    fn test_amortization_to_completion() {
        let mut credit = Credit::new("loan", 2000.0, 1.0, 1000.0);
        let monthly = 0.01 / 12.0;

        // Three months of tick-then-repay, as driven by the scheduler where
        // the loan's account tick precedes its rate transaction.
        let mut expected_cost = 0.0;
        let mut balance = 2000.0;
        for _ in 0..3 {
            credit.next_month();
            expected_cost += balance * monthly;
            balance = balance * (1.0 + monthly) - 1000.0;
            credit.deposit(1000.0);
        }

        assert_eq!(credit.phase(), CreditPhase::Done);
        assert_relative_eq!(credit.value(), 0.0);
        assert_relative_eq!(credit.get_cost(), expected_cost);
    }

    #[test]
    fn test_done_is_idempotent() {
        let mut credit = Credit::new("loan", 100.0, 1.0, 200.0);
        credit.next_month();
        credit.deposit(200.0);
        assert_eq!(credit.phase(), CreditPhase::Done);

        let cost = credit.get_cost();
        for _ in 0..24 {
            credit.next_month();
        }

        assert_eq!(credit.phase(), CreditPhase::Done);
        assert_relative_eq!(credit.value(), 0.0);
        assert_relative_eq!(credit.last_interests(), 0.0);
        assert_relative_eq!(credit.get_cost(), cost);
    }

    #[test]
    fn test_deposit_before_first_tick_does_not_complete() {
        let mut credit = Credit::new("loan", 1000.0, 1.0, 100.0);
        credit.deposit(50.0);
        assert_eq!(credit.phase(), CreditPhase::Initial);

        // The first tick still retrieves the full principal.
        credit.next_month();
        assert_relative_eq!(credit.value(), 1000.0 * (1.0 + 0.01 / 12.0));
    }
}

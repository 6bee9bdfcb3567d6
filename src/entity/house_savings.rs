//! Two-phase saving-then-credit housing product

use serde::{Deserialize, Serialize};

use crate::rates::{money, InterestRate};
use crate::recorder::TimeSeriesRecorder;

/// Lifecycle of a house savings contract. Transitions are one-directional:
/// `Initial -> Saving -> Credit -> Done`, with [`HouseSavings::stop`]
/// allowed to skip ahead from `Initial`/`Saving` to `Credit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HousePhase {
    Initial,
    /// Monthly payments build up savings which earn interest
    Saving,
    /// The credit part is paid out; payments now repay it
    Credit,
    /// Everything paid back
    Done,
}

/// A house savings contract: a saving phase where monthly payments (after a
/// one-time entry fee is amortized out of them) build up an interest-earning
/// pool, followed by a credit phase where the bank pays out the remainder of
/// the contractual total sum as a loan repaid with the same monthly payment.
///
/// The saving phase ends when the saved amount reaches the agreed own-funds
/// share (`own_vs_credit` percent) of the total sum, or earlier when the
/// contract is stopped explicitly.
pub struct HouseSavings {
    name: String,
    total_sum: f64,
    payment: f64,
    own_vs_credit: f64,
    own_interests: InterestRate,
    credit_interests: InterestRate,
    fee_to_pay: f64,
    remaining_fee: f64,
    saved: f64,
    credit: f64,
    accumulated_saving_interests: f64,
    accumulated_credit_interests: f64,
    phase: HousePhase,
    value: f64,
}

impl HouseSavings {
    pub fn new(
        name: impl Into<String>,
        total_sum: f64,
        payment: f64,
        initial_fee_rate: f64,
        own_interest_rate: f64,
        own_vs_credit: f64,
        credit_interest_rate: f64,
    ) -> Self {
        let fee_to_pay = initial_fee_rate / 100.0 * total_sum;

        Self {
            name: name.into(),
            total_sum,
            payment,
            own_vs_credit,
            own_interests: InterestRate::new(own_interest_rate),
            credit_interests: InterestRate::new(credit_interest_rate),
            fee_to_pay,
            remaining_fee: fee_to_pay,
            saved: 0.0,
            credit: 0.0,
            accumulated_saving_interests: 0.0,
            accumulated_credit_interests: 0.0,
            phase: HousePhase::Initial,
            value: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current balance: the saved amount while saving, the outstanding
    /// credit while repaying, 0 when done
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn phase(&self) -> HousePhase {
        self.phase
    }

    pub fn saved(&self) -> f64 {
        self.saved
    }

    /// Outstanding credit once the credit phase has started
    pub fn credit(&self) -> f64 {
        self.credit
    }

    pub fn total_sum(&self) -> f64 {
        self.total_sum
    }

    /// Lifetime cost: entry fee plus credit interest, minus interest earned
    /// while saving
    pub fn get_cost(&self) -> f64 {
        self.fee_to_pay + self.accumulated_credit_interests - self.accumulated_saving_interests
    }

    pub fn next_month(&mut self) {
        match self.phase {
            HousePhase::Initial => {
                self.phase = HousePhase::Saving;
                self.save_month();
            }
            HousePhase::Saving => self.save_month(),
            HousePhase::Credit => self.repay_month(),
            HousePhase::Done => self.value = 0.0,
        }
    }

    fn save_month(&mut self) {
        // The entry fee is paid off first; whatever remains of it caps how
        // much of this month's payment reaches the savings pool.
        let mut saving = self.payment;
        if self.remaining_fee > 0.0 {
            if self.payment < self.remaining_fee {
                self.remaining_fee -= self.payment;
                saving = 0.0;
            } else {
                saving -= self.remaining_fee;
                self.remaining_fee = 0.0;
            }
        }

        let interests = self.own_interests.per_month(self.saved);
        self.accumulated_saving_interests += interests;
        self.saved += saving + interests;
        self.value = self.saved;

        if self.saved >= self.own_vs_credit / 100.0 * self.total_sum {
            self.phase = HousePhase::Credit;
            self.credit = (1.0 - self.own_vs_credit / 100.0) * self.total_sum;
            log::info!("house savings {} ready for credit phase", self.name);
        }
    }

    fn repay_month(&mut self) {
        let interests = self.credit_interests.per_month(self.credit);
        self.accumulated_credit_interests += interests;
        self.credit = self.credit - self.payment + interests;
        self.value = self.credit;

        if self.credit <= 0.0 {
            self.phase = HousePhase::Done;
            self.credit = 0.0;
            self.value = 0.0;
            log::info!("house savings {} fully repaid", self.name);
        }
    }

    /// Force the saving phase to end and the credit phase to begin.
    ///
    /// If the entry fee has not been fully paid yet, the remaining fee debt
    /// becomes the new credit principal and the savings target is dropped.
    /// Otherwise the principal is `total_sum - saved` when `use_total`, or
    /// extrapolated from the own/credit ratio applied to the amount already
    /// saved. No-op once the credit phase has been reached.
    pub fn stop(&mut self, use_total: bool) {
        match self.phase {
            HousePhase::Initial | HousePhase::Saving => {
                if self.remaining_fee > 0.0 {
                    self.credit = self.remaining_fee;
                    self.saved = 0.0;
                    self.total_sum = 0.0;
                } else if use_total {
                    self.credit = self.total_sum - self.saved;
                } else {
                    let own_share = self.own_vs_credit / 100.0;
                    self.credit = self.saved * (1.0 - own_share) / own_share;
                    self.total_sum = self.saved + self.credit;
                }

                self.phase = HousePhase::Credit;
                self.value = self.credit;
                log::info!("house savings {} stopped, credit phase starts", self.name);
            }
            HousePhase::Credit | HousePhase::Done => {}
        }
    }

    pub fn record_state(&self, recorder: &mut TimeSeriesRecorder) {
        recorder.add(&self.name, self.value);
    }

    pub fn get_description(&self) -> String {
        format!(
            "Total sum: {}\nSavings interest rate: {} %/a\nCredit interest rate: {} %/a\nPayment: {}",
            money(self.total_sum),
            self.own_interests.rate_per_year(),
            self.credit_interests.rate_per_year(),
            money(self.payment)
        )
    }

    pub fn get_summary(&self) -> String {
        format!(
            "Saving interests: {}\nCredit interests: {}\nCost: {}",
            money(self.accumulated_saving_interests),
            money(self.accumulated_credit_interests),
            money(self.get_cost())
        )
    }
}

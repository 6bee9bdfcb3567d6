//! Recurring monthly transactions between entities

use thiserror::Error;

use super::{Arena, Endpoint};
use crate::recorder::TimeSeriesRecorder;
use crate::timeline::At;

/// Invalid construction arguments for a [`RegularTransaction`]
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("transaction `{0}` needs at least one point in its amount sequence")]
    EmptySequence(String),

    #[error("transaction `{0}` has an amount sequence point without a value")]
    MissingSequenceValue(String),
}

/// How a transaction determines its monthly amount.
///
/// `Sequence` points must be sorted by ascending time; this is an unchecked
/// caller precondition, resolution is undefined for unsorted input.
pub enum AmountSource {
    /// The same amount every month
    Fixed(f64),
    /// The payload of the latest point in time that has already passed;
    /// unresolved before the first point is reached
    Sequence(Vec<At>),
    /// Computed fresh each tick from the current state of the arena
    Callback(Box<dyn Fn(&Arena) -> f64>),
}

impl std::fmt::Debug for AmountSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmountSource::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            AmountSource::Sequence(ats) => f.debug_tuple("Sequence").field(ats).finish(),
            AmountSource::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// A transaction that moves its amount from one entity to another every
/// month.
///
/// Either end can be [`Endpoint::Outside`]: money then appears from nowhere
/// or vanishes without a counterparty. While a sequence-valued amount is
/// still unresolved, no value moves and nothing is recorded.
pub struct RegularTransaction {
    name: String,
    from: Endpoint,
    to: Endpoint,
    amount: AmountSource,
    month_counter: u32,
    value: Option<f64>,
}

impl RegularTransaction {
    /// Create a transaction, validating its amount source
    pub fn new(
        name: impl Into<String>,
        from: Endpoint,
        to: Endpoint,
        amount: AmountSource,
    ) -> Result<Self, TransactionError> {
        let name = name.into();

        let value = match &amount {
            AmountSource::Fixed(v) => Some(*v),
            AmountSource::Sequence(ats) => {
                if ats.is_empty() {
                    return Err(TransactionError::EmptySequence(name));
                }
                if ats.iter().any(|at| at.value().is_none()) {
                    return Err(TransactionError::MissingSequenceValue(name));
                }
                None
            }
            AmountSource::Callback(_) => None,
        };

        Ok(Self {
            name,
            from,
            to,
            amount,
            month_counter: 0,
            value,
        })
    }

    /// A transaction with a fixed monthly amount
    pub fn fixed(name: impl Into<String>, from: Endpoint, to: Endpoint, amount: f64) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            amount: AmountSource::Fixed(amount),
            month_counter: 0,
            value: Some(amount),
        }
    }

    /// A transaction whose amount follows a sorted ascending sequence of
    /// payload-carrying points in time
    pub fn sequence(
        name: impl Into<String>,
        from: Endpoint,
        to: Endpoint,
        ats: Vec<At>,
    ) -> Result<Self, TransactionError> {
        Self::new(name, from, to, AmountSource::Sequence(ats))
    }

    /// A transaction whose amount is computed fresh each tick
    pub fn callback(
        name: impl Into<String>,
        from: Endpoint,
        to: Endpoint,
        amount: impl Fn(&Arena) -> f64 + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            amount: AmountSource::Callback(Box::new(amount)),
            month_counter: 0,
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The amount moved by the most recent tick, once resolved
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn next_month(&mut self, arena: &mut Arena) {
        self.value = match &self.amount {
            AmountSource::Fixed(v) => Some(*v),
            AmountSource::Sequence(ats) => ats
                .iter()
                .rev()
                .find(|at| at.passed(self.month_counter))
                .and_then(At::value)
                .or(self.value),
            AmountSource::Callback(callback) => Some(callback(arena)),
        };

        self.month_counter += 1;

        let Some(value) = self.value else {
            return;
        };

        if let Endpoint::Entity(id) = self.from {
            arena.deduct(id, value);
        }

        if let Endpoint::Entity(id) = self.to {
            arena.deposit(id, value);
        }
    }

    pub fn record_state(&self, recorder: &mut TimeSeriesRecorder) {
        if let Some(value) = self.value {
            recorder.add(&self.name, value);
        }
    }
}

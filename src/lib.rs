//! Capitalics - Household finance projection engine
//!
//! This library provides:
//! - A monthly simulation of interacting financial entities (accounts,
//!   recurring transactions, loans, saving-then-credit housing products)
//! - A scheduler that advances the whole entity network one month at a time
//!   in a fixed, deterministic order
//! - Time- and condition-gated wrappers for delayed or guarded behavior
//! - A time series recorder whose output maps directly onto charting input
//!
//! All money values are monthly net amounts; all interest rates are yearly
//! rates in percent.

pub mod entity;
pub mod rates;
pub mod recorder;
pub mod scheduler;
pub mod timeline;

// Re-export commonly used types
pub use entity::{Arena, Endpoint, Entity, EntityId};
pub use entity::credit::{Credit, CreditPhase};
pub use entity::gating::{SequenceAction, Timer, TimerAction, When, WhenAction};
pub use entity::house_savings::{HousePhase, HouseSavings};
pub use entity::savings::Savings;
pub use entity::transaction::{AmountSource, RegularTransaction, TransactionError};
pub use rates::{money, InterestRate};
pub use recorder::{Sample, TimeSeries, TimeSeriesRecorder};
pub use scheduler::Scheduler;
pub use timeline::At;

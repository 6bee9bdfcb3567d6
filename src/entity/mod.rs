//! Financial entities and the arena that holds them
//!
//! Every simulated object is an [`Entity`] living in an [`Arena`] and
//! addressed by a stable [`EntityId`]. Entities never own each other;
//! transactions and gating wrappers refer to other entities by handle, and
//! every entity lives for the whole simulation run.

pub mod credit;
pub mod gating;
pub mod house_savings;
pub mod savings;
pub mod transaction;

pub use credit::{Credit, CreditPhase};
pub use gating::{SequenceAction, Timer, TimerAction, When, WhenAction};
pub use house_savings::{HousePhase, HouseSavings};
pub use savings::Savings;
pub use transaction::{AmountSource, RegularTransaction, TransactionError};

use crate::recorder::TimeSeriesRecorder;

/// Stable handle to an entity in an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(usize);

impl EntityId {
    fn index(self) -> usize {
        self.0
    }
}

/// One end of a transaction.
///
/// `Outside` in the `from` slot means the money appears from nowhere; in the
/// `to` slot it means the money vanishes from the simulated system without a
/// counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Entity(EntityId),
    Outside,
}

/// A simulated financial object.
///
/// The shared capability contract: every entity can advance one month
/// (`next_month`), publish named values for the current tick
/// (`record_state`), and optionally produce a lifetime summary
/// (`get_summary`). Value pools additionally answer `deposit`/`deduct`.
pub enum Entity {
    Savings(Savings),
    Credit(Credit),
    HouseSavings(HouseSavings),
    Transaction(RegularTransaction),
    Timer(Timer),
    TimerAction(TimerAction),
    When(When),
    WhenAction(WhenAction),
    Sequence(SequenceAction),
}

impl Entity {
    /// Short kind tag for log messages
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Savings(_) => "savings",
            Entity::Credit(_) => "credit",
            Entity::HouseSavings(_) => "house savings",
            Entity::Transaction(_) => "transaction",
            Entity::Timer(_) => "timer",
            Entity::TimerAction(_) => "timer action",
            Entity::When(_) => "when",
            Entity::WhenAction(_) => "when action",
            Entity::Sequence(_) => "sequence action",
        }
    }

    /// Advance this entity by one month.
    ///
    /// May mutate other entities reachable by handle through `arena`.
    pub fn next_month(&mut self, arena: &mut Arena) {
        match self {
            Entity::Savings(s) => s.next_month(),
            Entity::Credit(c) => c.next_month(),
            Entity::HouseSavings(h) => h.next_month(),
            Entity::Transaction(t) => t.next_month(arena),
            Entity::Timer(t) => t.next_month(arena),
            Entity::TimerAction(t) => t.next_month(arena),
            Entity::When(w) => w.next_month(arena),
            Entity::WhenAction(w) => w.next_month(arena),
            Entity::Sequence(s) => s.next_month(arena),
        }
    }

    /// Publish zero or more named values for the current tick
    pub fn record_state(&self, arena: &Arena, recorder: &mut TimeSeriesRecorder) {
        match self {
            Entity::Savings(s) => s.record_state(recorder),
            Entity::Credit(c) => c.record_state(recorder),
            Entity::HouseSavings(h) => h.record_state(recorder),
            Entity::Transaction(t) => t.record_state(recorder),
            Entity::Timer(t) => t.record_state(arena, recorder),
            Entity::When(w) => w.record_state(arena, recorder),
            Entity::TimerAction(_) | Entity::WhenAction(_) | Entity::Sequence(_) => {}
        }
    }

    /// Human-readable lifetime summary, if the entity has one
    pub fn get_summary(&self, arena: &Arena) -> Option<String> {
        match self {
            Entity::Savings(s) => Some(s.get_summary()),
            Entity::Credit(c) => Some(c.get_summary()),
            Entity::HouseSavings(h) => Some(h.get_summary()),
            Entity::Timer(t) => t.get_summary(arena),
            Entity::When(w) => w.get_summary(arena),
            Entity::Transaction(_)
            | Entity::TimerAction(_)
            | Entity::WhenAction(_)
            | Entity::Sequence(_) => None,
        }
    }

    /// Add value to this entity's pool.
    ///
    /// For a loan, depositing means repaying debt. Entities that are not
    /// value pools ignore the transfer (caller wiring error, logged).
    pub fn deposit(&mut self, amount: f64) {
        match self {
            Entity::Savings(s) => s.deposit(amount),
            Entity::Credit(c) => c.deposit(amount),
            other => log::warn!("deposit of {amount} into {} ignored", other.kind()),
        }
    }

    /// Remove value from this entity's pool
    pub fn deduct(&mut self, amount: f64) {
        match self {
            Entity::Savings(s) => s.deduct(amount),
            other => log::warn!("deduction of {amount} from {} ignored", other.kind()),
        }
    }
}

impl From<Savings> for Entity {
    fn from(s: Savings) -> Self {
        Entity::Savings(s)
    }
}

impl From<Credit> for Entity {
    fn from(c: Credit) -> Self {
        Entity::Credit(c)
    }
}

impl From<HouseSavings> for Entity {
    fn from(h: HouseSavings) -> Self {
        Entity::HouseSavings(h)
    }
}

impl From<RegularTransaction> for Entity {
    fn from(t: RegularTransaction) -> Self {
        Entity::Transaction(t)
    }
}

impl From<Timer> for Entity {
    fn from(t: Timer) -> Self {
        Entity::Timer(t)
    }
}

impl From<TimerAction> for Entity {
    fn from(t: TimerAction) -> Self {
        Entity::TimerAction(t)
    }
}

impl From<When> for Entity {
    fn from(w: When) -> Self {
        Entity::When(w)
    }
}

impl From<WhenAction> for Entity {
    fn from(w: WhenAction) -> Self {
        Entity::WhenAction(w)
    }
}

impl From<SequenceAction> for Entity {
    fn from(s: SequenceAction) -> Self {
        Entity::Sequence(s)
    }
}

/// Arena holding every entity of one simulation.
///
/// While an entity is being ticked its slot is temporarily vacated so the
/// tick can mutate the rest of the arena; a reentrant tick of a vacated slot
/// is a logged no-op.
#[derive(Default)]
pub struct Arena {
    slots: Vec<Option<Entity>>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, returning its stable handle
    pub fn insert(&mut self, entity: impl Into<Entity>) -> EntityId {
        let id = EntityId(self.slots.len());
        self.slots.push(Some(entity.into()));
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Advance the entity behind `id` by one month
    pub fn tick(&mut self, id: EntityId) {
        let taken = self.slots.get_mut(id.index()).and_then(Option::take);
        match taken {
            Some(mut entity) => {
                entity.next_month(self);
                self.slots[id.index()] = Some(entity);
            }
            None => log::warn!("tick of vacant entity slot {id:?} skipped"),
        }
    }

    /// Let the entity behind `id` record its state for the current tick
    pub fn record(&self, id: EntityId, recorder: &mut TimeSeriesRecorder) {
        match self.get(id) {
            Some(entity) => entity.record_state(self, recorder),
            None => log::warn!("record of vacant entity slot {id:?} skipped"),
        }
    }

    /// Lifetime summary of the entity behind `id`, if any
    pub fn summary(&self, id: EntityId) -> Option<String> {
        self.get(id).and_then(|entity| entity.get_summary(self))
    }

    pub fn deposit(&mut self, id: EntityId, amount: f64) {
        match self.get_mut(id) {
            Some(entity) => entity.deposit(amount),
            None => log::warn!("deposit of {amount} into vacant entity slot {id:?} skipped"),
        }
    }

    pub fn deduct(&mut self, id: EntityId, amount: f64) {
        match self.get_mut(id) {
            Some(entity) => entity.deduct(amount),
            None => log::warn!("deduction of {amount} from vacant entity slot {id:?} skipped"),
        }
    }

    /// Wire a loan into the transaction network: a transaction from `from`
    /// to the loan whose monthly amount is the loan's contractual payment
    /// while the loan is in its credit phase, and 0 otherwise.
    pub fn credit_rate_transaction(&mut self, credit: EntityId, from: Endpoint) -> EntityId {
        let name = self
            .credit(credit)
            .map(|c| format!("{}.rate", c.name()))
            .unwrap_or_else(|| {
                log::warn!("rate transaction wired to entity {credit:?} which is not a loan");
                format!("entity-{}.rate", credit.index())
            });

        let amount = move |arena: &Arena| {
            arena
                .credit(credit)
                .map(|c| c.current_payment())
                .unwrap_or(0.0)
        };

        self.insert(RegularTransaction::callback(
            name,
            from,
            Endpoint::Entity(credit),
            amount,
        ))
    }

    pub fn savings(&self, id: EntityId) -> Option<&Savings> {
        match self.get(id) {
            Some(Entity::Savings(s)) => Some(s),
            _ => None,
        }
    }

    pub fn savings_mut(&mut self, id: EntityId) -> Option<&mut Savings> {
        match self.get_mut(id) {
            Some(Entity::Savings(s)) => Some(s),
            _ => None,
        }
    }

    pub fn credit(&self, id: EntityId) -> Option<&Credit> {
        match self.get(id) {
            Some(Entity::Credit(c)) => Some(c),
            _ => None,
        }
    }

    pub fn credit_mut(&mut self, id: EntityId) -> Option<&mut Credit> {
        match self.get_mut(id) {
            Some(Entity::Credit(c)) => Some(c),
            _ => None,
        }
    }

    pub fn house_savings(&self, id: EntityId) -> Option<&HouseSavings> {
        match self.get(id) {
            Some(Entity::HouseSavings(h)) => Some(h),
            _ => None,
        }
    }

    pub fn house_savings_mut(&mut self, id: EntityId) -> Option<&mut HouseSavings> {
        match self.get_mut(id) {
            Some(Entity::HouseSavings(h)) => Some(h),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_insert_and_typed_access() {
        let mut arena = Arena::new();
        let id = arena.insert(Savings::new("checking", 100.0, 0.0));

        assert!(arena.savings(id).is_some());
        assert!(arena.credit(id).is_none());
    }

    #[test]
    fn test_deposit_by_handle() {
        let mut arena = Arena::new();
        let id = arena.insert(Savings::new("checking", 100.0, 0.0));

        arena.deposit(id, 50.0);
        assert_relative_eq!(arena.savings(id).unwrap().value(), 150.0);

        arena.deduct(id, 30.0);
        assert_relative_eq!(arena.savings(id).unwrap().value(), 120.0);
    }

    #[test]
    fn test_credit_rate_transaction_follows_loan_phase() {
        let mut arena = Arena::new();
        let checking = arena.insert(Savings::new("checking", 5000.0, 0.0));
        let loan = arena.insert(Credit::new("loan", 1000.0, 0.0, 300.0));
        let rate = arena.credit_rate_transaction(loan, Endpoint::Entity(checking));

        // Before the loan's first tick it is still initial: nothing moves.
        arena.tick(rate);
        assert_relative_eq!(arena.savings(checking).unwrap().value(), 5000.0);

        // Once the loan is in its credit phase the payment flows.
        arena.tick(loan);
        arena.tick(rate);
        assert_relative_eq!(arena.savings(checking).unwrap().value(), 4700.0);
        assert_relative_eq!(arena.credit(loan).unwrap().value(), 700.0);
    }
}

//! Time- and condition-gated wrapper entities
//!
//! Wrappers are registered with the scheduler in place of the entity or
//! callback they guard; the wrapped entity itself stays unregistered so it
//! is only ever ticked through its wrapper.

use super::{Arena, EntityId};
use crate::recorder::TimeSeriesRecorder;
use crate::timeline::At;

/// A boolean predicate over the current state of the entity graph,
/// evaluated fresh every tick
pub type Condition = Box<dyn Fn(&Arena) -> bool>;

/// A side effect run against the entity graph
pub type Action = Box<dyn FnMut(&mut Arena)>;

/// Forwards the monthly tick to another entity only once a point in time
/// has passed, counted against the wrapper's own tick count.
///
/// State recording and summaries are forwarded unconditionally, so a
/// delayed entity still shows up in the output from the first month.
pub struct Timer {
    start: At,
    inner: EntityId,
    month_counter: u32,
}

impl Timer {
    pub fn new(years: u32, months: u32, inner: EntityId) -> Self {
        Self {
            start: At::new(years, months),
            inner,
            month_counter: 0,
        }
    }

    pub fn next_month(&mut self, arena: &mut Arena) {
        if self.start.passed(self.month_counter) {
            arena.tick(self.inner);
        }

        self.month_counter += 1;
    }

    pub fn record_state(&self, arena: &Arena, recorder: &mut TimeSeriesRecorder) {
        arena.record(self.inner, recorder);
    }

    pub fn get_summary(&self, arena: &Arena) -> Option<String> {
        arena.summary(self.inner)
    }
}

/// Runs a callback once a point in time has passed; with `once`, never
/// again after the first firing.
pub struct TimerAction {
    start: At,
    action: Action,
    month_counter: u32,
    once: bool,
    happened: bool,
}

impl TimerAction {
    pub fn new(years: u32, months: u32, action: impl FnMut(&mut Arena) + 'static, once: bool) -> Self {
        Self {
            start: At::new(years, months),
            action: Box::new(action),
            month_counter: 0,
            once,
            happened: false,
        }
    }

    pub fn next_month(&mut self, arena: &mut Arena) {
        if self.once && self.happened {
            return;
        }

        if self.start.passed(self.month_counter) {
            self.happened = true;
            (self.action)(arena);
        }

        self.month_counter += 1;
    }
}

/// Forwards the monthly tick to another entity only while a condition
/// holds; recording and summaries are forwarded unconditionally.
pub struct When {
    condition: Condition,
    inner: EntityId,
}

impl When {
    pub fn new(condition: impl Fn(&Arena) -> bool + 'static, inner: EntityId) -> Self {
        Self {
            condition: Box::new(condition),
            inner,
        }
    }

    pub fn next_month(&mut self, arena: &mut Arena) {
        if (self.condition)(arena) {
            arena.tick(self.inner);
        }
    }

    pub fn record_state(&self, arena: &Arena, recorder: &mut TimeSeriesRecorder) {
        arena.record(self.inner, recorder);
    }

    pub fn get_summary(&self, arena: &Arena) -> Option<String> {
        arena.summary(self.inner)
    }
}

/// Runs a callback whenever a condition holds; with `once`, never again
/// after the first firing.
pub struct WhenAction {
    condition: Condition,
    action: Action,
    once: bool,
    happened: bool,
}

impl WhenAction {
    pub fn new(
        condition: impl Fn(&Arena) -> bool + 'static,
        action: impl FnMut(&mut Arena) + 'static,
        once: bool,
    ) -> Self {
        Self {
            condition: Box::new(condition),
            action: Box::new(action),
            once,
            happened: false,
        }
    }

    pub fn next_month(&mut self, arena: &mut Arena) {
        if self.once && self.happened {
            return;
        }

        if (self.condition)(arena) {
            self.happened = true;
            (self.action)(arena);
        }
    }
}

/// Runs a callback every month with the latest point of a sequence that has
/// already passed; does nothing before the first point is reached.
///
/// The points must be sorted by ascending time (unchecked precondition,
/// mirroring sequence-valued transaction amounts).
pub struct SequenceAction {
    ats: Vec<At>,
    action: Box<dyn FnMut(&mut Arena, &At)>,
    month_counter: u32,
}

impl SequenceAction {
    pub fn new(ats: Vec<At>, action: impl FnMut(&mut Arena, &At) + 'static) -> Self {
        Self {
            ats,
            action: Box::new(action),
            month_counter: 0,
        }
    }

    pub fn next_month(&mut self, arena: &mut Arena) {
        if let Some(at) = self
            .ats
            .iter()
            .rev()
            .find(|at| at.passed(self.month_counter))
        {
            (self.action)(arena, at);
        }

        self.month_counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Savings;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_timer_delays_inner_ticks() {
        let mut arena = Arena::new();
        let savings = arena.insert(Savings::new("s", 1200.0, 1.0));
        let timer = arena.insert(Timer::new(0, 2, savings));

        // First two ticks are gated, the third reaches the account.
        arena.tick(timer);
        arena.tick(timer);
        assert_relative_eq!(arena.savings(savings).unwrap().value(), 1200.0);

        arena.tick(timer);
        assert_relative_eq!(arena.savings(savings).unwrap().value(), 1201.0);
    }

    #[test]
    fn test_timer_forwards_summary_and_recording() {
        let mut arena = Arena::new();
        let savings = arena.insert(Savings::new("s", 100.0, 0.0));
        let timer = arena.insert(Timer::new(5, 0, savings));

        assert_eq!(arena.summary(timer), arena.summary(savings));

        let mut recorder = TimeSeriesRecorder::new();
        recorder.set_date(chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        arena.record(timer, &mut recorder);
        assert_eq!(recorder.series()["s"][0].value, 100.0);
    }

    #[test]
    fn test_timer_action_once() {
        let mut arena = Arena::new();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);

        let action = arena.insert(TimerAction::new(
            0,
            1,
            move |_| counter.set(counter.get() + 1),
            true,
        ));

        for _ in 0..5 {
            arena.tick(action);
        }

        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_timer_action_repeating() {
        let mut arena = Arena::new();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);

        let action = arena.insert(TimerAction::new(
            0,
            2,
            move |_| counter.set(counter.get() + 1),
            false,
        ));

        for _ in 0..5 {
            arena.tick(action);
        }

        // Fires on ticks 3, 4 and 5.
        assert_eq!(fired.get(), 3);
    }

    #[test]
    fn test_when_gates_on_condition() {
        let mut arena = Arena::new();
        let trigger = arena.insert(Savings::new("trigger", 0.0, 0.0));
        let savings = arena.insert(Savings::new("s", 0.0, 0.0));
        arena.savings_mut(savings).unwrap().set_payment(10.0);

        let when = arena.insert(When::new(
            move |arena: &Arena| arena.savings(trigger).map(|s| s.value() > 0.0).unwrap_or(false),
            savings,
        ));

        arena.tick(when);
        assert_relative_eq!(arena.savings(savings).unwrap().value(), 0.0);

        arena.deposit(trigger, 1.0);
        arena.tick(when);
        assert_relative_eq!(arena.savings(savings).unwrap().value(), 10.0);
    }

    #[test]
    fn test_when_forwards_summary() {
        // The gate must forward summaries even if it never opened.
        let mut arena = Arena::new();
        let savings = arena.insert(Savings::new("s", 100.0, 0.0));
        let when = arena.insert(When::new(|_| false, savings));

        arena.tick(when);
        assert_eq!(
            arena.summary(when).as_deref(),
            Some("Interests: 0.00\nMin Value: 100.00")
        );
    }

    #[test]
    fn test_when_action_fires_while_condition_holds() {
        let mut arena = Arena::new();
        let trigger = arena.insert(Savings::new("trigger", 0.0, 0.0));
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);

        let action = arena.insert(WhenAction::new(
            move |arena: &Arena| arena.savings(trigger).map(|s| s.value() > 0.0).unwrap_or(false),
            move |_| counter.set(counter.get() + 1),
            false,
        ));

        arena.tick(action);
        arena.deposit(trigger, 1.0);
        arena.tick(action);
        arena.tick(action);

        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_sequence_action_uses_latest_passed_point() {
        let mut arena = Arena::new();
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);

        let action = arena.insert(SequenceAction::new(
            vec![At::with_value(0, 1, 101.0), At::with_value(0, 2, 202.0)],
            move |_, at: &At| sink.set(at.value()),
        ));

        arena.tick(action);
        assert_eq!(seen.get(), None);

        arena.tick(action);
        assert_eq!(seen.get(), Some(101.0));

        arena.tick(action);
        assert_eq!(seen.get(), Some(202.0));
    }
}

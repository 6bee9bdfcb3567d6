//! Time series collection for simulation runs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single timestamped sample of a recorded series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub date: NaiveDate,
    pub value: f64,
}

/// Mapping from series name to its samples in tick order.
///
/// This shape is the compatibility contract with any charting or reporting
/// layer: one entry per recorded series, samples one calendar month apart.
pub type TimeSeries = BTreeMap<String, Vec<Sample>>;

/// Accumulator for the named time series produced by one simulation run.
///
/// The scheduler sets the current date once per tick, before any entity
/// records; entities then publish named values via [`add`](Self::add).
#[derive(Debug, Default)]
pub struct TimeSeriesRecorder {
    series: TimeSeries,
    date: Option<NaiveDate>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the date used for all samples recorded until the next tick
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    /// Append a sample to the named series at the current date
    pub fn add(&mut self, name: &str, value: f64) {
        let Some(date) = self.date else {
            log::warn!("sample for `{name}` dropped: recorder has no current date");
            return;
        };

        self.series
            .entry(name.to_string())
            .or_default()
            .push(Sample { date, value });
    }

    /// The accumulated series so far
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Consume the recorder, yielding the accumulated series
    pub fn into_series(self) -> TimeSeries {
        self.series
    }
}

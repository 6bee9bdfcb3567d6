//! Temporal points on the simulation timeline

use serde::{Deserialize, Serialize};

/// A point in time, expressed as an offset of years and months from the
/// start of the simulation.
///
/// An `At` can optionally carry a payload value. A sorted ascending sequence
/// of payload-carrying points encodes the development of a value over time,
/// e.g. `[At::with_value(0, 0, 2800.0), At::with_value(3, 0, 3100.0)]` for a
/// salary raise after three years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct At {
    years: u32,
    months: u32,
    value: Option<f64>,
}

impl At {
    /// A point in time without a payload
    pub fn new(years: u32, months: u32) -> Self {
        Self {
            years,
            months,
            value: None,
        }
    }

    /// A point in time carrying a payload value
    pub fn with_value(years: u32, months: u32, value: f64) -> Self {
        Self {
            years,
            months,
            value: Some(value),
        }
    }

    /// Whether the month counter has reached this point in time
    pub fn passed(&self, month_counter: u32) -> bool {
        month_counter >= self.years * 12 + self.months
    }

    /// The payload value, if any
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_boundary() {
        let at = At::new(2, 3);

        // 2 years + 3 months = month counter 27
        assert!(!at.passed(26));
        assert!(at.passed(27));
        assert!(at.passed(28));
    }

    #[test]
    fn test_start_of_simulation_always_passed() {
        let at = At::new(0, 0);
        assert!(at.passed(0));
    }

    #[test]
    fn test_payload() {
        assert_eq!(At::new(1, 0).value(), None);
        assert_eq!(At::with_value(1, 0, 42.0).value(), Some(42.0));
    }
}

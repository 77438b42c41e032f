//! Sweep ranges and values
//!
//! A range is `start..=stop` in increments of `step`. Values are generated by
//! counting steps rather than accumulating them, then rounded to the decimal
//! precision of the inputs, so `0.1 + 0.2`-style noise never reaches a
//! dictionary or a log file name.

use crate::error::{Result, SweepError};
use serde::{Serialize, Serializer};
use std::fmt;

/// Upper bound on the number of runs in one sweep
pub const MAX_SWEEP_VALUES: usize = 10_000;

/// Highest decimal precision carried through to dictionaries
const MAX_DECIMALS: usize = 12;

/// Numeric type of a swept parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Real-valued
    Float,
    /// Integer-valued (cell counts)
    Integer,
}

/// One value of a sweep, formatted the way it is written to the case
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepValue {
    /// Real value with its display precision
    Float {
        /// Value
        value: f64,
        /// Digits after the decimal point
        decimals: usize,
    },
    /// Integer value
    Integer(i64),
}

impl SweepValue {
    /// Value as a float
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Float { value, .. } => value,
            Self::Integer(value) => value as f64,
        }
    }
}

impl fmt::Display for SweepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Float { value, decimals } => write!(f, "{:.*}", decimals, value),
            Self::Integer(value) => write!(f, "{}", value),
        }
    }
}

impl Serialize for SweepValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            Self::Float { value, .. } => serializer.serialize_f64(value),
            Self::Integer(value) => serializer.serialize_i64(value),
        }
    }
}

/// Inclusive numeric range with a fixed increment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRange {
    /// First value
    pub start: f64,
    /// Last value (inclusive)
    pub stop: f64,
    /// Increment
    pub step: f64,
}

impl SweepRange {
    /// Create a validated range
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
            return Err(SweepError::InvalidRange(format!(
                "bounds must be finite (start={}, stop={}, step={})",
                start, stop, step
            )));
        }
        if step <= 0.0 {
            return Err(SweepError::InvalidRange(format!(
                "step must be positive, got {}",
                step
            )));
        }
        if stop < start {
            return Err(SweepError::InvalidRange(format!(
                "stop ({}) is below start ({})",
                stop, start
            )));
        }
        let decimals = decimals_of(start).max(decimals_of(step));
        if decimals > MAX_DECIMALS {
            return Err(SweepError::InvalidRange(format!(
                "start and step need {} decimals, at most {} are supported",
                decimals, MAX_DECIMALS
            )));
        }

        let range = Self { start, stop, step };
        let count = range.len();
        if count > MAX_SWEEP_VALUES {
            return Err(SweepError::InvalidRange(format!(
                "{} values exceeds the limit of {}",
                count, MAX_SWEEP_VALUES
            )));
        }
        Ok(range)
    }

    /// Number of values; `stop` is included when it lies within half a step
    pub fn len(&self) -> usize {
        let ratio = (self.stop - self.start) / self.step;
        ((ratio + 0.5) - 1e-9).ceil().max(1.0) as usize
    }

    /// A validated range always holds at least `start`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Decimal precision implied by `start` and `step`
    pub fn decimals(&self) -> usize {
        decimals_of(self.start).max(decimals_of(self.step))
    }

    /// Generate the values for a parameter type
    pub fn values(&self, kind: ValueKind) -> Result<Vec<SweepValue>> {
        match kind {
            ValueKind::Integer => {
                for (name, v) in [("start", self.start), ("stop", self.stop), ("step", self.step)] {
                    if v.fract() != 0.0 {
                        return Err(SweepError::InvalidRange(format!(
                            "integer parameter needs an integral {}, got {}",
                            name, v
                        )));
                    }
                }
                let (start, step) = (self.start as i64, self.step as i64);
                Ok((0..self.len() as i64)
                    .map(|i| SweepValue::Integer(start + i * step))
                    .collect())
            }
            ValueKind::Float => {
                let decimals = self.decimals();
                let scale = 10f64.powi(decimals as i32);
                Ok((0..self.len())
                    .map(|i| {
                        let raw = self.start + i as f64 * self.step;
                        SweepValue::Float {
                            value: (raw * scale).round() / scale,
                            decimals,
                        }
                    })
                    .collect())
            }
        }
    }
}

/// Digits after the decimal point in the shortest representation of `x`
fn decimals_of(x: f64) -> usize {
    let repr = format!("{}", x);
    repr.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
}

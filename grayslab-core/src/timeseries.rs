//! Time-indexed series of model values.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub type FloatValue = f64;
pub type Time = f64;

/// A series of values sampled on a monotonically increasing time axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    time: Array1<Time>,
    values: Array1<FloatValue>,
}

impl Timeseries {
    /// Build a timeseries from matching value and time arrays
    ///
    /// Panics if the two arrays differ in length.
    pub(crate) fn from_values(values: Array1<FloatValue>, time: Array1<Time>) -> Self {
        assert_eq!(
            values.len(),
            time.len(),
            "values and time axis must have the same length"
        );
        Self { time, values }
    }

    pub fn empty() -> Self {
        Self::from_values(Array1::zeros(0), Array1::zeros(0))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn time_axis(&self) -> &Array1<Time> {
        &self.time
    }

    pub fn values(&self) -> &Array1<FloatValue> {
        &self.values
    }

    /// Value at the last time point
    pub fn latest_value(&self) -> Option<FloatValue> {
        self.values.last().copied()
    }

    /// Largest value in the series
    ///
    /// NaN values are skipped. Returns `None` if no comparable value exists.
    pub fn max(&self) -> Option<FloatValue> {
        self.values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }

    /// Iterate over `(time, value)` pairs in time order
    pub fn iter(&self) -> impl Iterator<Item = (Time, FloatValue)> + '_ {
        self.time.iter().copied().zip(self.values.iter().copied())
    }
}

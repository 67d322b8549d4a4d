//! Configuration types for the scheduling engine.

use chrono::{Local, NaiveDate};
use pyo3::prelude::*;

/// Configuration for a [`crate::Scheduler`].
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchedulerConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Date tasks without dependencies start on. `None` means the local date
    /// at the time of the computation.
    #[pyo3(get, set)]
    pub today: Option<NaiveDate>,
}

impl SchedulerConfig {
    /// The day schedules are anchored to, without a time-of-day component.
    pub fn resolve_today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[pymethods]
impl SchedulerConfig {
    #[new]
    #[pyo3(signature = (verbosity=None, today=None))]
    fn new(verbosity: Option<u8>, today: Option<NaiveDate>) -> Self {
        let defaults = Self::default();
        Self {
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            today,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SchedulerConfig(verbosity={}, today={:?})",
            self.verbosity, self.today
        )
    }
}

//! Core data types for the scheduling engine.

use chrono::NaiveDate;
use pyo3::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::graph::{decode_dependency_ids, encode_dependency_ids};

// Note: We use std HashMap here for PyO3 interface compatibility

/// Task identifier as exchanged with the storage layer.
pub type TaskId = i64;

/// A task in the caller's task list.
///
/// `earliest_start` and `is_on_critical_path` are derived fields: they are
/// only written by [`crate::Scheduler::recompute`].
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    #[pyo3(get, set)]
    pub id: TaskId,
    #[pyo3(get, set)]
    pub duration: u32,
    /// Stored dependency encoding, a JSON array of task ids.
    #[pyo3(get, set)]
    pub dependency_ids: Option<String>,
    #[pyo3(get, set)]
    pub due_date: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub earliest_start: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub is_on_critical_path: bool,
}

impl Task {
    /// Build a task with the given dependencies already encoded.
    pub fn with_dependencies(id: TaskId, duration: u32, dependencies: &[TaskId]) -> Self {
        let dependency_ids = if dependencies.is_empty() {
            None
        } else {
            Some(encode_dependency_ids(dependencies))
        };
        Self {
            id,
            duration,
            dependency_ids,
            due_date: None,
            earliest_start: None,
            is_on_critical_path: false,
        }
    }

    /// Decoded dependency ids. Malformed encodings decode to an empty list.
    pub fn dependencies(&self) -> Vec<TaskId> {
        decode_dependency_ids(self.dependency_ids.as_deref())
    }

    /// Replace the stored encoding with `dependencies`.
    pub fn set_dependencies(&mut self, dependencies: &[TaskId]) {
        self.dependency_ids = if dependencies.is_empty() {
            None
        } else {
            Some(encode_dependency_ids(dependencies))
        };
    }
}

/// Check a caller-supplied duration: positive and within `u32`.
fn checked_duration(id: TaskId, duration: i64) -> Result<u32, String> {
    if duration <= 0 {
        return Err(format!(
            "Task {} must have a positive duration, got {}",
            id, duration
        ));
    }
    u32::try_from(duration).map_err(|_| format!("Task {} duration {} is too large", id, duration))
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (id, duration=1, dependency_ids=None, due_date=None))]
    fn new(
        id: TaskId,
        duration: i64,
        dependency_ids: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> PyResult<Self> {
        let duration =
            checked_duration(id, duration).map_err(pyo3::exceptions::PyValueError::new_err)?;
        Ok(Self {
            id,
            duration,
            dependency_ids,
            due_date,
            earliest_start: None,
            is_on_critical_path: false,
        })
    }

    #[pyo3(name = "dependencies")]
    fn py_dependencies(&self) -> Vec<TaskId> {
        self.dependencies()
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={}, duration={}, deps={:?}, earliest_start={:?}, critical={})",
            self.id,
            self.duration,
            self.dependencies(),
            self.earliest_start,
            self.is_on_critical_path
        )
    }
}

/// Result of one full scheduling pass.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleResult {
    #[pyo3(get, set)]
    pub earliest_starts: HashMap<TaskId, NaiveDate>,
    #[pyo3(get, set)]
    pub critical_path: HashSet<TaskId>,
    /// Longest duration-weighted dependency chain, in days.
    #[pyo3(get, set)]
    pub critical_path_length: u64,
    /// Latest earliest-finish over all tasks.
    #[pyo3(get, set)]
    pub project_finish: Option<NaiveDate>,
}

#[pymethods]
impl ScheduleResult {
    fn __repr__(&self) -> String {
        format!(
            "ScheduleResult(tasks={}, critical={}, length={}, finish={:?})",
            self.earliest_starts.len(),
            self.critical_path.len(),
            self.critical_path_length,
            self.project_finish
        )
    }
}

//! Rust implementation of the task scheduling engine.
//!
//! Given a snapshot of tasks with durations and dependency edges, this crate
//! computes earliest start dates, marks the critical path and rejects
//! dependency edges that would create a cycle. It never stores tasks itself.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::prelude::*;
use std::collections::{HashMap, HashSet};

mod config;
pub mod critical_path;
pub mod cycle;
pub mod earliest_start;
pub mod edit;
pub mod graph;
pub mod logging;
mod models;
pub mod schedule;

pub use config::SchedulerConfig;
pub use critical_path::{compute_critical_path, critical_path_from_graph, CriticalPathResult};
pub use cycle::would_create_cycle;
pub use earliest_start::compute_earliest_starts;
pub use edit::{add_dependency, remove_dependency, remove_task, EditError};
pub use graph::{decode_dependency_ids, dependency_levels, encode_dependency_ids, TaskGraph};
pub use models::{ScheduleResult, Task, TaskId};
pub use schedule::Scheduler;

fn edit_error(err: EditError) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(err.to_string())
}

/// Check whether making `task_id` depend on `dependency_id` would create a cycle.
#[pyfunction]
#[pyo3(name = "would_create_cycle")]
fn py_would_create_cycle(task_id: TaskId, dependency_id: TaskId, tasks: Vec<Task>) -> bool {
    would_create_cycle(task_id, dependency_id, &tasks)
}

/// Compute the earliest start date of every task.
///
/// # Arguments
/// * `tasks` - Full current task list
/// * `today` - Date tasks without dependencies start on (defaults to the local date)
#[pyfunction]
#[pyo3(name = "compute_earliest_starts", signature = (tasks, today=None))]
fn py_compute_earliest_starts(
    tasks: Vec<Task>,
    today: Option<NaiveDate>,
) -> HashMap<TaskId, NaiveDate> {
    let config = SchedulerConfig {
        today,
        ..Default::default()
    };
    compute_earliest_starts(&tasks, config.resolve_today())
        .into_iter()
        .collect()
}

/// Compute the set of task IDs on the critical path.
#[pyfunction]
#[pyo3(name = "compute_critical_path")]
fn py_compute_critical_path(tasks: Vec<Task>) -> HashSet<TaskId> {
    compute_critical_path(&tasks).into_iter().collect()
}

/// Recompute every derived field and return the updated task list.
///
/// # Returns
/// * `(tasks, result)` - the tasks with `earliest_start` and
///   `is_on_critical_path` written back, and the full ScheduleResult
#[pyfunction]
#[pyo3(signature = (tasks, config=None))]
fn recompute_schedule(
    mut tasks: Vec<Task>,
    config: Option<SchedulerConfig>,
) -> (Vec<Task>, ScheduleResult) {
    let scheduler = Scheduler::new(config.unwrap_or_default());
    let result = scheduler.recompute(&mut tasks);
    (tasks, result)
}

/// Add a dependency edge and return the updated task list.
///
/// # Raises
/// * ValueError if either task is unknown, the edge exists, or it would create a cycle
#[pyfunction]
#[pyo3(name = "add_dependency", signature = (tasks, task_id, dependency_id, config=None))]
fn py_add_dependency(
    mut tasks: Vec<Task>,
    task_id: TaskId,
    dependency_id: TaskId,
    config: Option<SchedulerConfig>,
) -> PyResult<Vec<Task>> {
    Scheduler::new(config.unwrap_or_default())
        .add_dependency(&mut tasks, task_id, dependency_id)
        .map_err(edit_error)?;
    Ok(tasks)
}

/// Remove a dependency edge and return the updated task list.
///
/// # Raises
/// * ValueError if the task is unknown
#[pyfunction]
#[pyo3(name = "remove_dependency", signature = (tasks, task_id, dependency_id, config=None))]
fn py_remove_dependency(
    mut tasks: Vec<Task>,
    task_id: TaskId,
    dependency_id: TaskId,
    config: Option<SchedulerConfig>,
) -> PyResult<Vec<Task>> {
    Scheduler::new(config.unwrap_or_default())
        .remove_dependency(&mut tasks, task_id, dependency_id)
        .map_err(edit_error)?;
    Ok(tasks)
}

/// Remove a task and every reference to it, returning the remaining tasks.
#[pyfunction]
#[pyo3(name = "remove_task", signature = (tasks, task_id, config=None))]
fn py_remove_task(
    mut tasks: Vec<Task>,
    task_id: TaskId,
    config: Option<SchedulerConfig>,
) -> Vec<Task> {
    Scheduler::new(config.unwrap_or_default()).remove_task(&mut tasks, task_id);
    tasks
}

/// IDs of the task, its transitive dependencies and its transitive dependents.
#[pyfunction]
fn related_task_ids(tasks: Vec<Task>, task_id: TaskId) -> HashSet<TaskId> {
    TaskGraph::new(&tasks)
        .related_to(task_id)
        .into_iter()
        .collect()
}

/// Dependency depth of every task (0 = no dependencies).
#[pyfunction]
#[pyo3(name = "dependency_levels")]
fn py_dependency_levels(tasks: Vec<Task>) -> HashMap<TaskId, u32> {
    dependency_levels(&tasks).into_iter().collect()
}

#[pyfunction]
#[pyo3(name = "decode_dependency_ids", signature = (raw=None))]
fn py_decode_dependency_ids(raw: Option<String>) -> Vec<TaskId> {
    decode_dependency_ids(raw.as_deref())
}

#[pyfunction]
#[pyo3(name = "encode_dependency_ids")]
fn py_encode_dependency_ids(ids: Vec<TaskId>) -> String {
    encode_dependency_ids(&ids)
}

/// The tasksched.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Task>()?;
    m.add_class::<ScheduleResult>()?;

    // Config types
    m.add_class::<SchedulerConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_would_create_cycle, m)?)?;
    m.add_function(wrap_pyfunction!(py_compute_earliest_starts, m)?)?;
    m.add_function(wrap_pyfunction!(py_compute_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(recompute_schedule, m)?)?;

    // Graph edits and queries
    m.add_function(wrap_pyfunction!(py_add_dependency, m)?)?;
    m.add_function(wrap_pyfunction!(py_remove_dependency, m)?)?;
    m.add_function(wrap_pyfunction!(py_remove_task, m)?)?;
    m.add_function(wrap_pyfunction!(related_task_ids, m)?)?;
    m.add_function(wrap_pyfunction!(py_dependency_levels, m)?)?;
    m.add_function(wrap_pyfunction!(py_decode_dependency_ids, m)?)?;
    m.add_function(wrap_pyfunction!(py_encode_dependency_ids, m)?)?;

    Ok(())
}

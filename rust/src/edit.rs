//! Validated edits to the dependency graph.
//!
//! These guard the acyclicity invariant at mutation time. Callers re-run
//! [`crate::Scheduler::recompute`] over the whole collection after every
//! successful edit.

use thiserror::Error;

use crate::cycle::would_create_cycle;
use crate::models::{Task, TaskId};

/// Errors that can occur when editing dependencies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("Dependency not found: {0}")]
    DependencyNotFound(TaskId),
    #[error("Task {0} cannot depend on itself")]
    SelfDependency(TaskId),
    #[error("Task {task} already depends on {dependency}")]
    DuplicateDependency { task: TaskId, dependency: TaskId },
    #[error("Circular dependency: task {task} depending on {dependency} would create a cycle")]
    CircularDependency { task: TaskId, dependency: TaskId },
}

fn position(tasks: &[Task], id: TaskId) -> Option<usize> {
    tasks.iter().position(|t| t.id == id)
}

/// Make `task_id` depend on `dependency_id`.
///
/// The new edge is appended to the task's stored dependency list. A stored
/// list that does not decode is treated as empty and overwritten.
pub fn add_dependency(
    tasks: &mut [Task],
    task_id: TaskId,
    dependency_id: TaskId,
) -> Result<(), EditError> {
    let index = position(tasks, task_id).ok_or(EditError::TaskNotFound(task_id))?;
    if task_id == dependency_id {
        return Err(EditError::SelfDependency(task_id));
    }
    if position(tasks, dependency_id).is_none() {
        return Err(EditError::DependencyNotFound(dependency_id));
    }

    let mut deps = tasks[index].dependencies();
    if deps.contains(&dependency_id) {
        return Err(EditError::DuplicateDependency {
            task: task_id,
            dependency: dependency_id,
        });
    }
    if would_create_cycle(task_id, dependency_id, tasks) {
        return Err(EditError::CircularDependency {
            task: task_id,
            dependency: dependency_id,
        });
    }

    deps.push(dependency_id);
    tasks[index].set_dependencies(&deps);
    Ok(())
}

/// Drop the edge `task_id -> dependency_id`.
///
/// Returns whether the edge was present.
pub fn remove_dependency(
    tasks: &mut [Task],
    task_id: TaskId,
    dependency_id: TaskId,
) -> Result<bool, EditError> {
    let index = position(tasks, task_id).ok_or(EditError::TaskNotFound(task_id))?;
    let task = &mut tasks[index];

    let mut deps = task.dependencies();
    let before = deps.len();
    deps.retain(|&d| d != dependency_id);
    if deps.len() == before {
        return Ok(false);
    }
    task.set_dependencies(&deps);
    Ok(true)
}

/// Remove a task and strip it from every remaining task's dependencies.
pub fn remove_task(tasks: &mut Vec<Task>, task_id: TaskId) -> Option<Task> {
    let index = position(tasks, task_id)?;
    let removed = tasks.remove(index);

    for task in tasks.iter_mut() {
        let deps = task.dependencies();
        if deps.contains(&task_id) {
            let kept: Vec<TaskId> = deps.into_iter().filter(|&d| d != task_id).collect();
            task.set_dependencies(&kept);
        }
    }

    Some(removed)
}

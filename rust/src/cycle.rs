//! Cycle detection for proposed dependency edges.

use rustc_hash::FxHashSet;

use crate::graph::TaskGraph;
use crate::models::{Task, TaskId};

/// Would making `task_id` depend on `dependency_id` close a loop?
///
/// Walks the existing dependencies of `dependency_id` (and theirs,
/// transitively) looking for `task_id`. The proposed edge itself is never
/// added to any task; it is modelled by starting the walk at
/// `dependency_id`. Declared edges to ids missing from `tasks` are still
/// followed as far as that id: reaching `task_id` that way is a cycle, and
/// any other missing id is a dead end.
pub fn would_create_cycle(task_id: TaskId, dependency_id: TaskId, tasks: &[Task]) -> bool {
    would_create_cycle_in(&TaskGraph::new(tasks), task_id, dependency_id)
}

/// Same as [`would_create_cycle`] over an already built graph.
pub fn would_create_cycle_in(graph: &TaskGraph, task_id: TaskId, dependency_id: TaskId) -> bool {
    let mut visited: FxHashSet<TaskId> = FxHashSet::default();
    let mut stack = vec![dependency_id];

    while let Some(current) = stack.pop() {
        if current == task_id {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        // Reverse so dependencies are explored in declaration order
        stack.extend(graph.declared_dependencies_of(current).iter().rev().copied());
    }

    false
}

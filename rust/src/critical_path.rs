//! Critical path tracing.
//!
//! Two steps over the resolved graph:
//! 1. Path length: the longest duration-weighted chain of dependencies ending
//!    at each task, the task's own duration included
//! 2. Back-trace: from every task reaching the global maximum, follow the
//!    dependency with the longest path until a task without dependencies

use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::{forward_pass, ChainFold, TaskGraph};
use crate::models::{Task, TaskId};

/// Own duration plus the longest chain among dependencies.
struct PathLength;

impl ChainFold for PathLength {
    type Value = u64;

    fn base(&self) -> u64 {
        0
    }

    fn on_cycle(&self) -> u64 {
        0
    }

    fn edge(&self, _graph: &TaskGraph, _dep: TaskId, length: u64) -> u64 {
        length
    }

    fn finish(&self, graph: &TaskGraph, id: TaskId, longest_dep: u64) -> u64 {
        longest_dep.saturating_add(graph.duration_of(id))
    }
}

/// Result of critical path calculation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CriticalPathResult {
    /// Set of task IDs on the critical path.
    pub critical_path_tasks: FxHashSet<TaskId>,
    /// Global maximum path length (0 for an empty collection).
    pub critical_path_length: u64,
    /// Path length ending at each task.
    pub path_lengths: FxHashMap<TaskId, u64>,
}

/// Compute the set of tasks on the critical path.
///
/// Non-empty whenever `tasks` is non-empty. When several chains tie for the
/// longest length, the members of all of them are included.
pub fn compute_critical_path(tasks: &[Task]) -> FxHashSet<TaskId> {
    critical_path_from_graph(&TaskGraph::new(tasks)).critical_path_tasks
}

/// Full critical path calculation over an already built graph.
pub fn critical_path_from_graph(graph: &TaskGraph) -> CriticalPathResult {
    let path_lengths = forward_pass(graph, &PathLength);

    // End tasks: every task reaching the maximum, in input order
    let critical_path_length = graph
        .ids()
        .iter()
        .filter_map(|id| path_lengths.get(id).copied())
        .max()
        .unwrap_or(0);
    let end_tasks = graph
        .ids()
        .iter()
        .copied()
        .filter(|id| path_lengths.get(id) == Some(&critical_path_length));

    let mut critical_path_tasks = FxHashSet::default();
    for end_task in end_tasks {
        trace_back(graph, &path_lengths, end_task, &mut critical_path_tasks);
    }

    CriticalPathResult {
        critical_path_tasks,
        critical_path_length,
        path_lengths,
    }
}

/// Mark `start` and its longest dependency chain.
///
/// Stops early at a task that is already marked: its chain was traced
/// before (and a cyclic chain would otherwise never end).
fn trace_back(
    graph: &TaskGraph,
    path_lengths: &FxHashMap<TaskId, u64>,
    start: TaskId,
    marked: &mut FxHashSet<TaskId>,
) {
    let mut current = start;
    while marked.insert(current) {
        let deps = graph.dependencies_of(current);
        let Some(&first) = deps.first() else {
            break;
        };

        // Strictly longer replaces, so the first dependency wins ties
        let length_of = |id: &TaskId| path_lengths.get(id).copied().unwrap_or(0);
        let mut longest = first;
        let mut longest_length = length_of(&first);
        for dep in &deps[1..] {
            let length = length_of(dep);
            if length > longest_length {
                longest = *dep;
                longest_length = length;
            }
        }
        current = longest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: TaskId, duration: u32, deps: &[TaskId]) -> Task {
        Task::with_dependencies(id, duration, deps)
    }

    fn set(ids: &[TaskId]) -> FxHashSet<TaskId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_empty_collection() {
        let result = critical_path_from_graph(&TaskGraph::new(&[]));

        assert!(result.critical_path_tasks.is_empty());
        assert_eq!(result.critical_path_length, 0);
    }

    #[test]
    fn test_single_task() {
        let tasks = vec![make_task(1, 5, &[])];

        assert_eq!(compute_critical_path(&tasks), set(&[1]));
    }

    #[test]
    fn test_zero_durations_mark_every_task() {
        let tasks = vec![make_task(1, 0, &[]), make_task(2, 0, &[1]), make_task(3, 0, &[])];
        let result = critical_path_from_graph(&TaskGraph::new(&tasks));

        assert_eq!(result.critical_path_length, 0);
        assert_eq!(result.critical_path_tasks, set(&[1, 2, 3]));
    }

    #[test]
    fn test_fan_out_picks_longer_branch() {
        // A(2), B(3) after A, C(1) after A: A+B = 5 beats A+C = 3
        let tasks = vec![
            make_task(1, 2, &[]),
            make_task(2, 3, &[1]),
            make_task(3, 1, &[1]),
        ];
        let result = critical_path_from_graph(&TaskGraph::new(&tasks));

        assert_eq!(result.critical_path_tasks, set(&[1, 2]));
        assert_eq!(result.critical_path_length, 5);
        assert_eq!(result.path_lengths.get(&3), Some(&3));
    }

    #[test]
    fn test_diamond() {
        // Path via 2: 2 + 3 + 1 = 6; via 3: 2 + 5 + 1 = 8
        let tasks = vec![
            make_task(1, 2, &[]),
            make_task(2, 3, &[1]),
            make_task(3, 5, &[1]),
            make_task(4, 1, &[2, 3]),
        ];
        let result = critical_path_from_graph(&TaskGraph::new(&tasks));

        assert_eq!(result.critical_path_tasks, set(&[1, 3, 4]));
        assert_eq!(result.critical_path_length, 8);
    }

    #[test]
    fn test_tied_chains_all_retained() {
        // Two disjoint chains of length 4
        let tasks = vec![
            make_task(1, 1, &[]),
            make_task(2, 3, &[1]),
            make_task(3, 2, &[]),
            make_task(4, 2, &[3]),
            make_task(5, 1, &[]),
        ];

        assert_eq!(compute_critical_path(&tasks), set(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_members_reach_global_maximum_at_end_tasks() {
        let tasks = vec![
            make_task(1, 4, &[]),
            make_task(2, 1, &[1]),
            make_task(3, 2, &[1, 2]),
            make_task(4, 9, &[]),
            make_task(5, 3, &[3, 4]),
        ];
        let result = critical_path_from_graph(&TaskGraph::new(&tasks));

        assert_eq!(result.critical_path_length, 12);
        assert_eq!(result.critical_path_tasks, set(&[4, 5]));
        // Each member sits on a chain whose total equals the maximum
        let sum: u64 = result
            .critical_path_tasks
            .iter()
            .map(|id| u64::from(tasks.iter().find(|t| t.id == *id).unwrap().duration))
            .sum();
        assert_eq!(sum, result.critical_path_length);
    }

    #[test]
    fn test_dangling_dependency_not_marked() {
        let tasks = vec![make_task(1, 2, &[]), make_task(2, 3, &[404, 1])];
        let critical = compute_critical_path(&tasks);

        assert_eq!(critical, set(&[1, 2]));
        assert!(!critical.contains(&404));
    }

    #[test]
    fn test_only_dangling_dependencies_is_a_root() {
        let tasks = vec![make_task(1, 2, &[404]), make_task(2, 1, &[])];

        assert_eq!(compute_critical_path(&tasks), set(&[1]));
    }

    #[test]
    fn test_malformed_encoding_behaves_as_empty() {
        let mut broken = make_task(2, 1, &[]);
        broken.dependency_ids = Some("[1, two]".to_string());
        let tasks = vec![make_task(1, 4, &[]), broken];

        assert_eq!(compute_critical_path(&tasks), set(&[1]));
    }

    #[test]
    fn test_cycle_terminates() {
        let tasks = vec![make_task(1, 2, &[2]), make_task(2, 3, &[1])];
        let result = critical_path_from_graph(&TaskGraph::new(&tasks));

        // 2 sees 1 on the path (contributes 0): 3; then 1 = 3 + 2
        assert_eq!(result.path_lengths.get(&2), Some(&3));
        assert_eq!(result.path_lengths.get(&1), Some(&5));
        assert_eq!(result.critical_path_tasks, set(&[1, 2]));
    }

    #[test]
    fn test_self_dependency_terminates() {
        let tasks = vec![make_task(1, 2, &[1])];

        assert_eq!(compute_critical_path(&tasks), set(&[1]));
    }

    #[test]
    fn test_idempotent() {
        let tasks = vec![
            make_task(1, 2, &[]),
            make_task(2, 2, &[1]),
            make_task(3, 2, &[1]),
        ];

        assert_eq!(compute_critical_path(&tasks), compute_critical_path(&tasks));
    }
}

//! Earliest start dates (forward pass).

use chrono::{Days, NaiveDate};
use rustc_hash::FxHashMap;

use crate::graph::{forward_pass, ChainFold, TaskGraph};
use crate::models::{Task, TaskId};

/// Add whole days, saturating at the largest representable date.
pub(crate) fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Start date = latest finish (start + duration) among dependencies.
struct EarliestStart {
    today: NaiveDate,
}

impl ChainFold for EarliestStart {
    type Value = NaiveDate;

    fn base(&self) -> NaiveDate {
        self.today
    }

    fn on_cycle(&self) -> NaiveDate {
        self.today
    }

    fn edge(&self, graph: &TaskGraph, dep: TaskId, start: NaiveDate) -> NaiveDate {
        add_days(start, graph.duration_of(dep))
    }

    fn finish(&self, _graph: &TaskGraph, _id: TaskId, latest_finish: NaiveDate) -> NaiveDate {
        latest_finish
    }
}

/// Compute the earliest start date of every task.
///
/// Tasks without resolvable dependencies start `today`. Every task in the
/// collection gets an entry.
pub fn compute_earliest_starts(
    tasks: &[Task],
    today: NaiveDate,
) -> FxHashMap<TaskId, NaiveDate> {
    earliest_starts_from_graph(&TaskGraph::new(tasks), today)
}

/// Same as [`compute_earliest_starts`] over an already built graph.
pub fn earliest_starts_from_graph(
    graph: &TaskGraph,
    today: NaiveDate,
) -> FxHashMap<TaskId, NaiveDate> {
    forward_pass(graph, &EarliestStart { today })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: TaskId, duration: u32, deps: &[TaskId]) -> Task {
        Task::with_dependencies(id, duration, deps)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    fn day(offset: u64) -> NaiveDate {
        add_days(today(), offset)
    }

    #[test]
    fn test_empty_collection() {
        assert!(compute_earliest_starts(&[], today()).is_empty());
    }

    #[test]
    fn test_independent_tasks_start_today() {
        let tasks = vec![make_task(1, 3, &[]), make_task(2, 5, &[])];
        let starts = compute_earliest_starts(&tasks, today());

        assert_eq!(starts.len(), 2);
        assert_eq!(starts.get(&1), Some(&today()));
        assert_eq!(starts.get(&2), Some(&today()));
    }

    #[test]
    fn test_fan_out() {
        // A(2), B(3) after A, C(1) after A
        let tasks = vec![
            make_task(1, 2, &[]),
            make_task(2, 3, &[1]),
            make_task(3, 1, &[1]),
        ];
        let starts = compute_earliest_starts(&tasks, today());

        assert_eq!(starts.get(&1), Some(&today()));
        assert_eq!(starts.get(&2), Some(&day(2)));
        assert_eq!(starts.get(&3), Some(&day(2)));
    }

    #[test]
    fn test_latest_finish_wins() {
        // 3 waits for both 1 (finishes day 2) and 2 (finishes day 5)
        let tasks = vec![
            make_task(3, 1, &[1, 2]),
            make_task(1, 2, &[]),
            make_task(2, 5, &[]),
        ];
        let starts = compute_earliest_starts(&tasks, today());

        assert_eq!(starts.get(&3), Some(&day(5)));
    }

    #[test]
    fn test_chain_and_diamond() {
        // 1(2) -> 2(3) -> 4(1); 1(2) -> 3(5) -> 4(1)
        let tasks = vec![
            make_task(1, 2, &[]),
            make_task(2, 3, &[1]),
            make_task(3, 5, &[1]),
            make_task(4, 1, &[2, 3]),
        ];
        let starts = compute_earliest_starts(&tasks, today());

        assert_eq!(starts.get(&2), Some(&day(2)));
        assert_eq!(starts.get(&3), Some(&day(2)));
        assert_eq!(starts.get(&4), Some(&day(7)));
    }

    #[test]
    fn test_matches_dependency_finish_property() {
        let tasks = vec![
            make_task(10, 4, &[]),
            make_task(11, 1, &[10]),
            make_task(12, 2, &[10, 11]),
            make_task(13, 7, &[]),
            make_task(14, 3, &[12, 13]),
        ];
        let starts = compute_earliest_starts(&tasks, today());

        for task in &tasks {
            let deps = task.dependencies();
            let expected = deps
                .iter()
                .map(|d| {
                    let dep = tasks.iter().find(|t| t.id == *d).unwrap();
                    add_days(starts[d], u64::from(dep.duration))
                })
                .max()
                .unwrap_or(today());
            assert_eq!(starts[&task.id], expected, "task {}", task.id);
        }
    }

    #[test]
    fn test_dangling_dependency_ignored() {
        let tasks = vec![make_task(1, 2, &[]), make_task(2, 1, &[1, 404])];
        let with_dangling = compute_earliest_starts(&tasks, today());

        let clean = vec![make_task(1, 2, &[]), make_task(2, 1, &[1])];
        assert_eq!(with_dangling, compute_earliest_starts(&clean, today()));

        let only_dangling = vec![make_task(5, 2, &[404])];
        let starts = compute_earliest_starts(&only_dangling, today());
        assert_eq!(starts.get(&5), Some(&today()));
    }

    #[test]
    fn test_malformed_encoding_behaves_as_empty() {
        let mut broken = make_task(2, 1, &[]);
        broken.dependency_ids = Some("not json".to_string());
        let tasks = vec![make_task(1, 4, &[]), broken];
        let starts = compute_earliest_starts(&tasks, today());

        assert_eq!(starts.get(&2), Some(&today()));
    }

    #[test]
    fn test_cycle_terminates_with_entries() {
        let tasks = vec![
            make_task(1, 2, &[2]),
            make_task(2, 3, &[1]),
            make_task(3, 1, &[3]),
        ];
        let starts = compute_earliest_starts(&tasks, today());

        assert_eq!(starts.len(), 3);
        // Revisit of 1 from 2 counts as starting today
        assert_eq!(starts.get(&2), Some(&day(2)));
        assert_eq!(starts.get(&1), Some(&day(5)));
        assert_eq!(starts.get(&3), Some(&day(1)));
    }

    #[test]
    fn test_idempotent() {
        let tasks = vec![
            make_task(1, 2, &[]),
            make_task(2, 3, &[1]),
            make_task(3, 1, &[1, 2]),
        ];

        let first = compute_earliest_starts(&tasks, today());
        let second = compute_earliest_starts(&tasks, today());
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_days_saturates() {
        assert_eq!(add_days(NaiveDate::MAX, 10), NaiveDate::MAX);
    }
}

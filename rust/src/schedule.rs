//! Full schedule recomputation.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;

use crate::config::SchedulerConfig;
use crate::critical_path::critical_path_from_graph;
use crate::cycle::would_create_cycle_in;
use crate::earliest_start::{add_days, earliest_starts_from_graph};
use crate::edit::{self, EditError};
use crate::graph::TaskGraph;
use crate::models::{ScheduleResult, Task, TaskId};
use crate::{log_changes, log_checks, log_debug};

/// Runs the scheduling engine over a task snapshot.
///
/// Every call recomputes from scratch over the whole collection; nothing is
/// carried over between calls.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn build_graph(&self, tasks: &[Task]) -> TaskGraph {
        let graph = TaskGraph::new(tasks);
        for (task, missing) in graph.dangling_edges() {
            log_debug!(
                self.config.verbosity,
                "Task {}: ignoring dependency on missing task {}",
                task,
                missing
            );
        }
        graph
    }

    /// Check a proposed edge before the caller commits it.
    pub fn would_create_cycle(
        &self,
        task_id: TaskId,
        dependency_id: TaskId,
        tasks: &[Task],
    ) -> bool {
        let graph = self.build_graph(tasks);
        let cycle = would_create_cycle_in(&graph, task_id, dependency_id);
        log_checks!(
            self.config.verbosity,
            "Cycle check {} -> {}: {}",
            task_id,
            dependency_id,
            if cycle { "cycle" } else { "ok" }
        );
        cycle
    }

    /// Compute every derived field without touching the tasks.
    pub fn compute(&self, tasks: &[Task]) -> ScheduleResult {
        let today = self.config.resolve_today();
        let graph = self.build_graph(tasks);

        let starts = earliest_starts_from_graph(&graph, today);
        let critical = critical_path_from_graph(&graph);

        for id in graph.ids() {
            log_debug!(
                self.config.verbosity,
                "Task {}: path length {}",
                id,
                critical.path_lengths.get(id).copied().unwrap_or(0)
            );
        }

        let project_finish = graph
            .ids()
            .iter()
            .filter_map(|id| {
                starts
                    .get(id)
                    .map(|start| add_days(*start, graph.duration_of(*id)))
            })
            .max();

        ScheduleResult {
            earliest_starts: starts.into_iter().collect(),
            critical_path: critical.critical_path_tasks.into_iter().collect(),
            critical_path_length: critical.critical_path_length,
            project_finish,
        }
    }

    /// Recompute the schedule and write it back onto `tasks`.
    ///
    /// Tasks sharing a duplicated id all receive the values computed for the
    /// first of them.
    pub fn recompute(&self, tasks: &mut [Task]) -> ScheduleResult {
        let result = self.compute(tasks);

        for task in tasks.iter_mut() {
            let start: Option<NaiveDate> = result.earliest_starts.get(&task.id).copied();
            let critical = result.critical_path.contains(&task.id);
            if task.earliest_start != start || task.is_on_critical_path != critical {
                log_changes!(
                    self.config.verbosity,
                    "Task {}: earliest start {:?} -> {:?}, critical {} -> {}",
                    task.id,
                    task.earliest_start,
                    start,
                    task.is_on_critical_path,
                    critical
                );
            }
            task.earliest_start = start;
            task.is_on_critical_path = critical;
        }

        result
    }

    /// Ids of the tasks on the critical path.
    pub fn critical_path(&self, tasks: &[Task]) -> FxHashSet<TaskId> {
        critical_path_from_graph(&self.build_graph(tasks)).critical_path_tasks
    }

    /// [`edit::add_dependency`], logging whether the edge was accepted.
    pub fn add_dependency(
        &self,
        tasks: &mut [Task],
        task_id: TaskId,
        dependency_id: TaskId,
    ) -> Result<(), EditError> {
        match edit::add_dependency(tasks, task_id, dependency_id) {
            Ok(()) => {
                log_changes!(
                    self.config.verbosity,
                    "Task {}: added dependency on {}",
                    task_id,
                    dependency_id
                );
                Ok(())
            }
            Err(err) => {
                log_checks!(
                    self.config.verbosity,
                    "Task {}: rejected dependency on {}: {}",
                    task_id,
                    dependency_id,
                    err
                );
                Err(err)
            }
        }
    }

    /// [`edit::remove_dependency`], logging removed edges.
    pub fn remove_dependency(
        &self,
        tasks: &mut [Task],
        task_id: TaskId,
        dependency_id: TaskId,
    ) -> Result<bool, EditError> {
        let removed = edit::remove_dependency(tasks, task_id, dependency_id).map_err(|err| {
            log_checks!(
                self.config.verbosity,
                "Task {}: cannot remove dependency on {}: {}",
                task_id,
                dependency_id,
                err
            );
            err
        })?;
        if removed {
            log_changes!(
                self.config.verbosity,
                "Task {}: removed dependency on {}",
                task_id,
                dependency_id
            );
        }
        Ok(removed)
    }

    /// [`edit::remove_task`], logging the removal.
    pub fn remove_task(&self, tasks: &mut Vec<Task>, task_id: TaskId) -> Option<Task> {
        let removed = edit::remove_task(tasks, task_id);
        match &removed {
            Some(_) => log_changes!(
                self.config.verbosity,
                "Task {}: removed with all references to it",
                task_id
            ),
            None => log_checks!(self.config.verbosity, "Task {}: not found", task_id),
        }
        removed
    }
}

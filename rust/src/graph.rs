//! Dependency graph access.
//!
//! Decodes each task's stored dependency list once. The calculators only see
//! edges that point at tasks present in the collection; the declared lists
//! are kept alongside for cycle checks. Everything in this crate reads the
//! graph through [`TaskGraph`].

use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::{Task, TaskId};

/// Decode a stored dependency list.
///
/// The encoding is a JSON array of integers. Anything else, including a
/// missing value, decodes to an empty list.
pub fn decode_dependency_ids(raw: Option<&str>) -> Vec<TaskId> {
    match raw {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str::<Vec<TaskId>>(text).unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Encode a dependency list for storage.
pub fn encode_dependency_ids(ids: &[TaskId]) -> String {
    // Serializing a slice of integers cannot fail
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Debug, Clone)]
struct Node {
    duration: u64,
    /// Resolved dependencies, in declaration order.
    deps: Vec<TaskId>,
    /// Decoded dependencies, dangling ids included.
    declared: Vec<TaskId>,
}

/// Resolved view of a task collection.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    /// Task ids in input order (duplicates removed).
    order: Vec<TaskId>,
    nodes: FxHashMap<TaskId, Node>,
    /// Edges dropped because the dependency is not in the collection.
    dangling: Vec<(TaskId, TaskId)>,
}

impl TaskGraph {
    /// Build the graph from a task snapshot.
    ///
    /// When an id appears twice, the first task wins.
    pub fn new(tasks: &[Task]) -> Self {
        let mut order = Vec::with_capacity(tasks.len());
        let mut nodes: FxHashMap<TaskId, Node> =
            FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());

        // First pass: decode every task
        for task in tasks {
            if nodes.contains_key(&task.id) {
                continue;
            }
            order.push(task.id);
            let declared = task.dependencies();
            nodes.insert(
                task.id,
                Node {
                    duration: u64::from(task.duration),
                    deps: declared.clone(),
                    declared,
                },
            );
        }

        // Second pass: drop edges to tasks that are not present
        let known: FxHashSet<TaskId> = nodes.keys().copied().collect();
        let mut dangling = Vec::new();
        for &id in &order {
            if let Some(node) = nodes.get_mut(&id) {
                node.deps.retain(|dep| {
                    let present = known.contains(dep);
                    if !present {
                        dangling.push((id, *dep));
                    }
                    present
                });
            }
        }

        Self {
            order,
            nodes,
            dangling,
        }
    }

    /// Task ids in input order.
    pub fn ids(&self) -> &[TaskId] {
        &self.order
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Resolved dependencies of a task. Unknown tasks have none.
    pub fn dependencies_of(&self, id: TaskId) -> &[TaskId] {
        self.nodes
            .get(&id)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Dependencies as stored, including ids missing from the collection.
    pub fn declared_dependencies_of(&self, id: TaskId) -> &[TaskId] {
        self.nodes
            .get(&id)
            .map(|n| n.declared.as_slice())
            .unwrap_or(&[])
    }

    /// Duration in days. Unknown tasks have zero duration.
    pub fn duration_of(&self, id: TaskId) -> u64 {
        self.nodes.get(&id).map(|n| n.duration).unwrap_or(0)
    }

    /// `(task, missing dependency)` pairs ignored while building.
    pub fn dangling_edges(&self) -> &[(TaskId, TaskId)] {
        &self.dangling
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Reverse adjacency: task id -> tasks that depend on it.
    pub fn dependents_map(&self) -> FxHashMap<TaskId, Vec<TaskId>> {
        let mut dependents: FxHashMap<TaskId, Vec<TaskId>> =
            FxHashMap::with_capacity_and_hasher(self.order.len(), Default::default());
        for &id in &self.order {
            for &dep in self.dependencies_of(id) {
                dependents.entry(dep).or_default().push(id);
            }
        }
        dependents
    }

    /// The task itself plus everything upstream and downstream of it.
    ///
    /// Returns an empty set when `id` is not in the graph.
    pub fn related_to(&self, id: TaskId) -> FxHashSet<TaskId> {
        let mut related = FxHashSet::default();
        if !self.contains(id) {
            return related;
        }
        related.insert(id);

        // Upstream
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for &dep in self.dependencies_of(current) {
                if related.insert(dep) {
                    stack.push(dep);
                }
            }
        }

        // Downstream, tracked separately so upstream nodes are still expanded
        let dependents = self.dependents_map();
        let mut seen: FxHashSet<TaskId> = FxHashSet::default();
        seen.insert(id);
        stack.push(id);
        while let Some(current) = stack.pop() {
            if let Some(children) = dependents.get(&current) {
                for &child in children {
                    if seen.insert(child) {
                        related.insert(child);
                        stack.push(child);
                    }
                }
            }
        }

        related
    }
}

/// A value folded along dependency chains by [`forward_pass`].
///
/// For a task `t` with resolved dependencies `d1..dn` the pass computes
/// `finish(t, max(base, edge(d1, value(d1)), .., edge(dn, value(dn))))`.
pub(crate) trait ChainFold {
    type Value: Copy + Ord;

    /// Starting accumulator for every task.
    fn base(&self) -> Self::Value;

    /// Value of a dependency that is already on the current path.
    fn on_cycle(&self) -> Self::Value;

    /// Contribution of dependency `dep` whose own value is `value`.
    fn edge(&self, graph: &TaskGraph, dep: TaskId, value: Self::Value) -> Self::Value;

    /// Final value for `id` given the folded accumulator.
    fn finish(&self, graph: &TaskGraph, id: TaskId, acc: Self::Value) -> Self::Value;
}

struct Frame<V> {
    id: TaskId,
    next_dep: usize,
    acc: V,
}

/// Evaluate `fold` for every task in the graph.
///
/// Results are memoized across the whole pass. The on-path set only ever
/// holds the tasks of the chain currently being walked, so a dependency
/// that loops back contributes [`ChainFold::on_cycle`] instead of recursing.
/// Uses an explicit stack, so depth is bounded by task count and not by the
/// thread's stack size.
pub(crate) fn forward_pass<F: ChainFold>(
    graph: &TaskGraph,
    fold: &F,
) -> FxHashMap<TaskId, F::Value> {
    let mut memo: FxHashMap<TaskId, F::Value> =
        FxHashMap::with_capacity_and_hasher(graph.len(), Default::default());
    let mut on_path: FxHashSet<TaskId> = FxHashSet::default();
    let mut stack: Vec<Frame<F::Value>> = Vec::new();

    for &root in graph.ids() {
        if memo.contains_key(&root) {
            continue;
        }
        on_path.insert(root);
        stack.push(Frame {
            id: root,
            next_dep: 0,
            acc: fold.base(),
        });

        while let Some(top) = stack.last_mut() {
            let deps = graph.dependencies_of(top.id);
            if let Some(&dep) = deps.get(top.next_dep) {
                top.next_dep += 1;
                let known = match memo.get(&dep) {
                    Some(&value) => Some(value),
                    None if on_path.contains(&dep) => Some(fold.on_cycle()),
                    None => None,
                };
                match known {
                    Some(value) => top.acc = top.acc.max(fold.edge(graph, dep, value)),
                    None => {
                        on_path.insert(dep);
                        stack.push(Frame {
                            id: dep,
                            next_dep: 0,
                            acc: fold.base(),
                        });
                    }
                }
                continue;
            }

            // All dependencies folded
            let (id, acc) = (top.id, top.acc);
            stack.pop();
            on_path.remove(&id);
            let value = fold.finish(graph, id, acc);
            memo.insert(id, value);
            if let Some(parent) = stack.last_mut() {
                parent.acc = parent.acc.max(fold.edge(graph, id, value));
            }
        }
    }

    memo
}

/// Depth of each task in the dependency graph.
struct Level;

impl ChainFold for Level {
    type Value = u32;

    fn base(&self) -> u32 {
        0
    }

    fn on_cycle(&self) -> u32 {
        0
    }

    fn edge(&self, _graph: &TaskGraph, _dep: TaskId, value: u32) -> u32 {
        value.saturating_add(1)
    }

    fn finish(&self, _graph: &TaskGraph, _id: TaskId, acc: u32) -> u32 {
        acc
    }
}

/// Level of every task: 0 without dependencies, else one more than the
/// deepest dependency.
pub fn dependency_levels(tasks: &[Task]) -> FxHashMap<TaskId, u32> {
    forward_pass(&TaskGraph::new(tasks), &Level)
}

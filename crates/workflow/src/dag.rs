//! Dependency graph operations.
//!
//! Rules enforced:
//! 1. Task IDs must be non-empty and unique within the workflow.
//! 2. Every dependency must reference declared task IDs on both sides.
//! 3. The directed graph must be acyclic.
//!
//! [`add_dependency`] keeps these rules while a workflow is being declared;
//! [`validate_workflow`] re-checks them on a value from elsewhere (e.g. JSON)
//! and returns a topological ordering of the tasks.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::{models::DependencyEdge, DefinitionError, WorkflowSpec};

/// Record that `predecessor` must finish before each of `successors` starts.
///
/// Every ID is checked before anything is recorded, so on error the spec is
/// left exactly as it was. Re-adding an existing edge is a no-op.
///
/// # Errors
/// - [`DefinitionError::UnknownTask`] if any ID isn't declared in `spec`.
/// - [`DefinitionError::CycleDetected`] if an edge would close a cycle.
pub fn add_dependency<S: AsRef<str>>(
    spec: &mut WorkflowSpec,
    predecessor: &str,
    successors: &[S],
) -> Result<(), DefinitionError> {
    if !spec.contains_task(predecessor) {
        return Err(DefinitionError::UnknownTask {
            task_id: predecessor.to_owned(),
            side: "upstream",
        });
    }
    for successor in successors {
        let successor = successor.as_ref();
        if !spec.contains_task(successor) {
            return Err(DefinitionError::UnknownTask {
                task_id: successor.to_owned(),
                side: "downstream",
            });
        }
    }

    // Cycle checks run against the edges that would exist once the whole batch
    // is in, so nothing is inserted until every edge is known to be safe.
    let mut staged = spec.dependencies.clone();
    for successor in successors {
        let successor = successor.as_ref();
        if successor == predecessor || reaches(&staged, successor, predecessor) {
            return Err(DefinitionError::CycleDetected {
                upstream: Some(predecessor.to_owned()),
                downstream: Some(successor.to_owned()),
            });
        }
        staged.insert(DependencyEdge::new(predecessor, successor));
    }

    for successor in successors {
        debug!(
            workflow_id = %spec.id,
            "dependency recorded: {} -> {}",
            predecessor,
            successor.as_ref()
        );
    }
    spec.dependencies = staged;

    Ok(())
}

/// Whether `to` is reachable from `from` by following edges downstream.
fn reaches(edges: &BTreeSet<DependencyEdge>, from: &str, to: &str) -> bool {
    let mut stack = vec![from];
    let mut visited: HashSet<&str> = HashSet::new();

    while let Some(current) = stack.pop() {
        if current == to {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        stack.extend(
            edges
                .iter()
                .filter(|e| e.upstream == current)
                .map(|e| e.downstream.as_str()),
        );
    }

    false
}

/// Check every workflow invariant and return task IDs in execution order.
///
/// Ties are broken by declaration order, so the result is deterministic.
///
/// # Errors
/// - [`DefinitionError::EmptyTaskId`] / [`DefinitionError::DuplicateTaskId`]
///   for bad task IDs.
/// - [`DefinitionError::InvalidSchedule`] if the schedule is unusable.
/// - [`DefinitionError::UnknownTask`] if a dependency references a missing task.
/// - [`DefinitionError::CycleDetected`] if the graph is not acyclic.
pub fn validate_workflow(spec: &WorkflowSpec) -> Result<Vec<String>, DefinitionError> {
    // -----------------------------------------------------------------------
    // 1. Task IDs
    // -----------------------------------------------------------------------
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(spec.tasks.len());
    for (position, task) in spec.tasks.iter().enumerate() {
        if task.id.is_empty() {
            return Err(DefinitionError::EmptyTaskId);
        }
        if index.insert(task.id.as_str(), position).is_some() {
            return Err(DefinitionError::DuplicateTaskId(task.id.clone()));
        }
    }

    spec.schedule.validate()?;

    // -----------------------------------------------------------------------
    // 2. Dependency endpoints
    // -----------------------------------------------------------------------
    for edge in &spec.dependencies {
        if !index.contains_key(edge.upstream.as_str()) {
            return Err(DefinitionError::UnknownTask {
                task_id: edge.upstream.clone(),
                side: "upstream",
            });
        }
        if !index.contains_key(edge.downstream.as_str()) {
            return Err(DefinitionError::UnknownTask {
                task_id: edge.downstream.clone(),
                side: "downstream",
            });
        }
    }

    // -----------------------------------------------------------------------
    // 3. Topological sort (Kahn's algorithm)
    // -----------------------------------------------------------------------
    let mut in_degree: Vec<usize> = vec![0; spec.tasks.len()];
    let mut downstream: Vec<Vec<usize>> = vec![Vec::new(); spec.tasks.len()];

    for edge in &spec.dependencies {
        let from = index[edge.upstream.as_str()];
        let to = index[edge.downstream.as_str()];
        downstream[from].push(to);
        in_degree[to] += 1;
    }

    // Ordered by declaration position, so the earliest-declared ready task
    // always goes first.
    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 0)
        .map(|(i, _)| i)
        .collect();

    let mut sorted: Vec<String> = Vec::with_capacity(spec.tasks.len());

    while let Some(current) = ready.pop_first() {
        sorted.push(spec.tasks[current].id.clone());

        for &next in &downstream[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert(next);
            }
        }
    }

    if sorted.len() != spec.tasks.len() {
        return Err(DefinitionError::CycleDetected {
            upstream: None,
            downstream: None,
        });
    }

    Ok(sorted)
}

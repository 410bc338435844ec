use crate::task::Task;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Why a task ended a propagation run without dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DependencyIssue {
    /// A dependency id names no task in the set.
    MissingDependency { dependency: String },
    /// The task sits on a dependency cycle.
    Cycle { members: Vec<String> },
    /// A dependency is itself unschedulable.
    BlockedBy { dependency: String },
    /// A root task without a start date.
    NoStartDate,
    /// The end date would fall past the last representable calendar date.
    DateOutOfRange,
    /// Dependencies look fine but the pass ceiling was reached first.
    PassCeiling,
}

impl fmt::Display for DependencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyIssue::MissingDependency { dependency } => {
                write!(f, "depends on unknown task '{dependency}'")
            }
            DependencyIssue::Cycle { members } => {
                write!(f, "dependency cycle among {}", members.join(", "))
            }
            DependencyIssue::BlockedBy { dependency } => {
                write!(f, "blocked by unschedulable task '{dependency}'")
            }
            DependencyIssue::NoStartDate => write!(f, "root task has no start date"),
            DependencyIssue::DateOutOfRange => {
                write!(f, "end date falls past the last supported calendar date")
            }
            DependencyIssue::PassCeiling => {
                write!(f, "not settled before the propagation pass ceiling")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnscheduledTask {
    pub id: String,
    pub issue: DependencyIssue,
}

/// Dependency graph over task ids, edges run dependency -> dependent.
pub struct ScheduleDag {
    pub graph: DiGraph<String, ()>,
    pub id_to_index: HashMap<String, NodeIndex>,
    /// Dependency ids that name no task, keyed by the task declaring them.
    pub missing: HashMap<String, Vec<String>>,
}

impl ScheduleDag {
    pub fn build(tasks: &[Task]) -> Self {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::new();
        let mut missing: HashMap<String, Vec<String>> = HashMap::new();

        for task in tasks {
            if !id_to_index.contains_key(&task.id) {
                let node_ix = graph.add_node(task.id.clone());
                id_to_index.insert(task.id.clone(), node_ix);
            }
        }

        for task in tasks {
            let target = id_to_index[&task.id];
            for dependency in &task.dependencies {
                match id_to_index.get(dependency) {
                    Some(&source) => {
                        graph.update_edge(source, target, ());
                    }
                    None => missing
                        .entry(task.id.clone())
                        .or_default()
                        .push(dependency.clone()),
                }
            }
        }

        Self {
            graph,
            id_to_index,
            missing,
        }
    }

    /// Task ids in dependency order (Kahn), or the id of a task on a cycle.
    pub fn topological_order(&self) -> Result<Vec<String>, String> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|ix| self.graph[ix].clone()).collect())
            .map_err(|cycle| self.graph[cycle.node_id()].clone())
    }

    /// Every dependency cycle, including tasks that depend on themselves.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || self.graph.contains_edge(component[0], component[0])
            })
            .map(|component| {
                let mut members: Vec<String> = component
                    .into_iter()
                    .map(|ix| self.graph[ix].clone())
                    .collect();
                members.sort();
                members
            })
            .collect()
    }

    /// Explain every task of a propagated set that has no end date.
    ///
    /// `out_of_range` lists the tasks the engine could not place because
    /// their end date overflowed the calendar.
    pub fn diagnose(&self, tasks: &[Task], out_of_range: &[String]) -> Vec<UnscheduledTask> {
        let unscheduled: HashSet<&str> = tasks
            .iter()
            .filter(|task| !task.is_scheduled())
            .map(|task| task.id.as_str())
            .collect();
        let cycles = self.cycles();

        tasks
            .iter()
            .filter(|task| !task.is_scheduled())
            .map(|task| {
                let issue = if let Some(dependency) =
                    self.missing.get(&task.id).and_then(|deps| deps.first())
                {
                    DependencyIssue::MissingDependency {
                        dependency: dependency.clone(),
                    }
                } else if let Some(members) =
                    cycles.iter().find(|members| members.contains(&task.id))
                {
                    DependencyIssue::Cycle {
                        members: members.clone(),
                    }
                } else if out_of_range.contains(&task.id) {
                    DependencyIssue::DateOutOfRange
                } else if let Some(dependency) = task
                    .dependencies
                    .iter()
                    .find(|dep| unscheduled.contains(dep.as_str()))
                {
                    DependencyIssue::BlockedBy {
                        dependency: dependency.clone(),
                    }
                } else if task.is_root() && task.start_date.is_none() {
                    DependencyIssue::NoStartDate
                } else {
                    DependencyIssue::PassCeiling
                };
                UnscheduledTask {
                    id: task.id.clone(),
                    issue,
                }
            })
            .collect()
    }
}

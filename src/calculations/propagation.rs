use crate::calculations::effort::{
    compute_end_date, remaining_capacity_at_end, resolve_next_available,
};
use crate::calendar::BusinessCalendar;
use crate::task::Task;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Safety ceiling on fixed-point passes. A DAG of depth `d` settles in `d`.
pub const DEFAULT_MAX_PASSES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    pub passes: usize,
    /// False when the pass ceiling was hit while values were still moving.
    pub converged: bool,
    /// Tasks left without an end date, in task-set order.
    pub unscheduled: Vec<String>,
    /// Tasks whose end date would fall past the last representable date.
    pub out_of_range: Vec<String>,
}

/// Fixed-point date and capacity propagation over a task set.
///
/// Every run starts from scratch: derived fields of dependent tasks are
/// cleared, roots keep their own start date. Each pass first schedules the
/// roots, then every dependent whose dependencies all have an end date,
/// starting from the dependency that ends last. Passes repeat until nothing
/// changes or the ceiling is reached.
#[derive(Debug, Clone)]
pub struct Propagation {
    calendar: BusinessCalendar,
    max_passes: usize,
}

impl Default for Propagation {
    fn default() -> Self {
        Self::new(BusinessCalendar::new())
    }
}

impl Propagation {
    pub fn new(calendar: BusinessCalendar) -> Self {
        Self {
            calendar,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn run(&self, mut tasks: Vec<Task>) -> (Vec<Task>, PropagationReport) {
        for task in &mut tasks {
            task.clear_derived();
        }

        // First occurrence wins if a caller hands us duplicate ids.
        let mut index: HashMap<String, usize> = HashMap::with_capacity(tasks.len());
        for (idx, task) in tasks.iter().enumerate() {
            index.entry(task.id.clone()).or_insert(idx);
        }

        let mut passes = 0;
        let mut converged = false;
        let mut out_of_range = Vec::new();
        while passes < self.max_passes {
            passes += 1;
            let mut changed = false;
            out_of_range.clear();

            for task in tasks.iter_mut().filter(|task| task.is_root()) {
                let Some(start) = task.start_date else {
                    continue;
                };
                match compute_end_date(&self.calendar, start, task.effort, 0.0) {
                    Some(end) => {
                        let remaining = remaining_capacity_at_end(task.effort, 0.0);
                        changed |= apply(task, start, end, remaining);
                    }
                    None => {
                        out_of_range.push(task.id.clone());
                        changed |= unschedule(task);
                    }
                }
            }

            for idx in 0..tasks.len() {
                if tasks[idx].is_root() {
                    continue;
                }
                let Some((dependency_end, dependency_remaining)) =
                    latest_dependency(&tasks, &index, &tasks[idx])
                else {
                    continue;
                };
                let effort = tasks[idx].effort;
                let placed =
                    resolve_next_available(&self.calendar, dependency_end, dependency_remaining)
                        .and_then(|slot| {
                            compute_end_date(
                                &self.calendar,
                                slot.start_date,
                                effort,
                                slot.used_capacity,
                            )
                            .map(|end| (slot.start_date, end))
                        });
                let task = &mut tasks[idx];
                match placed {
                    Some((start, end)) => {
                        let remaining = remaining_capacity_at_end(effort, dependency_remaining);
                        changed |= apply(task, start, end, remaining);
                    }
                    None => {
                        out_of_range.push(task.id.clone());
                        changed |= unschedule(task);
                    }
                }
            }

            debug!(pass = passes, changed, "propagation pass finished");
            if !changed {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                max_passes = self.max_passes,
                "propagation stopped at the pass ceiling before settling"
            );
        }
        if !out_of_range.is_empty() {
            warn!(?out_of_range, "end dates fall past the last representable date");
        }

        let unscheduled: Vec<String> = tasks
            .iter()
            .filter(|task| !task.is_scheduled())
            .map(|task| task.id.clone())
            .collect();
        if !unscheduled.is_empty() {
            warn!(?unscheduled, "tasks left without dates after propagation");
        }

        let report = PropagationReport {
            passes,
            converged,
            unscheduled,
            out_of_range,
        };
        (tasks, report)
    }
}

/// End date and leftover capacity of the latest-ending dependency, or `None`
/// while any dependency is missing or still has no end date.
fn latest_dependency(
    tasks: &[Task],
    index: &HashMap<String, usize>,
    task: &Task,
) -> Option<(NaiveDate, f64)> {
    let mut latest: Option<(NaiveDate, f64)> = None;
    for dependency_id in &task.dependencies {
        let dependency = &tasks[*index.get(dependency_id)?];
        let end = dependency.end_date?;
        // Strict comparison keeps the first dependency on ties.
        if latest.is_none_or(|(latest_end, _)| end > latest_end) {
            latest = Some((end, dependency.remaining_capacity_at_end));
        }
    }
    latest
}

fn apply(task: &mut Task, start: NaiveDate, end: NaiveDate, remaining: f64) -> bool {
    let changed = task.start_date != Some(start)
        || task.end_date != Some(end)
        || task.remaining_capacity_at_end != remaining;
    if changed {
        task.start_date = Some(start);
        task.end_date = Some(end);
        task.remaining_capacity_at_end = remaining;
    }
    changed
}

/// Drop dates a task picked up in an earlier pass. Roots keep their start.
fn unschedule(task: &mut Task) -> bool {
    let changed = task.end_date.is_some();
    task.clear_derived();
    changed
}

/// Recompute dates and capacities of every task with the default engine.
pub fn propagate(tasks: Vec<Task>) -> Vec<Task> {
    Propagation::default().run(tasks).0
}

use crate::calculations::{Propagation, PropagationReport, propagate};
use crate::graph::{ScheduleDag, UnscheduledTask};
use crate::metadata::{ProjectInfo, ProjectInfoError};
use crate::summary::EffortSummary;
use crate::task::{Task, clamp_effort};
use crate::template::build_template;
use chrono::NaiveDate;
use std::fmt;
use tracing::{debug, info};

/// Build the six-task template starting on `project_start` and propagate it.
pub fn generate_schedule(project_start: NaiveDate) -> Vec<Task> {
    propagate(build_template(project_start, "", ""))
}

/// Like [`generate_schedule`], with resources taken from the project roles.
pub fn generate_schedule_for(project: &ProjectInfo) -> Result<Vec<Task>, ProjectInfoError> {
    let start = project.validate()?;
    Ok(propagate(build_template(start, &project.developer, &project.ba)))
}

/// Set a task's effort (clamped) and recompute every task.
///
/// An unknown id returns the set as it was.
pub fn update_effort(mut tasks: Vec<Task>, task_id: &str, effort: f64) -> Vec<Task> {
    match tasks.iter_mut().find(|task| task.id == task_id) {
        Some(task) => task.effort = clamp_effort(effort),
        None => {
            debug!(task_id, "effort edit for unknown task ignored");
            return tasks;
        }
    }
    propagate(tasks)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    TaskNotFound(String),
    Project(ProjectInfoError),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::TaskNotFound(id) => write!(f, "task '{id}' not found"),
            ScheduleError::Project(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ScheduleError {}

impl From<ProjectInfoError> for ScheduleError {
    fn from(value: ProjectInfoError) -> Self {
        Self::Project(value)
    }
}

/// Host-side owner of a task set.
///
/// The collection is replaced wholesale with the engine's output after every
/// effort edit, so readers never observe a half-propagated set.
#[derive(Debug, Clone)]
pub struct Schedule {
    project: ProjectInfo,
    tasks: Vec<Task>,
    engine: Propagation,
    last_report: PropagationReport,
}

impl Schedule {
    pub fn generate(project: ProjectInfo) -> Result<Self, ScheduleError> {
        let start = project.validate()?;
        let tasks = build_template(start, &project.developer, &project.ba);
        let schedule = Self::from_tasks(project, tasks);
        info!(
            ticket = %schedule.project.ticket_id,
            %start,
            finish = ?schedule.latest_finish(),
            "generated schedule"
        );
        Ok(schedule)
    }

    /// Adopt an arbitrary task set and propagate it.
    pub fn from_tasks(project: ProjectInfo, tasks: Vec<Task>) -> Self {
        Self::from_tasks_with(project, tasks, Propagation::default())
    }

    pub fn from_tasks_with(project: ProjectInfo, tasks: Vec<Task>, engine: Propagation) -> Self {
        let (tasks, last_report) = engine.run(tasks);
        Self {
            project,
            tasks,
            engine,
            last_report,
        }
    }

    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn last_report(&self) -> &PropagationReport {
        &self.last_report
    }

    pub fn update_effort(&mut self, task_id: &str, effort: f64) -> Result<&[Task], ScheduleError> {
        let position = self.position(task_id)?;
        let mut next = self.tasks.clone();
        next[position].effort = clamp_effort(effort);
        let (tasks, report) = self.engine.run(next);
        self.tasks = tasks;
        self.last_report = report;
        info!(
            task_id,
            effort = self.tasks[position].effort,
            passes = self.last_report.passes,
            "effort updated"
        );
        Ok(self.tasks.as_slice())
    }

    /// Free-text progress, never triggers propagation.
    pub fn set_percent_complete(
        &mut self,
        task_id: &str,
        percent_complete: impl Into<String>,
    ) -> Result<&Task, ScheduleError> {
        let position = self.position(task_id)?;
        self.tasks[position].percent_complete = percent_complete.into();
        Ok(&self.tasks[position])
    }

    pub fn set_resource_name(
        &mut self,
        task_id: &str,
        resource_name: impl Into<String>,
    ) -> Result<&Task, ScheduleError> {
        let position = self.position(task_id)?;
        self.tasks[position].resource_name = resource_name.into();
        Ok(&self.tasks[position])
    }

    pub fn summary(&self) -> EffortSummary {
        EffortSummary::from_tasks(&self.tasks)
    }

    /// Tasks left without dates, each with the reason it could not be placed.
    pub fn unscheduled(&self) -> Vec<UnscheduledTask> {
        if self.last_report.unscheduled.is_empty() {
            return Vec::new();
        }
        ScheduleDag::build(&self.tasks).diagnose(&self.tasks, &self.last_report.out_of_range)
    }

    pub fn latest_finish(&self) -> Option<NaiveDate> {
        self.tasks.iter().filter_map(|task| task.end_date).max()
    }

    fn position(&self, task_id: &str) -> Result<usize, ScheduleError> {
        self.tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or_else(|| ScheduleError::TaskNotFound(task_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectInfo {
        ProjectInfo::new("TCK-1", "dev", "ba", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn unknown_task_leaves_schedule_untouched() {
        let mut schedule = Schedule::generate(project()).unwrap();
        let before = schedule.tasks().to_vec();
        let err = schedule.update_effort("nope", 3.0).unwrap_err();
        assert_eq!(err, ScheduleError::TaskNotFound("nope".into()));
        assert_eq!(schedule.tasks(), before.as_slice());
    }

    #[test]
    fn progress_edits_do_not_move_dates() {
        let mut schedule = Schedule::generate(project()).unwrap();
        let before = schedule.tasks().to_vec();
        schedule.set_percent_complete("coding", "50%").unwrap();
        schedule.set_resource_name("uatsupport", "qa").unwrap();
        for (old, new) in before.iter().zip(schedule.tasks()) {
            assert_eq!(old.start_date, new.start_date);
            assert_eq!(old.end_date, new.end_date);
        }
        assert_eq!(schedule.find_task("coding").unwrap().percent_complete, "50%");
        assert_eq!(schedule.find_task("uatsupport").unwrap().resource_name, "qa");
    }
}

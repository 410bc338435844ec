use super::{ExportError, ExportResult};
use crate::metadata::ProjectInfo;
use crate::summary::EffortSummary;
use crate::task::Task;
use crate::template::Phase;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One line of the exported WBS sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WbsRow {
    #[serde(rename = "Task Name")]
    pub task_name: String,
    #[serde(rename = "Effort (Days)")]
    pub effort: Option<f64>,
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "% Complete")]
    pub percent_complete: String,
    #[serde(rename = "Resource Name")]
    pub resource_name: String,
    /// Title and phase rows are rendered bold by sheet consumers.
    #[serde(skip)]
    pub emphasis: bool,
}

impl WbsRow {
    fn heading(task_name: String, effort: Option<f64>) -> Self {
        Self {
            task_name,
            effort,
            start_date: String::new(),
            end_date: String::new(),
            percent_complete: String::new(),
            resource_name: String::new(),
            emphasis: true,
        }
    }

    fn from_task(task: &Task) -> Self {
        let percent_complete = if task.percent_complete.trim().is_empty() {
            "0%".to_string()
        } else {
            task.percent_complete.clone()
        };
        Self {
            task_name: format!("\t\t{}", task.name),
            effort: Some(task.effort),
            start_date: format_date(task.start_date),
            end_date: format_date(task.end_date),
            percent_complete,
            resource_name: task.resource_name.clone(),
            emphasis: false,
        }
    }
}

/// Title row, then each phase row followed by its tasks in task-set order.
pub fn wbs_rows(project: &ProjectInfo, tasks: &[Task]) -> Vec<WbsRow> {
    let summary = EffortSummary::from_tasks(tasks);
    let mut rows = vec![WbsRow::heading(project.sheet_title().to_string(), None)];
    for phase in Phase::ALL {
        rows.push(WbsRow::heading(
            format!("\t{}", phase.heading()),
            Some(summary.for_phase(phase)),
        ));
        rows.extend(
            tasks
                .iter()
                .filter(|task| Phase::for_task_id(&task.id) == Some(phase))
                .map(WbsRow::from_task),
        );
    }
    rows
}

pub fn write_wbs_csv<W: Write>(
    writer: W,
    project: &ProjectInfo,
    tasks: &[Task],
) -> ExportResult<()> {
    if tasks.is_empty() {
        return Err(ExportError::NoTasks);
    }
    let mut writer = csv::Writer::from_writer(writer);
    for row in wbs_rows(project, tasks) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_wbs_to_csv<P: AsRef<Path>>(
    project: &ProjectInfo,
    tasks: &[Task],
    path: P,
) -> ExportResult<()> {
    if tasks.is_empty() {
        return Err(ExportError::NoTasks);
    }
    let file = File::create(path)?;
    write_wbs_csv(file, project, tasks)
}

#[derive(Serialize)]
struct ScheduleSnapshot<'a> {
    project: &'a ProjectInfo,
    summary: EffortSummary,
    tasks: &'a [Task],
}

pub fn save_tasks_to_json<P: AsRef<Path>>(
    project: &ProjectInfo,
    tasks: &[Task],
    path: P,
) -> ExportResult<()> {
    if tasks.is_empty() {
        return Err(ExportError::NoTasks);
    }
    let snapshot = ScheduleSnapshot {
        project,
        summary: EffortSummary::from_tasks(tasks),
        tasks,
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

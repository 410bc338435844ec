use crate::task::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DESIGN: &str = "design";
pub const CODING: &str = "coding";
pub const UNIT_TEST: &str = "unittest";
pub const FUNCTION_TEST: &str = "functiontest";
pub const UAT_SUPPORT: &str = "uatsupport";
pub const GO_LIVE: &str = "golive";

/// Effort every template task starts with, in days.
pub const DEFAULT_EFFORT: f64 = 1.0;

/// Reporting bucket a template task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Development,
    UatSupport,
    GoLive,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Development, Phase::UatSupport, Phase::GoLive];

    pub fn for_task_id(id: &str) -> Option<Phase> {
        match id {
            DESIGN | CODING | UNIT_TEST | FUNCTION_TEST => Some(Phase::Development),
            UAT_SUPPORT => Some(Phase::UatSupport),
            GO_LIVE => Some(Phase::GoLive),
            _ => None,
        }
    }

    /// Heading used for the phase row of an exported sheet.
    pub fn heading(self) -> &'static str {
        match self {
            Phase::Development => "I.Update logic report",
            Phase::UatSupport => "II.UAT & Support",
            Phase::GoLive => "III.Go Live",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Assignee {
    Ba,
    Developer,
    Unassigned,
}

struct TemplateTask {
    id: &'static str,
    name: &'static str,
    assignee: Assignee,
}

const TEMPLATE: [TemplateTask; 6] = [
    TemplateTask { id: DESIGN, name: "Task Design", assignee: Assignee::Ba },
    TemplateTask { id: CODING, name: "Task Coding", assignee: Assignee::Developer },
    TemplateTask { id: UNIT_TEST, name: "Task Unit Test", assignee: Assignee::Developer },
    TemplateTask { id: FUNCTION_TEST, name: "Task Function Test", assignee: Assignee::Ba },
    TemplateTask { id: UAT_SUPPORT, name: "Task UAT & Support", assignee: Assignee::Unassigned },
    TemplateTask { id: GO_LIVE, name: "Task Conduct Go-live", assignee: Assignee::Unassigned },
];

/// The fixed six-task chain, unpropagated.
///
/// Only the first task carries a start date; every other task depends on
/// the one before it.
pub fn build_template(start_date: NaiveDate, developer: &str, ba: &str) -> Vec<Task> {
    let mut previous: Option<&'static str> = None;
    TEMPLATE
        .iter()
        .map(|entry| {
            let resource = match entry.assignee {
                Assignee::Ba => ba,
                Assignee::Developer => developer,
                Assignee::Unassigned => "",
            };
            let mut task = Task::new(entry.id, entry.name, DEFAULT_EFFORT).with_resource(resource);
            match previous {
                Some(dependency) => task = task.with_dependencies([dependency]),
                None => task = task.with_start_date(start_date),
            }
            previous = Some(entry.id);
            task
        })
        .collect()
}

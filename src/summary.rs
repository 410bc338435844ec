use crate::task::Task;
use crate::template::Phase;
use serde::{Deserialize, Serialize};

/// Effort totals per reporting phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffortSummary {
    /// Design, coding, unit test and function test.
    pub development_phase: f64,
    pub uat_support: f64,
    pub go_live: f64,
    pub total: f64,
}

impl EffortSummary {
    /// Tasks whose id is outside the template are left out of every bucket.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut summary = Self::default();
        for task in tasks {
            match Phase::for_task_id(&task.id) {
                Some(Phase::Development) => summary.development_phase += task.effort,
                Some(Phase::UatSupport) => summary.uat_support += task.effort,
                Some(Phase::GoLive) => summary.go_live += task.effort,
                None => {}
            }
        }
        summary.total = summary.development_phase + summary.uat_support + summary.go_live;
        summary
    }

    pub fn for_phase(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Development => self.development_phase,
            Phase::UatSupport => self.uat_support,
            Phase::GoLive => self.go_live,
        }
    }

    pub fn to_cli_summary(&self) -> String {
        format!(
            "development={:.1} uat_support={:.1} go_live={:.1} total={:.1} days",
            self.development_phase, self.uat_support, self.go_live, self.total
        )
    }
}

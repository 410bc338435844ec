pub mod calculations;
pub mod calendar;
pub mod export;
pub mod frame;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod metadata;
pub mod schedule;
pub mod summary;
pub mod task;
pub mod template;

pub use calculations::{Propagation, PropagationReport, propagate};
pub use calendar::{BusinessCalendar, next_business_day};
pub use export::{ExportError, save_tasks_to_json, save_wbs_to_csv, wbs_rows};
pub use frame::tasks_to_dataframe;
pub use graph::{DependencyIssue, ScheduleDag, UnscheduledTask};
pub use metadata::{ProjectInfo, ProjectInfoError};
pub use schedule::{
    Schedule, ScheduleError, generate_schedule, generate_schedule_for, update_effort,
};
pub use summary::EffortSummary;
pub use task::{MIN_EFFORT, Task, clamp_effort};
pub use template::Phase;

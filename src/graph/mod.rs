pub mod schedule_dag;

pub use schedule_dag::{DependencyIssue, ScheduleDag, UnscheduledTask};

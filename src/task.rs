use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Smallest effort a task may carry, in working days.
pub const MIN_EFFORT: f64 = 0.1;

/// Clamp a user supplied effort to a valid value.
///
/// Anything non-finite or below [`MIN_EFFORT`] is silently raised to the
/// minimum instead of being rejected.
pub fn clamp_effort(effort: f64) -> f64 {
    if effort.is_finite() {
        effort.max(MIN_EFFORT)
    } else {
        MIN_EFFORT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Working days required, possibly fractional.
    pub effort: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Share of the end date's workday left for a dependent, in `[0, 1)`.
    #[serde(default)]
    pub remaining_capacity_at_end: f64,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub percent_complete: String,
    #[serde(default)]
    pub resource_name: String,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, effort: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            effort: clamp_effort(effort),
            start_date: None,
            end_date: None,
            remaining_capacity_at_end: 0.0,
            dependencies: Vec::new(),
            percent_complete: String::new(),
            resource_name: String::new(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_resource(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = resource_name.into();
        self
    }

    /// A root is scheduled from its own start date.
    pub fn is_root(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn is_scheduled(&self) -> bool {
        self.end_date.is_some()
    }

    /// Forget everything propagation derives for this task.
    pub(crate) fn clear_derived(&mut self) {
        if !self.is_root() {
            self.start_date = None;
        }
        self.end_date = None;
        self.remaining_capacity_at_end = 0.0;
    }
}

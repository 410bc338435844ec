use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project fields captured before a schedule can be generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub ticket_id: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub ba: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectInfoError {
    MissingFields(Vec<&'static str>),
}

impl fmt::Display for ProjectInfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectInfoError::MissingFields(fields) => {
                write!(f, "missing required project fields: {}", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for ProjectInfoError {}

impl ProjectInfo {
    pub fn new(
        ticket_id: impl Into<String>,
        developer: impl Into<String>,
        ba: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            developer: developer.into(),
            ba: ba.into(),
            start_date: Some(start_date),
        }
    }

    /// Check every required field and return the project start date.
    ///
    /// Blank strings count as missing.
    pub fn validate(&self) -> Result<NaiveDate, ProjectInfoError> {
        let mut missing = Vec::new();
        if self.ticket_id.trim().is_empty() {
            missing.push("ticket_id");
        }
        if self.developer.trim().is_empty() {
            missing.push("developer");
        }
        if self.ba.trim().is_empty() {
            missing.push("ba");
        }
        match self.start_date {
            Some(start) if missing.is_empty() => Ok(start),
            Some(_) => Err(ProjectInfoError::MissingFields(missing)),
            None => {
                missing.push("start_date");
                Err(ProjectInfoError::MissingFields(missing))
            }
        }
    }

    /// Label used for exported sheets and files.
    pub fn sheet_title(&self) -> &str {
        let ticket = self.ticket_id.trim();
        if ticket.is_empty() { "WBS" } else { ticket }
    }
}

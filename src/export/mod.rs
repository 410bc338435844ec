use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum ExportError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    Csv(csv::Error),
    NoTasks,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Serialization(err) => write!(f, "serialization error: {err}"),
            ExportError::Io(err) => write!(f, "io error: {err}"),
            ExportError::Csv(err) => write!(f, "csv error: {err}"),
            ExportError::NoTasks => write!(f, "no WBS data to export"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<SerdeJsonError> for ExportError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for ExportError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

pub mod file;

pub use file::{WbsRow, save_tasks_to_json, save_wbs_to_csv, wbs_rows, write_wbs_csv};

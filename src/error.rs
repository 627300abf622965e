//! Error types for the substitute assignment engine.
//!
//! `InvalidInput` and `DataIntegrity` abort a whole run; no partial
//! recommendation list is ever returned. A period with no free teacher
//! is not an error (see [`crate::Recommendation::is_unresolvable`]).

use thiserror::Error;

use crate::store::StoreError;
use crate::validation::IntegrityIssue;

/// Error category, for callers that only need to branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-supplied input is unusable (empty absentee set, unknown override).
    InvalidInput,
    /// The timetable snapshot references ids it does not contain.
    DataIntegrity,
    /// Engine configuration could not be read or is out of range.
    Config,
    /// The persistence collaborator refused a bundle.
    Persistence,
}

/// Main error type.
#[derive(Debug, Error)]
pub enum SubstituteError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timetable integrity error ({} issue(s)): {}", .0.len(), summarize(.0))]
    DataIntegrity(Vec<IntegrityIssue>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl SubstituteError {
    /// The error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::DataIntegrity(_) => ErrorKind::DataIntegrity,
            Self::Config(_) => ErrorKind::Config,
            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Integrity issues carried by a `DataIntegrity` error.
    pub fn integrity_issues(&self) -> &[IntegrityIssue] {
        match self {
            Self::DataIntegrity(issues) => issues,
            _ => &[],
        }
    }
}

fn summarize(issues: &[IntegrityIssue]) -> String {
    match issues.first() {
        Some(first) if issues.len() > 1 => format!("{first}; ..."),
        Some(first) => first.to_string(),
        None => String::new(),
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, SubstituteError>;

use std::fmt;

use serde::Serialize;
use store_db::DbError;
use thiserror::Error;

use super::model::Nid;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_value: Option<String>,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            attempted_value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.attempted_value = Some(value.into());
        self
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of a failed service operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("validation failed: {}", summarize(.failures))]
    Validation { failures: Vec<ValidationFailure> },

    #[error("{entity} not found: {nid}")]
    NotFound { entity: &'static str, nid: Nid },

    #[error("database error: {message}")]
    Database { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(failures: Vec<ValidationFailure>) -> Self {
        Self::Validation { failures }
    }

    /// The given business identifier already belongs to another entity.
    pub fn tid_in_use(tid: &str) -> Self {
        Self::validation(vec![ValidationFailure::new(
            "tid",
            "the requested identifier is already in use",
        )
        .with_value(tid)])
    }

    pub fn not_found(entity: &'static str, nid: Nid) -> Self {
        Self::NotFound { entity, nid }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Field failures; empty for anything but a validation error.
    pub fn failures(&self) -> &[ValidationFailure] {
        match self {
            Self::Validation { failures } => failures,
            _ => &[],
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        Self::database(e.to_string())
    }
}

fn summarize(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

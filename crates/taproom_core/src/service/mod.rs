//! Resource use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, merge rules and repository calls per operation.
//! - Report absence as `None`/`false`, never as fabricated records.
//!
//! # Invariants
//! - Each mutating call is one linear lookup → apply → persist sequence.
//! - Services never retry; conflicts propagate to the caller unchanged.

use crate::model::validation::ValidationErrors;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod beer_service;
pub mod customer_service;
pub mod merge;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for resource use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// The structural validator rejected the payload.
    Validation(ValidationErrors),
    /// The record changed between lookup and write.
    Conflict { id: Uuid, expected_version: u32 },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::Conflict {
                id,
                expected_version,
            } => write!(
                f,
                "record {id} changed since version {expected_version}; reload and retry"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Conflict { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::VersionConflict {
                id,
                expected_version,
            } => Self::Conflict {
                id,
                expected_version,
            },
            other => Self::Repo(other),
        }
    }
}

/// Maps a write that lost its row mid-call to "absent".
pub(crate) fn absent_on_missing<T>(result: Result<T, RepoError>) -> ServiceResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(RepoError::NotFound(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

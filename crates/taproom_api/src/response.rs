//! Protocol-level response envelope and error-to-status mapping.
//!
//! # Invariants
//! - Every handler outcome becomes exactly one `ApiResponse`; nothing panics.
//! - Validation failures carry every violation as `[{field: message}]`.
//! - Error bodies never echo record content back, only messages.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use taproom_core::db::DbError;
use taproom_core::{RepoError, ServiceError, UnknownBeerStyle, ValidationErrors};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Response returned by every boundary handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    /// Set only on successful creates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: STATUS_OK,
            location: None,
            body: Some(body),
        }
    }

    pub fn created(location: String) -> Self {
        Self {
            status: STATUS_CREATED,
            location: Some(location),
            body: None,
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: STATUS_NO_CONTENT,
            location: None,
            body: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: STATUS_NOT_FOUND,
            location: None,
            body: None,
        }
    }

    fn with_message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            location: None,
            body: Some(json!({ "message": message.into() })),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure raised while handling one boundary call.
#[derive(Debug)]
pub enum ApiError {
    /// Path id is not a UUID.
    InvalidId(String),
    /// Request body is not the expected JSON shape.
    MalformedBody(serde_json::Error),
    UnknownStyle(UnknownBeerStyle),
    Service(ServiceError),
    /// The backing database could not be opened or checked.
    Storage(String),
    /// A result could not be rendered as JSON.
    Render(serde_json::Error),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(raw) => write!(f, "invalid id `{raw}`"),
            Self::MalformedBody(err) => write!(f, "malformed request body: {err}"),
            Self::UnknownStyle(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Storage(message) => write!(f, "storage unavailable: {message}"),
            Self::Render(err) => write!(f, "response rendering failed: {err}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedBody(err) | Self::Render(err) => Some(err),
            Self::UnknownStyle(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::InvalidId(_) | Self::Storage(_) => None,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<UnknownBeerStyle> for ApiError {
    fn from(value: UnknownBeerStyle) -> Self {
        Self::UnknownStyle(value)
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Service(ServiceError::from(value))
    }
}

impl ApiError {
    /// Status code this failure is reported with.
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidId(_)
            | Self::MalformedBody(_)
            | Self::UnknownStyle(_)
            | Self::Service(ServiceError::Validation(_)) => STATUS_BAD_REQUEST,
            Self::Service(ServiceError::Conflict { .. }) => STATUS_CONFLICT,
            Self::Service(ServiceError::Repo(_)) | Self::Storage(_) | Self::Render(_) => {
                STATUS_INTERNAL_ERROR
            }
        }
    }
}

impl From<ApiError> for ApiResponse {
    fn from(value: ApiError) -> Self {
        let status = value.status();
        match value {
            ApiError::Service(ServiceError::Validation(errors)) => Self {
                status,
                location: None,
                body: Some(violations_body(&errors)),
            },
            other => Self::with_message(status, other.to_string()),
        }
    }
}

/// Renders violations as a list of single-entry `{field: message}` objects.
pub fn violations_body(errors: &ValidationErrors) -> Value {
    Value::Array(
        errors
            .violations()
            .iter()
            .map(|violation| {
                let mut entry = Map::new();
                entry.insert(
                    violation.field.to_string(),
                    Value::String(violation.message.clone()),
                );
                Value::Object(entry)
            })
            .collect(),
    )
}

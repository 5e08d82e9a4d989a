//! Error types for the bookstore server

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::repository::StoreError;

/// Application error codes reported in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    StorageFailure = 1,
    NoSuchBook = 2,
    DuplicateIsbn = 3,
    BadValue = 4,
    Unavailable = 5,
}

/// What is wrong with a single payload field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// Key is not part of the recognized field set for the intent
    UnknownField,
    /// Required field absent from a create payload
    MissingField,
    /// Explicit null on a field that cannot be cleared
    NotNullable,
    WrongType { expected: &'static str },
    Empty,
    OutOfRange { constraint: &'static str },
    Malformed { expected: &'static str },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::UnknownField => write!(f, "is not a recognized field"),
            Problem::MissingField => write!(f, "is required"),
            Problem::NotNullable => write!(f, "cannot be null"),
            Problem::WrongType { expected } => write!(f, "must be {}", expected),
            Problem::Empty => write!(f, "cannot be empty"),
            Problem::OutOfRange { constraint } => write!(f, "must be {}", constraint),
            Problem::Malformed { expected } => write!(f, "must be {}", expected),
        }
    }
}

/// A problem attached to the field that caused it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub problem: Problem,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, problem: Problem) -> Self {
        Self {
            field: field.into(),
            problem,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.field, self.problem)
    }
}

/// Rejection of a create or update payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("{}", join_violations(.0))]
    Fields(Vec<FieldViolation>),
}

impl ValidationError {
    /// Offending fields, empty when the payload was not an object at all
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ValidationError::NotAnObject => &[],
            ValidationError::Fields(violations) => violations,
        }
    }

    /// Names of the offending fields, in report order
    pub fn fields(&self) -> Vec<&str> {
        self.violations().iter().map(|v| v.field.as_str()).collect()
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Per-field entry of an error body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorDetail {
    pub field: String,
    pub problem: String,
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = Vec::new();
        let (status, code, message) = match &self {
            AppError::Validation(err) => {
                details = err
                    .violations()
                    .iter()
                    .map(|v| ErrorDetail {
                        field: v.field.clone(),
                        problem: v.problem.to_string(),
                    })
                    .collect();
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, err.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::DuplicateIsbn, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure,
                    "Storage error".to_string(),
                )
            }
            AppError::Unavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::Unavailable,
                    msg.clone(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

//!
//! # Error Handling
//!
//! `AppError` is the single error type shared by the persistence gateway, the auth gate and
//! the HTTP handlers. It implements `actix_web::error::ResponseError`, so a handler returning
//! `Result<_, AppError>` is translated into a status code and a `{"error": ...}` JSON body.
//!
//! `From` implementations for `sqlx::Error`, `sqlx::migrate::MigrateError`,
//! `validator::ValidationErrors` and `jsonwebtoken::errors::Error` let callers use `?`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed, expired or badly signed token, or an unknown login identity (HTTP 401).
    Unauthorized(String),
    /// A malformed request: unreadable body, missing identifier, id mismatch (HTTP 400).
    BadRequest(String),
    /// The requested id does not resolve to a record (HTTP 404).
    NotFound(String),
    /// A field constraint failed or a task item references an owner that does not exist (HTTP 400).
    ValidationError(String),
    /// An update matched no row although the row still exists.
    /// Not retried; surfaced to the caller as a server error (HTTP 500).
    Conflict(String),
    /// Any other failure reported by the store (HTTP 500).
    DatabaseError(String),
    /// An unexpected server-side error, e.g. token signing failure (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Concurrency Conflict: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            // Server-side details go to the log, not to the client.
            AppError::Conflict(_) | AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                log::error!("{}", self);
                "Internal server error".to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`. Foreign-key and check constraint violations mean the
/// request carried data the store refuses, so they become `ValidationError`. Everything else
/// is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::ValidationError("Referenced user does not exist".into())
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                AppError::ValidationError(db_err.message().to_string())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("Failed to apply migrations: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`,
/// keeping the per-field messages.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Any failure to decode or verify a JWT is an authentication failure.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and represent
//! various error conditions, from validation failures to persistence problems.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly convert
//! application errors into appropriate HTTP responses with JSON bodies of the shape
//! `{"error": "..."}`. It also provides `From` trait implementations for common error
//! types like `validator::ValidationErrors`, `jsonwebtoken::errors::Error`,
//! `bcrypt::BcryptError`, and `store::StoreError`, allowing for easy conversion
//! using the `?` operator.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Input violated a data-model constraint (HTTP 400). Carries the violated
    /// constraint(s) so the client can see what to fix.
    Validation(String),
    /// An update payload contained a field outside the allow-list (HTTP 400).
    InvalidOperation,
    /// A resource identifier in the path was not structurally valid (HTTP 400).
    InvalidId,
    /// Login failed (HTTP 400). Deliberately carries no detail: the response
    /// must not reveal whether the email or the password was wrong.
    InvalidCredentials,
    /// The request could not be tied to a live session (HTTP 401).
    Unauthenticated(String),
    /// An avatar upload was rejected before or during image normalization (HTTP 400).
    InvalidUpload(String),
    /// The requested resource is absent, or not owned by the requester (HTTP 404).
    NotFound(String),
    /// An unexpected server-side failure (HTTP 500). The message is logged but
    /// never sent to the client.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::InvalidOperation => write!(f, "Invalid operation"),
            AppError::InvalidId => write!(f, "Invalid id"),
            AppError::InvalidCredentials => write!(f, "Unable to login"),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::InvalidUpload(msg) => write!(f, "Invalid upload: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation allows Actix Web to automatically translate `AppError`
/// results from handlers into the correct HTTP status codes and JSON error bodies.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::InvalidOperation => HttpResponse::BadRequest().json(json!({
                "error": "Invalid operation"
            })),
            AppError::InvalidId => HttpResponse::BadRequest().json(json!({
                "error": "Invalid id"
            })),
            AppError::InvalidCredentials => HttpResponse::BadRequest().json(json!({
                "error": "Unable to login"
            })),
            AppError::Unauthenticated(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::InvalidUpload(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Internal(msg) => {
                // Detail stays on the server; the client gets a fixed body.
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Server error"
                }))
            }
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// The detailed per-field messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Internal`.
///
/// Token verification failures are treated as unexpected conditions and surface
/// as 500, not as a clean 401. Only a missing header or a revoked session
/// produces a 401.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Internal(format!("token verification failed: {}", error))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("password hashing failed: {}", error))
    }
}

/// Converts `StoreError` into `AppError`.
///
/// Duplicate-email rejections are client errors; a missing record maps to
/// `NotFound`; anything else is an internal persistence failure.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateEmail => AppError::Validation("Email already in use".into()),
            StoreError::NotFound => AppError::NotFound("Record not found".into()),
            StoreError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

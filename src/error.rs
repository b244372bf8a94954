//!
//! # Custom Error Handling
//!
//! This module defines the `AppError` type returned by every handler, extractor and
//! middleware in the application.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so a failed handler turns into
//! an HTTP status plus a JSON body of the form `{"message": "..."}`. Server-side failures
//! are logged with their detail and reported to the client as a generic `"Server error"`.
//! `From` implementations for `StoreError`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error` and `bcrypt::BcryptError` allow the `?` operator to be
//! used throughout.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::store::{StoreError, USERS_EMAIL_CONSTRAINT};

/// Message sent to clients for every 5xx response.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed or is required but missing (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Malformed request, such as a body that is not valid JSON (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// The request collides with existing state, e.g. an email that is already
    /// registered (HTTP 400).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The requested resource does not exist (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// A well-formed body failed field validation (HTTP 400).
    #[error("Validation Error: {0}")]
    ValidationError(String),
    /// Unexpected server-side failure (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// The store could not complete an operation (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::Conflict(_) | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg.as_str(),
            // Never put internal detail on the wire.
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                SERVER_ERROR_MESSAGE
            }
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

/// Duplicate keys become `Conflict`; every other store failure is a `DatabaseError`.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Duplicate(constraint) if constraint == USERS_EMAIL_CONSTRAINT => {
                AppError::Conflict("Email already exists".into())
            }
            StoreError::Duplicate(constraint) => {
                log::warn!("unique constraint {} violated", constraint);
                AppError::Conflict("Resource already exists".into())
            }
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {:?}", error.kind());
        AppError::Unauthorized("Invalid token".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

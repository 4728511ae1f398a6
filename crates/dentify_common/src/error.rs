// --- File: crates/dentify_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Dentify errors.
///
/// This enum provides a common set of error variants that can be used across all crates.
/// Each crate can extend this by implementing From<SpecificError> for DentifyError.
#[derive(Error, Debug)]
pub enum DentifyError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for DentifyError {
    fn status_code(&self) -> u16 {
        match self {
            DentifyError::HttpError(_) => 500,
            DentifyError::ParseError(_) => 400,
            DentifyError::ConfigError(_) => 500,
            DentifyError::ValidationError(_) => 400,
            DentifyError::DatabaseError(_) => 500,
            DentifyError::ExternalServiceError { .. } => 502,
            DentifyError::ConflictError(_) => 409,
            DentifyError::NotFoundError(_) => 404,
            DentifyError::TimeoutError(_) => 504,
            DentifyError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, DentifyError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, DentifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, DentifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| DentifyError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, DentifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| DentifyError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for DentifyError {
    fn from(err: reqwest::Error) -> Self {
        DentifyError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for DentifyError {
    fn from(err: serde_json::Error) -> Self {
        DentifyError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for DentifyError {
    fn from(err: std::io::Error) -> Self {
        DentifyError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> DentifyError {
    DentifyError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> DentifyError {
    DentifyError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> DentifyError {
    DentifyError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> DentifyError {
    DentifyError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> DentifyError {
    DentifyError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> DentifyError {
    DentifyError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_classes() {
        assert_eq!(validation_error("bad date").status_code(), 400);
        assert_eq!(conflict("slot taken").status_code(), 409);
        assert_eq!(not_found("appointment").status_code(), 404);
        assert_eq!(external_service_error("calendar", "timeout").status_code(), 502);
        assert_eq!(internal_error("boom").status_code(), 500);
    }

    #[test]
    fn context_wraps_source_error() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::other("disk gone"));
        let err = result.context("saving appointment").unwrap_err();
        assert!(err.to_string().contains("saving appointment"));
        assert!(err.to_string().contains("disk gone"));
    }
}

//! # AppError
//!
//! Centralized error handling for the Rusty-Blog client.
//! The gateway surfaces whatever the transport gives it; stores never
//! classify failures, they log and hand them back unchanged.

use thiserror::Error;

/// The primary error type for all rb-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// No HTTP response at all (DNS, connection refused, timeout)
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    /// Covers expired sessions, missing resources and validation failures alike.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected backend shape
    #[error("malformed response: {0}")]
    Decode(String),

    /// Invalid or missing client configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP status of the failed call, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized Result type for Rusty-Blog logic.
pub type Result<T> = std::result::Result<T, AppError>;

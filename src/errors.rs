//! # Application Error Types
//!
//! This module defines common error types used throughout the allergen scanner.
//! The matching engine itself never fails; these errors only surface at the
//! boundaries (configuration, persistence, serialization).

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Allergen list storage errors
    Storage(String),
    /// JSON encoding/decoding errors
    Serialization(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Storage(msg) => write!(f, "[STORAGE] {}", msg),
            AppError::Serialization(msg) => write!(f, "[SERIALIZATION] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    /// Log allergen list storage errors with the path involved
    pub fn log_storage_error(
        error: &impl std::fmt::Display,
        operation: &str,
        path: Option<&str>,
        allergen_count: Option<usize>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            path = ?path,
            allergen_count = ?allergen_count,
            "Allergen storage operation failed"
        );
    }

    /// Log internal application errors with component context
    pub fn log_internal_error(error: &impl std::fmt::Display, component: &str, operation: &str) {
        error!(
            error = %error,
            component = %component,
            operation = %operation,
            "Internal application error"
        );
    }
}

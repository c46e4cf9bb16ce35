//! Error types and handling infrastructure for padgate.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types and `anyhow` for application-level error handling with context.
//!
//! Note that the input hot paths never surface errors: a missing gateway, an
//! unavailable mask, an illegal action, or an unresolvable key are all defined
//! branches that produce notifications (see [`crate::protocol`]). The variants
//! here cover the one system edge that can actually fail: binding persistence.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for padgate operations.
#[derive(Error, Debug)]
pub enum PadgateError {
    /// Reading a persisted binding file failed at the filesystem level.
    #[error("Binding file unreadable: {path}")]
    BindingFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted binding data was present but not valid JSON for the table shape.
    #[error("Binding data malformed: {message}")]
    BindingDataMalformed { message: String },
}

/// Standard Result type for padgate operations.
pub type Result<T> = std::result::Result<T, PadgateError>;

impl PadgateError {
    /// Create a BindingDataMalformed error with a descriptive message.
    pub fn malformed_bindings(message: impl Into<String>) -> Self {
        Self::BindingDataMalformed {
            message: message.into(),
        }
    }
}

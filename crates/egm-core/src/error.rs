//! Unified error types for the EGM ecosystem
//!
//! This module provides a common error type [`EgmError`] that can represent
//! errors from any part of the system. Domain-specific failures are mapped
//! onto a small taxonomy so callers can handle them uniformly at API
//! boundaries.
//!
//! # Example
//!
//! ```ignore
//! use egm_core::{EgmError, EgmResult};
//!
//! fn load_and_report(path: &str) -> EgmResult<()> {
//!     let dataset = load_dataset(path)?;
//!     run_reports(&dataset)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all EGM operations.
///
/// Every variant represents a local, recoverable condition; there is no
/// retry or global recovery logic in this core. The embedding application
/// translates these into user-visible messages.
#[derive(Error, Debug)]
pub enum EgmError {
    /// I/O errors (file access, permissions, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or out-of-range generation parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Referential-integrity violation detected during assembly or load
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// A query was asked to analyze an entity absent from the dataset
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persisted file is malformed or carries an incompatible schema version
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using EgmError.
pub type EgmResult<T> = Result<T, EgmError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for EgmError {
    fn from(err: anyhow::Error) -> Self {
        EgmError::Other(err.to_string())
    }
}

impl From<String> for EgmError {
    fn from(s: String) -> Self {
        EgmError::Other(s)
    }
}

impl From<&str> for EgmError {
    fn from(s: &str) -> Self {
        EgmError::Other(s.to_string())
    }
}

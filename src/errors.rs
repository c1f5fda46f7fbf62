/*!
 * Error types for the halcor application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with the corpus store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error from the underlying SQLite database
    #[error("Database error: {0}")]
    Database(String),

    /// Error when a requested record does not exist
    #[error("Record not found: {entity} {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier that missed
        id: String,
    },

    /// Error when an update payload fails validation
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Error when stored data cannot be decoded into its in-memory form
    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord {
        /// Identifier of the unreadable record
        id: String,
        /// Decoding failure detail
        reason: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound {
                entity: "row",
                id: String::new(),
            },
            other => Self::Database(other.to_string()),
        }
    }
}

/// Errors that can abort a batch recalculation run.
///
/// Write failures for individual pairs are not in here: those are
/// collected into the run report and never abort the batch.
#[derive(Error, Debug)]
pub enum RecalcError {
    /// Error while reading the selected pairs from the store
    #[error("Fetch failed: {0}")]
    Fetch(#[from] StoreError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the corpus store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from batch recalculation
    #[error("Recalculation error: {0}")]
    Recalc(#[from] RecalcError),

    /// Error in user-supplied configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

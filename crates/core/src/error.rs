// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for issues-core operations.

use thiserror::Error;

/// All possible errors that can occur in issues-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid issue id: '{0}'\n  hint: ids are 24 lowercase hexadecimal characters")]
    InvalidId(String),

    #[error("invalid value '{value}' for field '{field}'")]
    InvalidFilter { field: String, value: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    /// Returns true if the error was caused by caller input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidId(_) | Error::InvalidFilter { .. })
    }
}

/// A specialized Result type for issues-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

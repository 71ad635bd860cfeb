//! Unified error types and result handling.

use thiserror::Error;

/// Every failure the tracker can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is inconsistent.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The store could not be opened or prepared.
    #[error("Database error: {0}")]
    Database(String),

    /// A statement failed against the store.
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),

    /// User input was rejected before reaching the store.
    #[error("Invalid input: {message}")]
    Validation {
        /// Message shown to the user
        message: String,
    },

    /// I/O failure (export path, temporary chart files, stdin).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the delimited export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The TOML configuration file has a syntax or shape error.
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A chart could not be produced.
    #[error("Chart error: {message}")]
    Chart {
        /// What went wrong
        message: String,
    },

    /// The printable report could not be assembled.
    #[error("Report error: {message}")]
    Report {
        /// What went wrong
        message: String,
    },
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

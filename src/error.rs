//! Error types for the roster scheduler.

use thiserror::Error;

/// Main error type for roster scheduling operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// An input record is malformed (missing name, invalid date, negative cap).
    /// Fails fast, before model construction.
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// An internal invariant was violated while constructing variables or
    /// constraints (duplicate person name, index out of range). A bug, not a
    /// data problem.
    #[error("model build error: {0}")]
    ModelBuild(String),

    /// The underlying CP/SAT solver reported an internal failure.
    #[error("solver error: {0}")]
    Solver(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure reading or writing a collaborator artifact (CSV/JSON).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing/writing failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failure.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for roster scheduling operations.
pub type Result<T> = std::result::Result<T, RosterError>;

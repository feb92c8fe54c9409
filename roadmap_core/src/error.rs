//! Error types for the roadmap_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for roadmap_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Curriculum validation error
    #[error("Curriculum validation error: {0}")]
    CurriculumValidation(String),

    /// Session transition attempted from a state that forbids it.
    /// Recoverable: the session is left unchanged.
    #[error("Session guard: {0}")]
    SessionGuard(String),

    /// Answer payload rejected at the boundary
    #[error("Invalid answer: {0}")]
    Answer(String),

    /// State management error
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

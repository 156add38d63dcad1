//! Error types for the fiscal assistant.
//!
//! This module defines a unified error enum covering every error category
//! in the service: configuration, I/O, input validation, LLM, search index,
//! agent orchestration and serialization.
//!
//! Refusals (wrong language, off-topic question) are not errors. They are
//! ordinary answers produced by the pipeline.

use thiserror::Error;

/// Unified error type for the fiscal assistant.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad input shape or length
    #[error("Validation error: {0}")]
    Validation(String),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Search index errors (absorbed by the ranker, surfaced by health checks)
    #[error("Search index error: {0}")]
    Search(String),

    /// Conversational agent errors
    #[error("Agent error: {0}")]
    Agent(String),

    /// Prompt rendering and loading errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

/*!
 * Error types for the lexitra application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with generation-service APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// The prompt exceeded the service's context window
    #[error("Context overflow: {0}")]
    ContextOverflow(String),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The service replied with an empty or unusable completion
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl ProviderError {
    /// Whether the request may succeed if simply sent again
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::ConnectionError(_) | ProviderError::RequestFailed(_))
    }
}

/// Errors that can occur while assembling translated entries
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error from the generation service
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The prompt template could not be loaded or is malformed
    #[error("Prompt template error: {0}")]
    Template(String),

    /// A required corpus file is missing or unreadable
    #[error("Corpus error: {0}")]
    Corpus(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the assembly pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Error in the configuration file
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

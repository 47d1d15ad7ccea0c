/*!
 * Error types for the booktrans application.
 *
 * This module contains custom error types for different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a generation service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The requested model is not available on the service
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The request exceeded the client timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

impl ProviderError {
    /// Whether this error makes the service unusable for the rest of the run.
    ///
    /// Connection loss, a missing model and timeouts abort the whole run;
    /// everything else only consumes one attempt for the current chunk.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError(_) | Self::ModelNotFound(_) | Self::Timeout(_)
        )
    }

    /// Operator-facing guidance for fatal errors
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::ConnectionError(_) | Self::Timeout(_) => {
                Some("generation service unreachable - check that it is running (e.g. `ollama serve`)")
            }
            Self::ModelNotFound(_) => {
                Some("requested model is not available - pull it first (e.g. `ollama pull <model>`)")
            }
            _ => None,
        }
    }
}

/// Errors that can occur while driving the translation pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Fatal transport-level failure; the run is aborted
    #[error("Transport failure, run aborted: {0}")]
    Transport(#[from] ProviderError),

    /// Progress or result file could not be written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Invalid pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),
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

    /// Error from the pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

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

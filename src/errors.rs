/*!
 * Error types for the subgen application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a transcription service
#[derive(Error, Debug)]
pub enum TranscriberError {
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
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while running external media tools
#[derive(Error, Debug)]
pub enum MediaError {
    /// The external tool binary could not be started
    #[error("Failed to launch {tool}: {message}")]
    LaunchFailed {
        /// Tool name
        tool: String,
        /// Underlying error text
        message: String,
    },

    /// The tool ran but exited with a failure status
    #[error("{tool} failed: {diagnostic}")]
    ToolFailed {
        /// Tool name
        tool: String,
        /// Filtered stderr from the tool
        diagnostic: String,
    },

    /// The tool did not finish within the allotted time
    #[error("{tool} timed out after {seconds}s")]
    Timeout {
        /// Tool name
        tool: String,
        /// Timeout that was exceeded
        seconds: u64,
    },
}

/// Errors that can occur in the job registry
#[derive(Error, Debug)]
pub enum JobError {
    /// No job with the given id
    #[error("Job not found: {0}")]
    NotFound(String),

    /// A lifecycle transition that is not allowed
    #[error("Invalid job state transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state
        from: String,
        /// Requested state
        to: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the transcription service
    #[error("Transcriber error: {0}")]
    Transcriber(#[from] TranscriberError),

    /// Error from an external media tool
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Error from the job registry
    #[error("Job error: {0}")]
    Job(#[from] JobError),

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

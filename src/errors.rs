/*!
 * Error types for the clipfab application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
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

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while building a display timeline
#[derive(Error, Debug, PartialEq)]
pub enum TimelineError {
    /// The narration duration was zero or negative
    #[error("Invalid narration duration: {0} (must be > 0)")]
    InvalidDuration(f64),

    /// No visual assets were supplied, so no timeline can be produced
    #[error("No assets available to build a timeline")]
    NoAssetsAvailable,
}

/// Errors that can occur while rendering the final video
#[derive(Error, Debug)]
pub enum RenderError {
    /// ffmpeg could not be executed at all
    #[error("Failed to launch ffmpeg: {0}")]
    LaunchFailed(String),

    /// ffmpeg exited with a non-zero status
    #[error("ffmpeg failed: {0}")]
    EncodingFailed(String),

    /// The render did not finish within the allowed time
    #[error("Rendering timed out after {0} seconds")]
    Timeout(u64),
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

    /// Error from timeline construction
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Error from video rendering
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

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

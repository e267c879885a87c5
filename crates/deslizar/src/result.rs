//! Result and error types for Deslizar.

use thiserror::Error;

/// Result type for Deslizar operations
pub type DeslizarResult<T> = Result<T, DeslizarError>;

/// Errors that can occur in Deslizar
#[derive(Debug, Error)]
pub enum DeslizarError {
    /// Slider reports a value domain with `max <= min`
    #[error("Degenerate slider range: min={min}, max={max}")]
    DegenerateRange {
        /// Reported minimum
        min: f64,
        /// Reported maximum
        max: f64,
    },

    /// Bounding box never became available within the retry budget
    #[error("Slider geometry unavailable after {attempts} attempt(s)")]
    GeometryUnavailable {
        /// Attempts consumed before giving up
        attempts: u32,
    },

    /// Attribute read failed at the transport level
    #[error("Failed to read attribute '{name}': {message}")]
    AttributeUnreadable {
        /// Attribute name
        name: String,
        /// Error message
        message: String,
    },

    /// Attribute value did not parse as a number
    #[error("Attribute '{name}' is not numeric: '{value}'")]
    AttributeNotNumeric {
        /// Attribute name
        name: String,
        /// Raw attribute value
        value: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Slider element not found on the page
    #[error("No slider matched selector '{selector}'")]
    SliderNotFound {
        /// Selector used for the lookup
        selector: String,
    },

    /// Input simulation error
    #[error("Pointer dispatch failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

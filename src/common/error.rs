//! Error types for the end-to-end suites
//!
//! Assertion failures are ordinary test verdicts and keep the run going;
//! every other variant is an infrastructure problem that aborts it.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the end-to-end suites
#[derive(Error, Debug)]
pub enum Error {
    // === Browser/Driver Errors ===
    #[error("chromedriver not found on PATH. Install it or pass --webdriver-url to use a running WebDriver server")]
    ChromedriverNotFound,

    #[error("chromedriver did not accept connections on port {0} in time")]
    ChromedriverSpawnTimeout(u16),

    #[error("Xvfb not found on PATH but a virtual display was requested")]
    XvfbNotFound,

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    // === API Errors ===
    #[error("API login failed for '{username}': {message}")]
    ApiLoginFailed { username: String, message: String },

    #[error("API request '{endpoint}' failed: {message}")]
    ApiRequestFailed { endpoint: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // === Assertion Errors ===
    #[error("Assertion failed: {0}")]
    Assertion(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    /// Create an assertion failure
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(message.into())
    }

    /// Create an API request failed error
    pub fn api_request_failed(endpoint: &str, message: &str) -> Self {
        Self::ApiRequestFailed {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }

    /// True for failures the harness records and moves past
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

/// Fail the current test case unless the condition holds
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::Assertion(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_is_recordable() {
        assert!(Error::assertion("boom").is_assertion());
        assert!(!Error::ChromedriverNotFound.is_assertion());
    }

    #[test]
    fn test_ensure_carries_message() {
        assert!(ensure(true, "unused").is_ok());
        let err = ensure(false, "two pugs expected").unwrap_err();
        assert_eq!(err.to_string(), "Assertion failed: two pugs expected");
    }
}

//! Error types for the OrangeHRM E2E suite

use std::path::PathBuf;

use thiserror::Error;

use crate::credentials::Expectation;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("WebDriver failed to start: {0}")]
    DriverStartup(String),

    #[error("WebDriver status check failed after {0} attempts")]
    DriverHealthCheck(usize),

    #[error("Timeout after {seconds}s waiting for: {what}")]
    Timeout { what: String, seconds: u64 },

    #[error("Option '{target}' not found in {field} after {attempts} key presses")]
    OptionNotFound {
        field: String,
        target: String,
        attempts: usize,
    },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("No credential row with expected={expected} in {}", path.display())]
    NoCredentialRow { expected: Expectation, path: PathBuf },

    #[error("Invalid credential file {}: {reason}", path.display())]
    Credentials { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl E2eError {
    /// True for failures of the bounded wait primitive
    pub fn is_timeout(&self) -> bool {
        matches!(self, E2eError::Timeout { .. })
    }
}

pub type E2eResult<T> = Result<T, E2eError>;

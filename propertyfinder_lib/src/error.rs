//! Error types for the library layer.

use thiserror::Error;

/// Why the embedded `__NEXT_DATA__` document could not be obtained from a page.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// No `__NEXT_DATA__` script element, or it was empty.
    #[error("embedded page data not found")]
    Absent,
    /// The script element held text that is not valid JSON.
    #[error("embedded page data is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    /// The fixed element locator could not be compiled.
    #[error("invalid page data locator: {0}")]
    Locator(String),
}

/// A decoded search page does not have the shape the site guarantees.
#[derive(Error, Debug)]
#[error("search page does not match the expected layout: {0}")]
pub struct ContractError(#[from] pub serde_json::Error);

/// Failure to map a detail document onto a [`crate::DetailRecord`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A required field is missing; `path` is the full dotted path.
    #[error("missing field {path}")]
    MissingField { path: String },
    /// A field is present but holds the wrong JSON type.
    #[error("field {path} is not {expected}")]
    InvalidType { path: String, expected: &'static str },
}

impl ExtractError {
    pub fn path(&self) -> &str {
        match self {
            Self::MissingField { path } | Self::InvalidType { path, .. } => path,
        }
    }
}

/// Errors that end a crawl target early.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] propertyfinder_api::Error),
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// The task driving a target panicked or was aborted.
    #[error("crawl task failed: {0}")]
    Task(String),
}

/// Invalid or unreadable crawl configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure to persist a finished target.
#[derive(Error, Debug)]
#[error("failed to write {artifact}: {message}")]
pub struct OutputError {
    pub artifact: String,
    pub message: String,
}

/// The run could not be set up.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Client(#[from] propertyfinder_api::Error),
}

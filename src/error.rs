//! Error types for the estimator.
//!
//! The error surface is deliberately small: resolution failures (network
//! errors, timeouts, HTTP error statuses) are recorded as outcome data and
//! tallied, never raised as errors. The only conditions that abort a
//! computation are misconfiguration and a failure to construct the HTTP
//! client, both caught eagerly before any triple is processed.

use thiserror::Error;

/// Errors raised by estimator construction and configuration.
#[derive(Debug, Error)]
pub enum MetricError {
    /// A configuration value is out of range (e.g., a zero reservoir
    /// capacity or zero fetch concurrency). Validated at construction.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The underlying HTTP client could not be initialized.
    #[error("failed to initialize HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl MetricError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

//! Assessment configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before any
//! triple is processed.
//!
//! ## Recognized Variables
//!
//! - `MAX_DOMAINS` - Outer reservoir capacity: distinct pay-level domains
//!   tracked (default: 500)
//! - `MAX_URIS_PER_DOMAIN` - Inner reservoir capacity: URIs kept per
//!   domain (default: 100000)
//! - `FETCH_CONCURRENCY` - Width of the resolution worker pool
//!   (default: 16)
//! - `FETCH_TIMEOUT_SECONDS` - Global budget for the whole resolution
//!   phase; URIs unresolved at expiry count as timed out (default: 300)
//! - `REQUEST_TIMEOUT_SECONDS` - Per-request HTTP timeout (default: 10)
//! - `MAX_REDIRECT_HOPS` - Redirect chain budget per URI (default: 10)
//! - `PROBLEM_REPORTING` - Emit per-URI diagnostic records (default: false)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::Result;
use std::env;

/// Estimator configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Outer reservoir capacity (`MAX_DOMAINS`).
    pub max_domains: usize,
    /// Inner per-domain reservoir capacity (`MAX_URIS_PER_DOMAIN`).
    pub max_uris_per_domain: usize,
    /// Fixed degree of concurrency of the resolution pool.
    pub fetch_concurrency: usize,
    /// Global timeout budget for the resolution phase, in seconds.
    pub fetch_timeout_secs: u64,
    /// Per-request HTTP timeout, in seconds.
    pub request_timeout_secs: u64,
    /// Maximum redirect hops followed per URI.
    pub max_redirect_hops: usize,
    /// When true, every classified outcome is reported to the problem sink.
    pub problem_reporting: bool,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables, applying defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        let max_domains = env::var("MAX_DOMAINS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(500);

        let max_uris_per_domain = env::var("MAX_URIS_PER_DOMAIN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100_000);

        let fetch_concurrency = env::var("FETCH_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(16);

        let fetch_timeout_secs = env::var("FETCH_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let max_redirect_hops = env::var("MAX_REDIRECT_HOPS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let problem_reporting = env::var("PROBLEM_REPORTING")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Self {
            max_domains,
            max_uris_per_domain,
            fetch_concurrency,
            fetch_timeout_secs,
            request_timeout_secs,
            max_redirect_hops,
            problem_reporting,
            log_level,
            log_format,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either reservoir capacity is zero
    /// - `fetch_concurrency` is zero or above 1024
    /// - A timeout is zero
    /// - `max_redirect_hops` is zero
    /// - `log_format` is not `text` or `json`
    pub fn validate(&self) -> Result<()> {
        if self.max_domains == 0 {
            anyhow::bail!("MAX_DOMAINS must be at least 1");
        }

        if self.max_uris_per_domain == 0 {
            anyhow::bail!("MAX_URIS_PER_DOMAIN must be at least 1");
        }

        if self.fetch_concurrency == 0 || self.fetch_concurrency > 1024 {
            anyhow::bail!(
                "FETCH_CONCURRENCY must be between 1 and 1024, got {}",
                self.fetch_concurrency
            );
        }

        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("FETCH_TIMEOUT_SECONDS must be greater than 0");
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECONDS must be greater than 0");
        }

        if self.max_redirect_hops == 0 {
            anyhow::bail!("MAX_REDIRECT_HOPS must be at least 1");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Ok(())
    }

    /// Prints a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Max domains: {}", self.max_domains);
        tracing::info!("  Max URIs per domain: {}", self.max_uris_per_domain);
        tracing::info!("  Fetch concurrency: {}", self.fetch_concurrency);
        tracing::info!("  Fetch timeout budget: {}s", self.fetch_timeout_secs);
        tracing::info!("  Request timeout: {}s", self.request_timeout_secs);
        tracing::info!("  Max redirect hops: {}", self.max_redirect_hops);
        tracing::info!("  Problem reporting: {}", self.problem_reporting);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

impl Default for Config {
    /// The documented defaults, independent of the environment.
    fn default() -> Self {
        Self {
            max_domains: 500,
            max_uris_per_domain: 100_000,
            fetch_concurrency: 16,
            fetch_timeout_secs: 300,
            request_timeout_secs: 10,
            max_redirect_hops: 10,
            problem_reporting: false,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env();
    config.validate()?;
    Ok(config)
}

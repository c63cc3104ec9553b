//! # lod-deref
//!
//! A streaming estimator of URI dereferenceability for Linked Data
//! datasets too large to hold in memory.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles with clear layer
//! separation:
//!
//! - **Domain Layer** ([`domain`]) - Triples, fetch outcomes, and the
//!   pure outcome classifier
//! - **Sampling Layer** ([`sampling`]) - The generic keyed reservoir and
//!   the two-level domain/URI sampling scheme
//! - **Infrastructure Layer** ([`infrastructure`]) - Outcome cache, HTTP
//!   resolver, and the bounded-concurrency fetcher
//! - **Application Layer** ([`application`]) - The orchestrating
//!   estimator service and the problem-reporting sink
//!
//! ## How it works
//!
//! One single-threaded pass over the triple stream feeds subject and
//! object URIs into a two-level reservoir: the outer level uniformly
//! samples pay-level domains, each domain's inner level uniformly samples
//! its URIs. Memory stays bounded regardless of stream length, and large
//! domains cannot starve small ones of representation.
//!
//! The first call to `estimate()` flattens the sample and resolves it
//! concurrently over HTTP, following Linked Data dereferencing
//! conventions: redirect chains are recorded hop by hop, `303 See Other`
//! only counts when the target is parsable RDF, and hash URIs resolve
//! against their fragment-stripped base. Failures are classified and
//! tallied, never raised. The result is the estimated fraction of
//! dereferenceable URIs plus a per-outcome breakdown.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use lod_deref::prelude::*;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default();
//! let resolver = Arc::new(HttpResolver::new(Duration::from_secs(10), 10)?);
//! let mut estimator = DereferenceabilityEstimator::new(&config, resolver)?;
//!
//! estimator.observe(&Triple::new(
//!     "http://example.com/alice",
//!     "http://xmlns.com/foaf/0.1/knows",
//!     "http://example.com/bob",
//! ));
//!
//! let estimate = estimator.estimate().await;
//! println!("dereferenceable: {:.3}", estimate.ratio);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Runtime settings are loaded from environment variables via
//! [`config::Config`]. See the [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod sampling;

pub use error::MetricError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::{DereferenceabilityEstimator, Estimate, LogSink, ProblemSink};
    pub use crate::config::Config;
    pub use crate::domain::{FetchOutcome, OutcomeKind, StatusLine, Triple};
    pub use crate::error::MetricError;
    pub use crate::infrastructure::{DerefCache, HttpResolver, UriResolver};
}

//! The dereferenceability estimator service.
//!
//! Orchestrates the two strictly separated phases:
//!
//! 1. **Sampling** — single-threaded, single-pass consumption of the
//!    triple stream through [`observe`], feeding URIs into the two-level
//!    domain/URI reservoir. The stream is never materialized; memory
//!    stays bounded regardless of dataset size.
//! 2. **Resolution** — triggered once by the first [`estimate`] call:
//!    the sampled URIs are flattened, handed to the concurrent fetcher,
//!    drained through the shared cache, classified, and tallied.
//!
//! The only state crossing the phase boundary is the flattened URI set.
//!
//! [`observe`]: DereferenceabilityEstimator::observe
//! [`estimate`]: DereferenceabilityEstimator::estimate

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::domain::{OutcomeKind, Triple, is_possible_url};
use crate::error::MetricError;
use crate::infrastructure::{DerefCache, Fetcher, UriResolver};
use crate::sampling::{ReservoirSampler, Tld, extract_pay_level_domain};

use super::problems::{NullSink, ProblemSink};

/// The final result of an assessment.
///
/// `ratio` is the estimated fraction of sampled URIs that are genuinely
/// dereferenceable, in `[0, 1]`. When no URI was sampled at all the
/// ratio is 0.0 and `no_data` is set; callers must check the flag before
/// interpreting the ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub ratio: f64,
    pub total_sampled: u64,
    pub total_resolved: u64,
    pub outcome_breakdown: BTreeMap<OutcomeKind, u64>,
    pub no_data: bool,
    /// Triples considered during sampling (type assertions excluded).
    pub total_triples: u64,
    /// URI-bearing subject/object positions seen during sampling.
    pub total_resources: u64,
}

/// Running counts kept by the drain loop.
#[derive(Debug, Default)]
struct Tally {
    resolved: u64,
    breakdown: BTreeMap<OutcomeKind, u64>,
}

impl Tally {
    fn record(&mut self, kind: OutcomeKind, dereferenceable: bool) {
        *self.breakdown.entry(kind).or_insert(0) += 1;
        if dereferenceable {
            self.resolved += 1;
        }
    }
}

/// Streaming estimator of URI dereferenceability over a triple stream.
///
/// Feed the full stream through [`observe`](Self::observe), then call
/// [`estimate`](Self::estimate). The estimate is memoized: repeated calls
/// return the identical result without re-fetching.
pub struct DereferenceabilityEstimator {
    tlds: ReservoirSampler<Tld>,
    max_uris_per_domain: NonZeroUsize,
    resolver: Arc<dyn UriResolver>,
    cache: Arc<DerefCache>,
    sink: Arc<dyn ProblemSink>,
    problem_reporting: bool,
    fetch_concurrency: usize,
    timeout_budget: Duration,
    total_triples: u64,
    total_resources: u64,
    memoized: Option<Estimate>,
}

impl DereferenceabilityEstimator {
    /// Builds an estimator from a validated configuration and a resolver.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::Config`] for non-positive reservoir
    /// capacities or fetch concurrency. Validation happens here, eagerly,
    /// so a misconfigured estimator never starts sampling.
    pub fn new(config: &Config, resolver: Arc<dyn UriResolver>) -> Result<Self, MetricError> {
        let max_domains = NonZeroUsize::new(config.max_domains)
            .ok_or_else(|| MetricError::config("MAX_DOMAINS must be at least 1"))?;
        let max_uris_per_domain = NonZeroUsize::new(config.max_uris_per_domain)
            .ok_or_else(|| MetricError::config("MAX_URIS_PER_DOMAIN must be at least 1"))?;
        if config.fetch_concurrency == 0 {
            return Err(MetricError::config("FETCH_CONCURRENCY must be at least 1"));
        }

        Ok(Self {
            tlds: ReservoirSampler::new(max_domains),
            max_uris_per_domain,
            resolver,
            cache: Arc::new(DerefCache::new()),
            sink: Arc::new(NullSink),
            problem_reporting: config.problem_reporting,
            fetch_concurrency: config.fetch_concurrency,
            timeout_budget: Duration::from_secs(config.fetch_timeout_secs),
            total_triples: 0,
            total_resources: 0,
            memoized: None,
        })
    }

    /// Replaces the outcome cache with a shared handle, letting several
    /// estimators assessing the same endpoints reuse fetch results.
    pub fn with_cache(mut self, cache: Arc<DerefCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Installs a problem sink and enables reporting to it.
    pub fn with_problem_sink(mut self, sink: Arc<dyn ProblemSink>) -> Self {
        self.sink = sink;
        self.problem_reporting = true;
        self
    }

    /// Ingests one triple of the assessed dataset (sampling phase).
    ///
    /// Type assertions (`rdf:type` predicate) are skipped entirely. For
    /// every other triple, subject and object are independently checked
    /// with the cheap URI-candidate predicate; candidates are bucketed by
    /// pay-level domain and observed by that domain's inner reservoir.
    /// URIs whose authority cannot be parsed are silently excluded.
    pub fn observe(&mut self, triple: &Triple) {
        debug!(subject = %triple.subject, predicate = %triple.predicate, "assessing");

        if triple.is_type_assertion() {
            return;
        }
        self.total_triples += 1;

        for term in [&triple.subject, &triple.object] {
            if !is_possible_url(term) {
                continue;
            }
            trace!(uri = %term, "URI candidate found");
            self.total_resources += 1;
            self.sample_uri(term);
        }
    }

    fn sample_uri(&mut self, uri: &str) {
        let Some(domain) = extract_pay_level_domain(uri) else {
            return;
        };

        // Merge-by-key: a repeat sighting of a known domain must feed the
        // existing entity, never insert a duplicate that eviction could
        // split the domain's URIs across.
        if let Some(tld) = self.tlds.find_mut(&domain) {
            tld.observe_uri(uri);
        } else {
            let mut tld = Tld::new(domain, self.max_uris_per_domain);
            tld.observe_uri(uri);
            trace!(domain = tld.name(), "new pay-level domain recorded");
            self.tlds.observe(tld);
        }
    }

    /// Number of domain entities currently held by the outer reservoir.
    pub fn sampled_domain_count(&self) -> usize {
        self.tlds.len()
    }

    /// Computes (or returns the memoized) dereferenceability estimate.
    ///
    /// The first call ends the sampling phase and runs the resolution
    /// phase to completion: it may block for up to the configured batch
    /// timeout budget. Later calls return the identical cached result.
    pub async fn estimate(&mut self) -> Estimate {
        if let Some(estimate) = &self.memoized {
            return estimate.clone();
        }

        let estimate = self.resolve_sample().await;
        self.memoized = Some(estimate.clone());
        estimate
    }

    async fn resolve_sample(&mut self) -> Estimate {
        // Flatten the two-level sample into one deduplicated candidate
        // set; it is the only state handed across the phase boundary.
        let candidates: BTreeSet<String> = self
            .tlds
            .items()
            .flat_map(|tld| tld.uris().cloned())
            .collect();
        let total_sampled = candidates.len() as u64;

        if candidates.is_empty() {
            info!("no URIs sampled; reporting empty estimate");
            return Estimate {
                ratio: 0.0,
                total_sampled: 0,
                total_resolved: 0,
                outcome_breakdown: BTreeMap::new(),
                no_data: true,
                total_triples: self.total_triples,
                total_resources: self.total_resources,
            };
        }

        info!(
            uris = total_sampled,
            domains = self.tlds.len(),
            "starting resolution phase"
        );

        let fetcher = Fetcher::new(
            Arc::clone(&self.resolver),
            Arc::clone(&self.cache),
            self.fetch_concurrency,
            self.timeout_budget,
        );
        let batch = fetcher.spawn(candidates.iter().cloned().collect());

        let mut tally = Tally::default();
        for uri in &candidates {
            let outcome = self.cache.wait_for(uri).await;
            let kind = outcome.classify();
            let dereferenceable = outcome.counts_as_dereferenceable();
            tally.record(kind, dereferenceable);

            if self.problem_reporting {
                self.sink.report(uri, kind);
            }
        }

        // Every candidate is accounted for at this point; the batch task
        // only has bookkeeping left, if anything.
        if let Err(error) = batch.await {
            warn!(%error, "batch resolution task failed");
        }

        info!(
            resolved = tally.resolved,
            sampled = total_sampled,
            "resolution phase complete"
        );

        Estimate {
            ratio: tally.resolved as f64 / total_sampled as f64,
            total_sampled,
            total_resolved: tally.resolved,
            outcome_breakdown: tally.breakdown,
            no_data: false,
            total_triples: self.total_triples,
            total_resources: self.total_resources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RDF_TYPE;
    use crate::infrastructure::http::MockUriResolver;

    fn test_config() -> Config {
        Config {
            max_domains: 500,
            max_uris_per_domain: 1_000,
            fetch_concurrency: 4,
            fetch_timeout_secs: 5,
            request_timeout_secs: 1,
            max_redirect_hops: 5,
            problem_reporting: false,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }

    fn estimator() -> DereferenceabilityEstimator {
        DereferenceabilityEstimator::new(&test_config(), Arc::new(MockUriResolver::new())).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected_eagerly() {
        let mut config = test_config();
        config.max_domains = 0;
        let result = DereferenceabilityEstimator::new(&config, Arc::new(MockUriResolver::new()));
        assert!(matches!(result, Err(MetricError::Config(_))));

        let mut config = test_config();
        config.max_uris_per_domain = 0;
        assert!(
            DereferenceabilityEstimator::new(&config, Arc::new(MockUriResolver::new())).is_err()
        );

        let mut config = test_config();
        config.fetch_concurrency = 0;
        assert!(
            DereferenceabilityEstimator::new(&config, Arc::new(MockUriResolver::new())).is_err()
        );
    }

    #[test]
    fn test_type_assertions_are_skipped() {
        let mut est = estimator();
        est.observe(&Triple::new(
            "http://example.com/alice",
            RDF_TYPE,
            "http://xmlns.com/foaf/0.1/Person",
        ));

        assert_eq!(est.total_triples, 0);
        assert_eq!(est.total_resources, 0);
        assert_eq!(est.sampled_domain_count(), 0);
    }

    #[test]
    fn test_subject_and_object_counted_independently() {
        let mut est = estimator();
        est.observe(&Triple::new(
            "http://example.com/alice",
            "http://xmlns.com/foaf/0.1/knows",
            "http://other.org/bob",
        ));
        est.observe(&Triple::new(
            "http://example.com/alice",
            "http://xmlns.com/foaf/0.1/name",
            "\"Alice\"",
        ));

        assert_eq!(est.total_triples, 2);
        assert_eq!(est.total_resources, 3);
        assert_eq!(est.sampled_domain_count(), 2);
    }

    #[test]
    fn test_repeat_domain_sightings_merge() {
        let mut est = estimator();
        est.observe(&Triple::new(
            "http://a.example.com/x",
            "http://xmlns.com/foaf/0.1/knows",
            "http://b.example.com/y",
        ));

        // Both hosts bucket to example.com: one domain entity, two URIs.
        assert_eq!(est.sampled_domain_count(), 1);
        let tld = est.tlds.find(&"example.com".to_string()).unwrap();
        assert_eq!(tld.name(), "example.com");
        assert_eq!(tld.uri_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_sample_reports_no_data() {
        let mut est = estimator();
        let estimate = est.estimate().await;

        assert!(estimate.no_data);
        assert_eq!(estimate.ratio, 0.0);
        assert_eq!(estimate.total_sampled, 0);
        assert!(estimate.outcome_breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_estimate_is_memoized_and_idempotent() {
        let mut est = estimator();
        let first = est.estimate().await;
        let second = est.estimate().await;
        assert_eq!(first, second);
    }
}

//! Concurrent resolution of a sampled URI batch.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::FetchOutcome;

use super::cache::DerefCache;
use super::http::UriResolver;

/// Drives a batch of URIs through a [`UriResolver`] with bounded
/// concurrency, writing each completed [`FetchOutcome`] into the shared
/// cache.
///
/// Resolution runs as a single background task holding a fixed-width pool
/// of in-flight resolutions (`for_each_concurrent`), not one task per URI
/// — bounded resource usage and politeness toward remote hosts. The
/// caller is never blocked beyond submission.
///
/// Every submitted URI is guaranteed an outcome: either its resolution
/// completes within the batch timeout budget, or the budget expiry writes
/// a `Timeout` outcome on its behalf. URIs already present in the cache
/// are skipped and never re-fetched.
pub struct Fetcher {
    resolver: Arc<dyn UriResolver>,
    cache: Arc<DerefCache>,
    concurrency: usize,
    timeout_budget: Duration,
}

impl Fetcher {
    pub fn new(
        resolver: Arc<dyn UriResolver>,
        cache: Arc<DerefCache>,
        concurrency: usize,
        timeout_budget: Duration,
    ) -> Self {
        Self {
            resolver,
            cache,
            concurrency,
            timeout_budget,
        }
    }

    /// Submits a batch for asynchronous resolution and returns
    /// immediately. The returned handle completes when every submitted
    /// URI has an outcome in the cache.
    pub fn spawn(&self, uris: Vec<String>) -> JoinHandle<()> {
        let resolver = Arc::clone(&self.resolver);
        let cache = Arc::clone(&self.cache);
        let concurrency = self.concurrency;
        let budget = self.timeout_budget;

        tokio::spawn(async move {
            let pending: Vec<String> = uris
                .into_iter()
                .filter(|uri| !cache.contains(uri))
                .collect();

            info!(
                pending = pending.len(),
                concurrency, "starting batch resolution"
            );

            let work = stream::iter(pending.clone()).for_each_concurrent(concurrency, |uri| {
                let resolver = Arc::clone(&resolver);
                let cache = Arc::clone(&cache);
                async move {
                    let outcome = resolver.resolve(&uri).await;
                    debug!(%uri, status = ?outcome.final_status, "resolution complete");
                    cache.insert(outcome);
                }
            });

            if tokio::time::timeout(budget, work).await.is_err() {
                // Budget expired: in-flight resolutions are dropped and
                // every still-unresolved URI is recorded as timed out, so
                // the drain loop always terminates.
                let mut expired = 0usize;
                for uri in pending {
                    if cache.insert_if_absent(FetchOutcome::timed_out(uri)) {
                        expired += 1;
                    }
                }
                warn!(expired, "resolution budget expired");
            }
        })
    }
}

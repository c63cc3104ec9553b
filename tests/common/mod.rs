#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lod_deref::prelude::*;

/// Configuration with small capacities and short timeouts for tests.
pub fn test_config() -> Config {
    Config {
        max_domains: 50,
        max_uris_per_domain: 100,
        fetch_concurrency: 4,
        fetch_timeout_secs: 5,
        ..Config::default()
    }
}

pub fn ok_outcome(uri: &str) -> FetchOutcome {
    FetchOutcome::new(uri, vec![StatusLine::new(200, None)], Some(200), false)
}

pub fn see_other_outcome(uri: &str, parsable: bool) -> FetchOutcome {
    FetchOutcome::new(
        uri,
        vec![
            StatusLine::new(303, Some(format!("{uri}.rdf"))),
            StatusLine::new(200, None),
        ],
        Some(200),
        parsable,
    )
}

pub fn error_outcome(uri: &str, status: u16) -> FetchOutcome {
    FetchOutcome::new(uri, vec![StatusLine::new(status, None)], Some(status), false)
}

/// Resolver returning canned outcomes without touching the network.
///
/// URIs without a canned outcome resolve as a plain `200 OK`. Counts
/// every resolution so tests can assert on fetch behavior.
pub struct StubResolver {
    outcomes: HashMap<String, FetchOutcome>,
    pub calls: AtomicUsize,
}

impl StubResolver {
    /// Every URI resolves successfully.
    pub fn all_ok() -> Self {
        Self {
            outcomes: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Installs a canned outcome for one URI.
    pub fn with_outcome(mut self, outcome: FetchOutcome) -> Self {
        self.outcomes.insert(outcome.uri.clone(), outcome);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UriResolver for StubResolver {
    async fn resolve(&self, uri: &str) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcomes.get(uri) {
            Some(outcome) => outcome.clone(),
            None => ok_outcome(uri),
        }
    }
}

/// Resolver that stalls past any test timeout budget.
pub struct StalledResolver;

#[async_trait]
impl UriResolver for StalledResolver {
    async fn resolve(&self, uri: &str) -> FetchOutcome {
        tokio::time::sleep(Duration::from_secs(120)).await;
        ok_outcome(uri)
    }
}

/// Sink collecting every report for assertions.
pub struct RecordingSink(pub std::sync::Mutex<Vec<(String, OutcomeKind)>>);

impl RecordingSink {
    pub fn new() -> Self {
        Self(std::sync::Mutex::new(Vec::new()))
    }

    pub fn reports(&self) -> Vec<(String, OutcomeKind)> {
        self.0.lock().unwrap().clone()
    }
}

impl ProblemSink for RecordingSink {
    fn report(&self, uri: &str, kind: OutcomeKind) {
        self.0.lock().unwrap().push((uri.to_string(), kind));
    }
}

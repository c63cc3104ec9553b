//! Shared cache of resolution outcomes.
//!
//! Maps a URI to its last-known [`FetchOutcome`] so no URI is ever
//! fetched twice, and bridges the two resolution-phase roles: the worker
//! pool writes outcomes as resolutions complete, the single draining
//! consumer waits for them. The cache is handed around as an explicit
//! `Arc` handle owned by the estimator (and shareable across several
//! estimators assessing the same endpoint), never process-global state.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Notify;

use crate::domain::FetchOutcome;

/// Concurrent URI → outcome map with a wait primitive for the drain loop.
///
/// Writes and reads go through a `RwLock` held only for the duration of
/// the map operation, never across an await point. [`wait_for`] parks the
/// consumer on a [`Notify`] instead of busy-requeueing, waking on every
/// insert.
///
/// [`wait_for`]: DerefCache::wait_for
#[derive(Debug, Default)]
pub struct DerefCache {
    entries: RwLock<HashMap<String, Arc<FetchOutcome>>>,
    notify: Notify,
}

impl DerefCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers "already resolved?" without a network call.
    pub fn get(&self, uri: &str) -> Option<Arc<FetchOutcome>> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(uri)
            .cloned()
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(uri)
    }

    /// Stores a completed outcome and wakes any waiting consumer.
    pub fn insert(&self, outcome: FetchOutcome) {
        let uri = outcome.uri.clone();
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(uri, Arc::new(outcome));
        self.notify.notify_waiters();
    }

    /// Stores an outcome only if the URI has none yet. Used by the batch
    /// timeout to record `Timeout` for URIs still in flight without
    /// clobbering results that did arrive. Returns whether it stored.
    pub fn insert_if_absent(&self, outcome: FetchOutcome) -> bool {
        let inserted = {
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            match entries.entry(outcome.uri.clone()) {
                std::collections::hash_map::Entry::Occupied(_) => false,
                std::collections::hash_map::Entry::Vacant(v) => {
                    v.insert(Arc::new(outcome));
                    true
                }
            }
        };
        if inserted {
            self.notify.notify_waiters();
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Suspends until an outcome for `uri` is present, then returns it.
    ///
    /// Termination relies on the fetcher's guarantee that every submitted
    /// URI eventually gets an outcome written, by resolution or by the
    /// batch timeout filler.
    pub async fn wait_for(&self, uri: &str) -> Arc<FetchOutcome> {
        let mut notified = std::pin::pin!(self.notify.notified());
        loop {
            if let Some(outcome) = self.get(uri) {
                return outcome;
            }
            // Register interest before the re-check so an insert landing
            // between the check and the await cannot be missed.
            notified.as_mut().enable();
            if let Some(outcome) = self.get(uri) {
                return outcome;
            }
            notified.as_mut().await;
            notified.set(self.notify.notified());
        }
    }
}

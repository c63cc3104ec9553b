//! HTTP resolution of single URIs.
//!
//! [`UriResolver`] is the seam between the fetcher's concurrency machinery
//! and the actual network: production uses [`HttpResolver`] over reqwest,
//! tests substitute canned outcomes. A resolver never fails — every
//! network condition is encoded into the returned [`FetchOutcome`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION, USER_AGENT};
use reqwest::redirect::Policy;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, trace};
use url::Url;

use crate::domain::{FetchOutcome, StatusLine};
use crate::error::MetricError;

/// Media types accepted as parsable RDF serializations.
const RDF_MEDIA_TYPES: &[&str] = &[
    "application/rdf+xml",
    "application/x-turtle",
    "text/turtle",
    "application/n-triples",
    "application/n-quads",
    "text/n3",
    "text/rdf+n3",
    "application/ld+json",
    "application/trig",
];

/// Content-negotiation header sent with every request, preferring RDF
/// serializations but accepting anything for classification purposes.
const RDF_ACCEPT: &str = "application/rdf+xml, text/turtle, application/n-triples, \
                          application/ld+json, text/n3;q=0.9, */*;q=0.1";

const AGENT: &str = concat!("lod-deref/", env!("CARGO_PKG_VERSION"));

/// Resolves one URI into its complete fetch outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UriResolver: Send + Sync {
    /// Performs the resolution. Infallible by contract: failures are
    /// data, encoded in the outcome, never errors.
    async fn resolve(&self, uri: &str) -> FetchOutcome;
}

/// Production resolver following Linked Data dereferencing conventions.
///
/// Automatic redirect following is disabled on the client so every hop's
/// status and `Location` can be recorded; the hop loop re-issues requests
/// manually up to a configured budget. Hash URIs are resolved against the
/// fragment-stripped base (the hash-URI convention identifies a resource
/// within a document), while the recorded outcome keeps the original URI.
pub struct HttpResolver {
    client: reqwest::Client,
    max_hops: usize,
}

impl HttpResolver {
    /// Builds the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::HttpClient`] if the TLS backend or client
    /// configuration cannot be initialized.
    pub fn new(request_timeout: Duration, max_hops: usize) -> Result<Self, MetricError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(request_timeout)
            .build()?;

        Ok(Self { client, max_hops })
    }

    /// Sends one GET, retrying transient connection failures with jittered
    /// exponential backoff. Timeouts and HTTP-level responses are not
    /// retried; they are legitimate outcomes.
    async fn request(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        let strategy = ExponentialBackoff::from_millis(100).map(jitter).take(2);

        RetryIf::spawn(
            strategy,
            || {
                self.client
                    .get(url)
                    .header(ACCEPT, RDF_ACCEPT)
                    .header(USER_AGENT, AGENT)
                    .send()
            },
            |err: &reqwest::Error| err.is_connect(),
        )
        .await
    }
}

#[async_trait]
impl UriResolver for HttpResolver {
    async fn resolve(&self, uri: &str) -> FetchOutcome {
        let mut current = strip_fragment(uri).to_string();
        let mut status_lines: Vec<StatusLine> = Vec::new();
        let mut final_status = None;
        let mut parsable = false;
        let mut timed_out = false;

        for hop in 0..=self.max_hops {
            let response = match self.request(&current).await {
                Ok(response) => response,
                Err(err) if err.is_timeout() => {
                    debug!(uri, hop, "request timed out");
                    timed_out = true;
                    break;
                }
                Err(err) => {
                    debug!(uri, hop, error = %err, "request failed");
                    break;
                }
            };

            let status = response.status().as_u16();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            trace!(uri, hop, status, location = location.as_deref(), "hop recorded");
            status_lines.push(StatusLine::new(status, location.clone()));
            final_status = Some(status);

            if response.status().is_redirection() {
                match location.and_then(|target| join_location(&current, &target)) {
                    Some(next) => {
                        current = next;
                        continue;
                    }
                    // Redirect without a usable target: chain ends here.
                    None => break,
                }
            }

            parsable = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(is_rdf_media_type);
            break;
        }

        let mut outcome = FetchOutcome::new(uri, status_lines, final_status, parsable);
        outcome.timed_out = timed_out;
        outcome
    }
}

/// Strips the `#fragment` part of a hash URI, keeping the document base
/// that is actually requested over HTTP.
pub fn strip_fragment(uri: &str) -> &str {
    match uri.find('#') {
        Some(pos) => &uri[..pos],
        None => uri,
    }
}

/// Resolves a `Location` header value (possibly relative) against the URL
/// of the response that carried it.
fn join_location(base: &str, target: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    Some(base.join(target).ok()?.to_string())
}

/// Whether a `Content-Type` value names a parsable RDF serialization.
/// Parameters (charset etc.) are ignored.
fn is_rdf_media_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    RDF_MEDIA_TYPES.contains(&media_type.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fragment() {
        assert_eq!(
            strip_fragment("http://example.com/doc#me"),
            "http://example.com/doc"
        );
        assert_eq!(strip_fragment("http://example.com/doc"), "http://example.com/doc");
    }

    #[test]
    fn test_join_relative_location() {
        assert_eq!(
            join_location("http://example.com/resource", "/doc/resource"),
            Some("http://example.com/doc/resource".to_string())
        );
        assert_eq!(
            join_location("http://example.com/resource", "http://other.org/x"),
            Some("http://other.org/x".to_string())
        );
        assert_eq!(join_location("not a url", "/x"), None);
    }

    #[test]
    fn test_rdf_media_types() {
        assert!(is_rdf_media_type("text/turtle"));
        assert!(is_rdf_media_type("application/rdf+xml; charset=UTF-8"));
        assert!(is_rdf_media_type("Application/LD+JSON"));
        assert!(!is_rdf_media_type("text/html"));
        assert!(!is_rdf_media_type("application/json"));
        assert!(!is_rdf_media_type(""));
    }
}

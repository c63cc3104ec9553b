//! Fetch outcomes and their dereferenceability classification.
//!
//! A [`FetchOutcome`] is the immutable record of one resolution attempt:
//! every redirect hop with its status and `Location` target, the final
//! status, and whether the final response carried an RDF media type.
//! Classification into an [`OutcomeKind`] is a pure function of that
//! record, so it can be unit tested without any network involvement.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// One hop of a resolution: the HTTP status and, for redirects, the
/// `Location` target it pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub status: u16,
    pub location: Option<String>,
}

impl StatusLine {
    pub fn new(status: u16, location: Option<String>) -> Self {
        Self { status, location }
    }
}

/// The complete, immutable result of resolving one URI.
///
/// Created once by the fetcher when a resolution completes (successfully,
/// by exhausting the redirect budget, or by timing out) and cached keyed
/// by the original URI. Hash URIs are resolved against their
/// fragment-stripped base, but `uri` keeps the original identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchOutcome {
    /// The URI as it appeared in the dataset, fragment included.
    pub uri: String,
    /// Every recorded hop, in request order.
    pub status_lines: Vec<StatusLine>,
    /// Status of the last response received, if any response arrived.
    pub final_status: Option<u16>,
    /// Whether the final response advertised an RDF media type.
    pub content_parsable_as_rdf: bool,
    /// Whether the resolution hit a per-request or batch timeout.
    pub timed_out: bool,
    pub retrieved_at: DateTime<Utc>,
}

impl FetchOutcome {
    pub fn new(
        uri: impl Into<String>,
        status_lines: Vec<StatusLine>,
        final_status: Option<u16>,
        content_parsable_as_rdf: bool,
    ) -> Self {
        Self {
            uri: uri.into(),
            status_lines,
            final_status,
            content_parsable_as_rdf,
            timed_out: false,
            retrieved_at: Utc::now(),
        }
    }

    /// Outcome for a URI whose host never produced a response.
    pub fn unreachable(uri: impl Into<String>) -> Self {
        Self::new(uri, Vec::new(), None, false)
    }

    /// Outcome recorded when a resolution did not finish in time, either
    /// per-request or because the batch timeout budget expired.
    pub fn timed_out(uri: impl Into<String>) -> Self {
        Self {
            timed_out: true,
            ..Self::new(uri, Vec::new(), None, false)
        }
    }

    /// Classifies this outcome into its [`OutcomeKind`].
    ///
    /// The kind is keyed off the first status in the recorded chain:
    /// a URI answering `303 → 200` is a See Other dereference, one
    /// answering `301 → 200` is a permanent-redirect dereference, and so
    /// on. Timeouts and response-less failures take precedence over any
    /// partially recorded chain.
    pub fn classify(&self) -> OutcomeKind {
        if self.timed_out {
            return OutcomeKind::Timeout;
        }

        let Some(first) = self.status_lines.first() else {
            return OutcomeKind::Unreachable;
        };

        match first.status {
            200..=299 => OutcomeKind::Ok200,
            301 => OutcomeKind::MovedPermanently301,
            302 => OutcomeKind::Found302,
            303 => {
                if self.content_parsable_as_rdf {
                    OutcomeKind::SeeOther303WithParsableContent
                } else {
                    OutcomeKind::SeeOther303WithoutParsableContent
                }
            }
            307 => OutcomeKind::TemporaryRedirect307,
            300..=399 => OutcomeKind::OtherRedirect3xx,
            400..=499 => OutcomeKind::ClientError4xx,
            500..=599 => OutcomeKind::ServerError5xx,
            // 1xx or out-of-range statuses: a malformed exchange.
            _ => OutcomeKind::Unreachable,
        }
    }

    /// Whether this outcome counts as a valid dereference under Linked
    /// Data conventions.
    ///
    /// True exactly for a direct success, a redirect chain that
    /// terminates in a success, and a `303 See Other` whose target is
    /// itself parsable RDF. A 303 leading to non-RDF content does NOT
    /// count: the redirect convention is only meaningful when the target
    /// document describes the resource.
    pub fn counts_as_dereferenceable(&self) -> bool {
        match self.classify() {
            OutcomeKind::Ok200 | OutcomeKind::SeeOther303WithParsableContent => true,
            OutcomeKind::MovedPermanently301
            | OutcomeKind::Found302
            | OutcomeKind::TemporaryRedirect307
            | OutcomeKind::OtherRedirect3xx => matches!(self.final_status, Some(200..=299)),
            _ => false,
        }
    }
}

/// Closed set of resolution outcome kinds.
///
/// Mirrors the status-code taxonomy of LOD dereferenceability
/// assessments: the interesting distinction is not the raw status but
/// which redirect convention (if any) the publisher used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OutcomeKind {
    Ok200,
    MovedPermanently301,
    Found302,
    SeeOther303WithParsableContent,
    SeeOther303WithoutParsableContent,
    TemporaryRedirect307,
    OtherRedirect3xx,
    ClientError4xx,
    ServerError5xx,
    Unreachable,
    Timeout,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok200 => "Ok200",
            Self::MovedPermanently301 => "MovedPermanently301",
            Self::Found302 => "Found302",
            Self::SeeOther303WithParsableContent => "SeeOther303WithParsableContent",
            Self::SeeOther303WithoutParsableContent => "SeeOther303WithoutParsableContent",
            Self::TemporaryRedirect307 => "TemporaryRedirect307",
            Self::OtherRedirect3xx => "OtherRedirect3xx",
            Self::ClientError4xx => "ClientError4xx",
            Self::ServerError5xx => "ServerError5xx",
            Self::Unreachable => "Unreachable",
            Self::Timeout => "Timeout",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

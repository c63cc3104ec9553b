//! Advisory reporting of per-URI resolution outcomes.

use tracing::{debug, warn};

use crate::domain::OutcomeKind;

/// Sink for per-URI diagnostic records emitted during the drain loop.
///
/// Purely advisory: the estimator consumes no return value and calls it
/// only when problem reporting is enabled. Implementations must be
/// thread-safe but are always invoked from the single draining consumer.
///
/// # Implementations
///
/// - [`LogSink`] - reports through `tracing`
/// - [`NullSink`] - no-op for disabled reporting
pub trait ProblemSink: Send + Sync {
    fn report(&self, uri: &str, kind: OutcomeKind);
}

/// Reports outcomes through the tracing pipeline: warnings for
/// non-dereferenceable outcomes, debug records otherwise.
pub struct LogSink;

impl ProblemSink for LogSink {
    fn report(&self, uri: &str, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Ok200 | OutcomeKind::SeeOther303WithParsableContent => {
                debug!(uri, kind = %kind, "resolved");
            }
            _ => warn!(uri, kind = %kind, "dereferenceability problem"),
        }
    }
}

/// A sink that discards every report.
///
/// Used when problem reporting is disabled, so the drain loop can call
/// the sink unconditionally.
pub struct NullSink;

impl ProblemSink for NullSink {
    fn report(&self, _uri: &str, _kind: OutcomeKind) {}
}

//! Application layer: the estimator service and its reporting sink.

pub mod estimator;
pub mod problems;

pub use estimator::{DereferenceabilityEstimator, Estimate};
pub use problems::{LogSink, NullSink, ProblemSink};

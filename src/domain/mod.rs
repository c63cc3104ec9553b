//! Core domain types: triples, fetch outcomes, and their classification.

pub mod outcome;
pub mod triple;

pub use outcome::{FetchOutcome, OutcomeKind, StatusLine};
pub use triple::{Triple, is_possible_url, RDF_TYPE};

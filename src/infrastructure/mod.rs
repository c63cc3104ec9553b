//! Resolution infrastructure: the outcome cache, the HTTP resolver, and
//! the bounded-concurrency fetcher that connects them.

pub mod cache;
pub mod fetcher;
pub mod http;

pub use cache::DerefCache;
pub use fetcher::Fetcher;
pub use http::{HttpResolver, UriResolver};

//! Two-level reservoir sampling over pay-level domains and their URIs.
//!
//! The outer reservoir bounds how many distinct domains are tracked; each
//! [`Tld`]'s inner reservoir independently bounds the URIs kept per
//! domain. The split keeps one or two massive domains from starving the
//! sample of representation from small ones, while bounding memory on
//! both axes.

pub mod reservoir;
pub mod tld;

pub use reservoir::{Keyed, ReservoirSampler};
pub use tld::{Tld, extract_pay_level_domain};

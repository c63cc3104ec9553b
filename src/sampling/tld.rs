//! Pay-level domain extraction and the per-domain URI reservoir.

use std::num::NonZeroUsize;

use url::{Host, Url};

use super::reservoir::{Keyed, ReservoirSampler};

/// Second-level public suffixes under which the registrable domain spans
/// three labels (`news.bbc.co.uk` → `bbc.co.uk`). A compact table of the
/// suffixes commonly seen in Linked Data datasets; hosts under suffixes
/// not listed here fall back to the last two labels.
const SECOND_LEVEL_SUFFIXES: &[&str] = &[
    "ac.at", "ac.jp", "ac.nz", "ac.uk", "ac.za", "co.il", "co.in", "co.jp", "co.kr", "co.nz",
    "co.uk", "co.za", "com.ar", "com.au", "com.br", "com.cn", "com.mx", "com.sg", "com.tr",
    "com.tw", "edu.au", "edu.cn", "gov.au", "gov.cn", "gov.uk", "ne.jp", "net.au", "net.cn",
    "or.jp", "org.au", "org.cn", "org.nz", "org.uk",
];

/// Extracts the registrable (pay-level) domain from a URI.
///
/// Bucketing is by administrative authority, not exact host:
/// `http://a.b.example.com/x` and `https://example.com/y` both map to
/// `example.com`. IP-address hosts and single-label hosts (`localhost`)
/// are returned verbatim. Returns `None` when the URI has no parseable
/// authority; such URIs are silently excluded from sampling.
pub fn extract_pay_level_domain(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;

    match url.host()? {
        Host::Ipv4(_) | Host::Ipv6(_) => Some(url.host_str()?.to_string()),
        Host::Domain(host) => {
            let host = host.trim_end_matches('.');
            if host.is_empty() {
                return None;
            }

            let labels: Vec<&str> = host.split('.').collect();
            if labels.len() <= 2 {
                return Some(host.to_ascii_lowercase());
            }

            let last_two = labels[labels.len() - 2..].join(".");
            let span = if SECOND_LEVEL_SUFFIXES.contains(&last_two.as_str()) {
                3
            } else {
                2
            };

            Some(labels[labels.len() - span..].join(".").to_ascii_lowercase())
        }
    }
}

/// One observed pay-level domain and its bounded sample of URIs.
///
/// Owned exclusively by the outer domain reservoir: created on first
/// sighting, its inner reservoir mutated on every later sighting, and
/// discarded wholesale (inner reservoir included) on eviction.
#[derive(Debug)]
pub struct Tld {
    name: String,
    uris: ReservoirSampler<String>,
}

impl Tld {
    pub fn new(name: impl Into<String>, max_uris: NonZeroUsize) -> Self {
        Self {
            name: name.into(),
            uris: ReservoirSampler::new(max_uris),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feeds one fully-qualified URI into this domain's inner reservoir.
    pub fn observe_uri(&mut self, uri: &str) {
        self.uris.observe(uri.to_string());
    }

    /// The sampled URIs currently held for this domain.
    pub fn uris(&self) -> impl Iterator<Item = &String> {
        self.uris.items()
    }

    pub fn uri_count(&self) -> usize {
        self.uris.len()
    }
}

impl Keyed for Tld {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        assert_eq!(
            extract_pay_level_domain("http://example.com/resource"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_subdomains_bucket_to_same_domain() {
        let a = extract_pay_level_domain("http://a.b.example.com/x");
        let b = extract_pay_level_domain("https://example.com/y");
        assert_eq!(a, Some("example.com".to_string()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_second_level_suffix() {
        assert_eq!(
            extract_pay_level_domain("http://news.bbc.co.uk/article"),
            Some("bbc.co.uk".to_string())
        );
        assert_eq!(
            extract_pay_level_domain("https://data.gov.uk/dataset"),
            Some("data.gov.uk".to_string())
        );
    }

    #[test]
    fn test_host_case_is_normalized() {
        assert_eq!(
            extract_pay_level_domain("http://WWW.Example.COM/x"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_ip_hosts_returned_verbatim() {
        assert_eq!(
            extract_pay_level_domain("http://192.168.1.1/resource"),
            Some("192.168.1.1".to_string())
        );
        assert_eq!(
            extract_pay_level_domain("http://[::1]/resource"),
            Some("[::1]".to_string())
        );
    }

    #[test]
    fn test_single_label_host() {
        assert_eq!(
            extract_pay_level_domain("http://localhost:3000/x"),
            Some("localhost".to_string())
        );
    }

    #[test]
    fn test_unparseable_uri_has_no_domain() {
        assert_eq!(extract_pay_level_domain("not a uri"), None);
        assert_eq!(extract_pay_level_domain("http://"), None);
    }

    #[test]
    fn test_tld_bounds_inner_reservoir() {
        let mut tld = Tld::new("example.com", NonZeroUsize::new(3).unwrap());
        for i in 0..100 {
            tld.observe_uri(&format!("http://example.com/r{i}"));
        }
        assert_eq!(tld.uri_count(), 3);
    }
}

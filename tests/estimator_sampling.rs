mod common;

use std::sync::Arc;

use common::{StubResolver, test_config};
use lod_deref::prelude::*;

fn knows(subject: &str, object: &str) -> Triple {
    Triple::new(subject, "http://xmlns.com/foaf/0.1/knows", object)
}

#[test]
fn test_domain_count_stays_bounded() {
    let mut config = test_config();
    config.max_domains = 10;

    let mut estimator =
        DereferenceabilityEstimator::new(&config, Arc::new(StubResolver::all_ok())).unwrap();

    // 5000 triples across 50 distinct registrable domains.
    for i in 0..5_000 {
        let domain = i % 50;
        estimator.observe(&knows(
            &format!("http://domain{domain}.org/s{i}"),
            &format!("http://domain{domain}.org/o{i}"),
        ));
    }

    assert_eq!(estimator.sampled_domain_count(), 10);
}

#[test]
fn test_subdomains_merge_into_one_domain_entity() {
    let mut estimator =
        DereferenceabilityEstimator::new(&test_config(), Arc::new(StubResolver::all_ok()))
            .unwrap();

    estimator.observe(&knows("http://a.b.example.com/x", "https://example.com/y"));
    estimator.observe(&knows("http://www.example.com/z", "\"literal\""));

    assert_eq!(estimator.sampled_domain_count(), 1);
}

#[test]
fn test_non_uri_terms_are_excluded() {
    let mut estimator =
        DereferenceabilityEstimator::new(&test_config(), Arc::new(StubResolver::all_ok()))
            .unwrap();

    estimator.observe(&knows("_:blank", "\"literal\""));
    estimator.observe(&knows("urn:isbn:0451450523", "//scheme.relative/x"));

    assert_eq!(estimator.sampled_domain_count(), 0);
}

#[tokio::test]
async fn test_sampled_uris_deduplicate_across_positions() {
    // The same URI appearing in many triples resolves once.
    let resolver = Arc::new(StubResolver::all_ok());
    let mut estimator =
        DereferenceabilityEstimator::new(&test_config(), resolver.clone()).unwrap();

    for _ in 0..10 {
        estimator.observe(&knows("http://example.com/hub", "http://example.com/hub"));
    }

    let estimate = estimator.estimate().await;

    assert_eq!(estimate.total_sampled, 1);
    assert_eq!(resolver.call_count(), 1);
    // Every observed position still counted toward the resource total.
    assert_eq!(estimate.total_resources, 20);
}

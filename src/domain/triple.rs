//! Triple model and URI candidate detection for the sampling phase.

/// Predicate URI of an `rdf:type` assertion.
///
/// Instance declarations (`?s a ?o`) are excluded from sampling: their
/// objects are almost always vocabulary terms rather than dereferenceable
/// data identifiers, and counting them would skew the domain distribution
/// toward a handful of ontology hosts.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// A single subject/predicate/object statement from the assessed dataset.
///
/// All three terms are opaque strings; the estimator performs no RDF
/// parsing or validation beyond the cheap URI candidate check below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Returns true when the predicate is `rdf:type`.
    pub fn is_type_assertion(&self) -> bool {
        self.predicate == RDF_TYPE
    }
}

/// Cheap syntactic test for "looks like an absolute HTTP(S) URI".
///
/// This is intentionally not a full URI-grammar validation: the sampling
/// phase runs once per term on high-volume streams and must stay cheap.
/// A term is a candidate when it starts with `http://` or `https://` and
/// carries a non-empty authority component.
///
/// Scheme-relative references (`//example.com/x`) and non-HTTP schemes
/// (`urn:`, `ftp://`, blank node labels, literals) are not candidates:
/// only HTTP(S) identifiers can be dereferenced by this metric, so
/// admitting anything else would only inflate the non-resolvable tally.
pub fn is_possible_url(term: &str) -> bool {
    let rest = term
        .strip_prefix("http://")
        .or_else(|| term.strip_prefix("https://"));

    match rest {
        Some(authority) => !authority.is_empty() && !authority.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_assertion_detected() {
        let triple = Triple::new(
            "http://example.com/alice",
            RDF_TYPE,
            "http://xmlns.com/foaf/0.1/Person",
        );
        assert!(triple.is_type_assertion());
    }

    #[test]
    fn test_non_type_predicate() {
        let triple = Triple::new(
            "http://example.com/alice",
            "http://xmlns.com/foaf/0.1/knows",
            "http://example.com/bob",
        );
        assert!(!triple.is_type_assertion());
    }

    #[test]
    fn test_possible_url_http() {
        assert!(is_possible_url("http://example.com/resource"));
    }

    #[test]
    fn test_possible_url_https() {
        assert!(is_possible_url("https://example.com"));
    }

    #[test]
    fn test_possible_url_hash_uri() {
        assert!(is_possible_url("http://example.com/doc#me"));
    }

    #[test]
    fn test_literal_is_not_candidate() {
        assert!(!is_possible_url("\"Alice\""));
        assert!(!is_possible_url("42"));
    }

    #[test]
    fn test_blank_node_is_not_candidate() {
        assert!(!is_possible_url("_:b0"));
    }

    #[test]
    fn test_non_http_scheme_is_not_candidate() {
        assert!(!is_possible_url("urn:isbn:0451450523"));
        assert!(!is_possible_url("ftp://example.com/file"));
        assert!(!is_possible_url("mailto:alice@example.com"));
    }

    #[test]
    fn test_scheme_relative_is_not_candidate() {
        assert!(!is_possible_url("//example.com/resource"));
    }

    #[test]
    fn test_empty_authority_is_not_candidate() {
        assert!(!is_possible_url("http://"));
        assert!(!is_possible_url("http:///path-only"));
    }
}

//! Query filter validation and encoding.
//!
//! The sets of recognized parameters and methods are fixed by the Onionoo
//! protocol. Both are validated before a request URL is ever built, so a bad
//! filter or method name never reaches the network.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Caller-supplied query filter: parameter name to value, one value per key.
///
/// Constructed per request and consumed once; the client keeps no reference
/// to it between calls.
pub type QueryParameters = HashMap<String, String>;

/// Query parameter names recognized by the Onionoo service.
pub const PARAMETERS: [&str; 18] = [
    "type",
    "running",
    "search",
    "lookup",
    "fingerprint",
    "country",
    "as",
    "flag",
    "first_seen_days",
    "last_seen_days",
    "contact",
    "family",
    "fields",
    "order",
    "offset",
    "limit",
    "host_name",
    "recommended_version",
];

/// Document types served by the Onionoo service, used as URL path segments.
pub const METHODS: [&str; 6] = [
    "summary",
    "details",
    "bandwidth",
    "weights",
    "clients",
    "uptime",
];

/// Checks that every key of the query filter is a recognized parameter.
///
/// An absent or empty filter is always valid.
pub fn validate_parameters(query: Option<&QueryParameters>) -> Result<()> {
    let Some(query) = query else {
        return Ok(());
    };

    for key in query.keys() {
        if !PARAMETERS.contains(&key.as_str()) {
            return Err(Error::InvalidParameter(key.clone()));
        }
    }

    Ok(())
}

/// Checks that the method name is non-empty and one of [`METHODS`].
pub fn validate_method(method: &str) -> Result<()> {
    if method.is_empty() {
        return Err(Error::EmptyMethod);
    }

    if !METHODS.contains(&method) {
        return Err(Error::UnknownMethod(method.to_string()));
    }

    Ok(())
}

/// Serializes the query filter into a URL query string.
///
/// Pairs are rendered as `key=value` joined by `&`, in no guaranteed order
/// (key order does not affect server-side query semantics). Values are NOT
/// percent-encoded: this preserves the wire behavior the Onionoo query parser
/// is documented against. A free-text value containing `&` or `=` (e.g. in
/// `search`) will therefore not round-trip; callers are expected to pass
/// values in the service's own query syntax.
pub fn encode_query(query: Option<&QueryParameters>) -> String {
    let Some(query) = query else {
        return String::new();
    };

    query
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

// =============================================================================
// Tests
// =============================================================================

//! Request execution and the typed per-document accessors.
//!
//! [`Client::execute`] is the single choke point every request flows through:
//! it validates the query filter and method name, builds the request URL,
//! negotiates gzip transport encoding and conditional retrieval, and decodes
//! the JSON body into the caller's result shape. The six document accessors
//! are thin façades over it, one per Onionoo method.

use crate::error::{Error, Result};
use crate::query::{encode_query, validate_method, validate_parameters, QueryParameters};
use crate::schema::{Bandwidth, Clients, Details, Summary, Uptime, Weights};

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::time::Duration;
use tracing::debug;
use ureq::http::{HeaderMap, StatusCode};
use ureq::Agent;

/// Base URL of the Onionoo service.
pub const ONIONOO_URL: &str = "https://onionoo.torproject.org";

/// Major version of the Onionoo protocol this client targets.
pub const ONIONOO_VERSION_MAJOR: u32 = 2;

/// Minor version of the Onionoo protocol this client targets.
pub const ONIONOO_VERSION_MINOR: u32 = 6;

/// Outcome of one conditional fetch.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    /// Decoded document, or `None` when the server answered 304 Not Modified.
    pub data: Option<T>,
    /// Value of the `Last-Modified` response header, empty when absent.
    ///
    /// Pass this back as the conditional token on the next poll of the same
    /// query to skip re-transferring unchanged data. It is always the
    /// server-supplied value, never an echo of the caller's token.
    pub last_modified: String,
}

impl<T> Fetched<T> {
    /// True when the server reported no change since the supplied token.
    pub fn is_not_modified(&self) -> bool {
        self.data.is_none()
    }
}

/// Client for the Onionoo telemetry API.
///
/// Stateless between calls: no cache, no retry, no conditional-token
/// persistence. Each invocation is one independent GET round trip, so a
/// single client may be shared across threads freely.
///
/// # Example
///
/// ```rust,ignore
/// use onionoo::{Client, QueryParameters};
///
/// let client = Client::new();
/// let query = QueryParameters::from([("running".to_string(), "true".to_string())]);
///
/// let fetched = client.details(Some(&query), "")?;
/// if let Some(details) = &fetched.data {
///     println!("{} running relays", details.relays.len());
/// }
///
/// // Later: poll with the returned token, skipping unchanged data.
/// let again = client.details(Some(&query), &fetched.last_modified)?;
/// if again.is_not_modified() {
///     println!("nothing new");
/// }
/// ```
pub struct Client {
    agent: Agent,
    base_url: String,
}

impl Client {
    /// Client for the production Onionoo service.
    pub fn new() -> Self {
        Self::with_base_url(ONIONOO_URL)
    }

    /// Client against an alternative service address, e.g. a mirror.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            agent: Agent::new_with_defaults(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client for the production service with a global deadline applied to
    /// every round trip.
    pub fn with_timeout(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            base_url: ONIONOO_URL.to_string(),
        }
    }

    /// Returns a summary document: short overview of relays and bridges.
    pub fn summary(
        &self,
        query: Option<&QueryParameters>,
        if_modified_since: &str,
    ) -> Result<Fetched<Summary>> {
        self.execute("summary", query, if_modified_since)
    }

    /// Returns a details document: full relay and bridge data.
    pub fn details(
        &self,
        query: Option<&QueryParameters>,
        if_modified_since: &str,
    ) -> Result<Fetched<Details>> {
        self.execute("details", query, if_modified_since)
    }

    /// Returns a bandwidth document: read/write history graphs.
    pub fn bandwidth(
        &self,
        query: Option<&QueryParameters>,
        if_modified_since: &str,
    ) -> Result<Fetched<Bandwidth>> {
        self.execute("bandwidth", query, if_modified_since)
    }

    /// Returns a weights document: path-selection probability graphs.
    pub fn weights(
        &self,
        query: Option<&QueryParameters>,
        if_modified_since: &str,
    ) -> Result<Fetched<Weights>> {
        self.execute("weights", query, if_modified_since)
    }

    /// Returns a clients document: estimated bridge client counts.
    pub fn clients(
        &self,
        query: Option<&QueryParameters>,
        if_modified_since: &str,
    ) -> Result<Fetched<Clients>> {
        self.execute("clients", query, if_modified_since)
    }

    /// Returns an uptime document: fractional uptime graphs.
    pub fn uptime(
        &self,
        query: Option<&QueryParameters>,
        if_modified_since: &str,
    ) -> Result<Fetched<Uptime>> {
        self.execute("uptime", query, if_modified_since)
    }

    /// Performs one validated round trip against the given method.
    ///
    /// The typed accessors all delegate here; calling it directly is only
    /// useful for decoding into a custom shape (e.g. with the `fields`
    /// parameter narrowing the response).
    pub fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        query: Option<&QueryParameters>,
        if_modified_since: &str,
    ) -> Result<Fetched<T>> {
        validate_parameters(query)?;
        validate_method(method)?;

        let url = self.request_url(method, query);
        debug!("requesting {}", url);

        let mut request = self.agent.get(&url).header("Accept-Encoding", "gzip");
        if !if_modified_since.is_empty() {
            request = request.header("If-Modified-Since", if_modified_since);
        }

        let mut response = request.call()?;

        let last_modified = header_value(response.headers(), "Last-Modified");
        if response.status() == StatusCode::NOT_MODIFIED {
            debug!("{} not modified since {}", url, if_modified_since);
            return Ok(Fetched {
                data: None,
                last_modified,
            });
        }

        let gzipped = header_value(response.headers(), "Content-Encoding")
            .eq_ignore_ascii_case("gzip");
        // Unfiltered documents run well past ureq's default body limit, so
        // read without a cap.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;

        let data = if gzipped {
            let mut plain = Vec::new();
            GzDecoder::new(body.as_slice())
                .read_to_end(&mut plain)
                .map_err(|e| Error::Decode(format!("gzip stream: {}", e)))?;
            serde_json::from_slice(&plain).map_err(|e| Error::Decode(e.to_string()))?
        } else {
            serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))?
        };

        debug!("decoded {} byte response from {}", body.len(), url);
        Ok(Fetched {
            data: Some(data),
            last_modified,
        })
    }

    fn request_url(&self, method: &str, query: Option<&QueryParameters>) -> String {
        let query_string = encode_query(query);
        if query_string.is_empty() {
            format!("{}/{}", self.base_url, method)
        } else {
            format!("{}/{}?{}", self.base_url, method, query_string)
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// Tests
// =============================================================================

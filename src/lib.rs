#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Onionoo - a typed client for the Tor network telemetry API
//!
//! [Onionoo](https://onionoo.torproject.org) is the Tor project's read-only
//! telemetry service reporting status, bandwidth, and uptime data for relays
//! and bridges. This crate wraps it in a typed request pipeline:
//!
//! - query filters and method names are validated against the protocol's
//!   fixed allow-lists before any network activity;
//! - responses are transferred gzip-compressed and decompressed transparently;
//! - conditional retrieval via `If-Modified-Since` / `Last-Modified` lets
//!   pollers skip re-transferring unchanged documents;
//! - bodies decode into per-document result shapes ([`schema`]).
//!
//! # Architecture
//!
//! - **[`client`]**: the [`Client`] with its request executor and the six
//!   typed document accessors
//! - **[`query`]**: parameter/method allow-lists, validation, query encoding
//! - **[`schema`]**: passive result shapes for the six document types
//! - **[`error`]**: the [`Error`] kinds callers match on
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use onionoo::{Client, QueryParameters};
//!
//! let client = Client::new();
//! let query = QueryParameters::from([
//!     ("search".to_string(), "flag:exit".to_string()),
//!     ("limit".to_string(), "50".to_string()),
//! ]);
//!
//! let fetched = client.summary(Some(&query), "")?;
//! if let Some(summary) = &fetched.data {
//!     for relay in &summary.relays {
//!         println!("{} {}", relay.fingerprint, relay.nickname);
//!     }
//! }
//! ```

pub mod client;
pub mod error;
pub mod query;
pub mod schema;

// =============================================================================
// Client
// =============================================================================

pub use client::{
    Client, Fetched, ONIONOO_URL, ONIONOO_VERSION_MAJOR, ONIONOO_VERSION_MINOR,
};

// =============================================================================
// Query filters
// =============================================================================

pub use query::{
    encode_query, validate_method, validate_parameters, QueryParameters, METHODS, PARAMETERS,
};

// =============================================================================
// Errors
// =============================================================================

pub use error::{Error, Result};

// =============================================================================
// Result shapes
// =============================================================================

pub use schema::{Bandwidth, Clients, Details, Summary, Uptime, Weights};

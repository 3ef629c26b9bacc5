//! Result shapes for the six Onionoo document types.
//!
//! These are passive decode targets: the client populates them from the JSON
//! body and never inspects or validates their content. Every struct takes
//! `#[serde(default)]` so partial documents (e.g. responses narrowed with the
//! `fields` parameter) still decode.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Shared shapes
// =============================================================================

/// History graph as used by the bandwidth, weights, clients, and uptime
/// documents. Data points are normalized; multiply by `factor` to obtain the
/// original value. `None` entries mark intervals without data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphHistory {
    pub first: String,
    pub last: String,
    /// Seconds between data points.
    pub interval: i64,
    pub factor: f64,
    pub count: i64,
    pub values: Vec<Option<i64>>,
}

// =============================================================================
// Summary document
// =============================================================================

/// Short overview of relays and bridges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub version: String,
    pub relays_published: String,
    pub relays: Vec<RelaySummary>,
    pub bridges_published: String,
    pub bridges: Vec<BridgeSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySummary {
    #[serde(rename = "n")]
    pub nickname: String,
    #[serde(rename = "f")]
    pub fingerprint: String,
    #[serde(rename = "a")]
    pub addresses: Vec<String>,
    #[serde(rename = "r")]
    pub running: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSummary {
    #[serde(rename = "n")]
    pub nickname: String,
    #[serde(rename = "h")]
    pub hashed_fingerprint: String,
    #[serde(rename = "r")]
    pub running: bool,
}

// =============================================================================
// Details document
// =============================================================================

/// Detailed relay and bridge data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Details {
    pub version: String,
    pub build_revision: Option<String>,
    pub relays_published: String,
    pub relays: Vec<RelayDetails>,
    pub bridges_published: String,
    pub bridges: Vec<BridgeDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayDetails {
    pub nickname: String,
    pub fingerprint: String,
    pub or_addresses: Vec<String>,
    pub exit_addresses: Vec<String>,
    pub dir_address: Option<String>,
    pub last_seen: String,
    pub last_changed_address_or_port: String,
    pub first_seen: String,
    pub running: bool,
    pub hibernating: Option<bool>,
    pub flags: Vec<String>,
    pub country: Option<String>,
    pub country_name: Option<String>,
    /// Autonomous system number, e.g. `"AS24940"`.
    #[serde(rename = "as")]
    pub asn: Option<String>,
    pub as_name: Option<String>,
    pub consensus_weight: i64,
    pub bandwidth_rate: Option<i64>,
    pub bandwidth_burst: Option<i64>,
    pub observed_bandwidth: Option<i64>,
    pub advertised_bandwidth: Option<i64>,
    pub exit_policy: Vec<String>,
    pub contact: Option<String>,
    pub platform: Option<String>,
    pub version: Option<String>,
    pub effective_family: Vec<String>,
    pub last_restarted: Option<String>,
    pub measured: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeDetails {
    pub nickname: String,
    pub hashed_fingerprint: String,
    pub or_addresses: Vec<String>,
    pub last_seen: String,
    pub first_seen: String,
    pub running: bool,
    pub flags: Vec<String>,
    pub last_restarted: Option<String>,
    pub platform: Option<String>,
    pub version: Option<String>,
    pub transports: Vec<String>,
}

// =============================================================================
// Bandwidth document
// =============================================================================

/// Bandwidth history of relays and bridges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Bandwidth {
    pub version: String,
    pub relays_published: String,
    pub relays: Vec<RelayBandwidth>,
    pub bridges_published: String,
    pub bridges: Vec<BridgeBandwidth>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayBandwidth {
    pub fingerprint: String,
    /// Written bytes per second, keyed by time period (e.g. `"1_month"`).
    pub write_history: HashMap<String, GraphHistory>,
    /// Read bytes per second, keyed by time period.
    pub read_history: HashMap<String, GraphHistory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeBandwidth {
    /// Hashed bridge fingerprint.
    pub fingerprint: String,
    pub write_history: HashMap<String, GraphHistory>,
    pub read_history: HashMap<String, GraphHistory>,
}

// =============================================================================
// Weights document
// =============================================================================

/// Path-selection probability history of relays. The bridges array is always
/// empty for this document type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub version: String,
    pub relays_published: String,
    pub relays: Vec<RelayWeights>,
    pub bridges_published: String,
    pub bridges: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayWeights {
    pub fingerprint: String,
    pub consensus_weight_fraction: HashMap<String, GraphHistory>,
    pub guard_probability: HashMap<String, GraphHistory>,
    pub middle_probability: HashMap<String, GraphHistory>,
    pub exit_probability: HashMap<String, GraphHistory>,
    pub consensus_weight: HashMap<String, GraphHistory>,
}

// =============================================================================
// Clients document
// =============================================================================

/// Estimated client counts of bridges. The relays array is always empty for
/// this document type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Clients {
    pub version: String,
    pub relays_published: String,
    pub relays: Vec<serde_json::Value>,
    pub bridges_published: String,
    pub bridges: Vec<BridgeClients>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeClients {
    /// Hashed bridge fingerprint.
    pub fingerprint: String,
    /// Average concurrent clients, keyed by time period.
    pub average_clients: HashMap<String, GraphHistory>,
}

// =============================================================================
// Uptime document
// =============================================================================

/// Fractional uptime history of relays and bridges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Uptime {
    pub version: String,
    pub relays_published: String,
    pub relays: Vec<RelayUptime>,
    pub bridges_published: String,
    pub bridges: Vec<BridgeUptime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayUptime {
    pub fingerprint: String,
    pub uptime: HashMap<String, GraphHistory>,
    /// Per-flag uptime histories, keyed by flag name, then by time period.
    pub flags: HashMap<String, HashMap<String, GraphHistory>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeUptime {
    /// Hashed bridge fingerprint.
    pub fingerprint: String,
    pub uptime: HashMap<String, GraphHistory>,
}

// =============================================================================
// Tests
// =============================================================================

//! Advisory per-server health records
//!
//! Tracks failure and recovery signals for MCP servers. This is telemetry,
//! not a circuit breaker: nothing here blocks a call. Discovery and the
//! router write to it; status surfaces read from it for degradation
//! messaging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Health record for one server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerHealth {
    /// Server name
    pub name: String,

    /// Whether the server is believed reachable
    pub available: bool,

    /// Most recent error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,

    /// When the most recent error happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error_at: Option<DateTime<Utc>>,

    /// Cumulative failure count
    pub failure_count: u32,
}

impl ServerHealth {
    fn available(name: &str) -> Self {
        Self {
            name: name.to_string(),
            available: true,
            last_error: None,
            last_error_at: None,
            failure_count: 0,
        }
    }
}

/// Shared tracker of server availability.
///
/// Servers with no record are assumed available; a record is created on
/// the first failure. `available` flips back to `true` only on an explicit
/// recovery signal.
#[derive(Default)]
pub struct HealthTracker {
    servers: RwLock<HashMap<String, ServerHealth>>,
}

impl HealthTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a server
    pub fn mark_unavailable(&self, name: &str, error: &str) {
        let mut servers = self.servers.write().unwrap_or_else(|e| e.into_inner());
        let entry = servers
            .entry(name.to_string())
            .or_insert_with(|| ServerHealth::available(name));
        entry.available = false;
        entry.last_error = Some(error.to_string());
        entry.last_error_at = Some(Utc::now());
        entry.failure_count += 1;
    }

    /// Record a recovery signal for a server
    pub fn mark_available(&self, name: &str) {
        let mut servers = self.servers.write().unwrap_or_else(|e| e.into_inner());
        let entry = servers
            .entry(name.to_string())
            .or_insert_with(|| ServerHealth::available(name));
        entry.available = true;
    }

    /// Whether a server is believed reachable (unknown servers are)
    pub fn is_available(&self, name: &str) -> bool {
        let servers = self.servers.read().unwrap_or_else(|e| e.into_inner());
        servers.get(name).map(|h| h.available).unwrap_or(true)
    }

    /// Snapshot of every tracked server, sorted by name
    pub fn all(&self) -> Vec<ServerHealth> {
        let servers = self.servers.read().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<ServerHealth> = servers.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

impl std::fmt::Debug for HealthTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let servers = self.servers.read().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("HealthTracker")
            .field("tracked", &servers.len())
            .finish()
    }
}

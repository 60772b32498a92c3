//! On-disk cassette layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session of port interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable cassette name.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit of the working tree that produced the recording.
    pub commit: String,
    /// Interactions in recording order.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One call made through a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position in the whole recording, starting at 0.
    pub seq: u64,
    /// Port name (e.g., `"chat_model"`).
    pub port: String,
    /// Method name on the port (e.g., `"send"`).
    pub method: String,
    /// Serialized request.
    pub input: serde_json::Value,
    /// `{"Ok": value}` or `{"Err": "message"}`.
    pub output: serde_json::Value,
}

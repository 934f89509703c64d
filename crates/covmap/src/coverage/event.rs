//! Coverage Event Records
//!
//! An [`EventRecord`] is one emitted log entry: its topics plus the encoded
//! data payload. Records arrive as JSON objects with `0x` hex strings, either
//! as one JSON array or one object per line.

use super::ids::strip_hex_prefix;
use super::Topic;
use crate::result::{CovmapError, CovmapResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One emitted log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Topics attached to the entry
    pub topics: Vec<Topic>,
    /// Encoded payload
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

impl EventRecord {
    /// Create a record from topics and payload
    #[must_use]
    pub fn new(topics: Vec<Topic>, data: Vec<u8>) -> Self {
        Self { topics, data }
    }

    /// Create a record carrying a single topic
    #[must_use]
    pub fn with_topic(topic: Topic, data: Vec<u8>) -> Self {
        Self::new(vec![topic], data)
    }
}

/// Parse an event log
///
/// Accepts a JSON array of records, or JSON lines with one record per
/// non-blank line. Fields other than `topics` and `data` are ignored.
pub fn parse_event_log(input: &str) -> CovmapResult<Vec<EventRecord>> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(CovmapError::from))
        .collect()
}

/// Read and parse an event log file
pub fn read_event_log(path: &Path) -> CovmapResult<Vec<EventRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_event_log(&content)
}

/// Decode a `0x` hex payload
pub fn decode_hex_payload(input: &str) -> CovmapResult<Vec<u8>> {
    hex::decode(strip_hex_prefix(input)).map_err(|e| CovmapError::invalid_hex(input, e.to_string()))
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::decode_hex_payload(&raw).map_err(serde::de::Error::custom)
    }
}

//! Data channel contracts consumed by widget descriptors.
//!
//! Channels are published by the robot controller and addressed by path
//! (`nt:/SmartDashboard/Speed`). The workspace store never reads channels itself: it only
//! records which paths widgets are bound to. Transport lives outside this crate.

pub mod match_time;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use match_time::{Alliance, GameData2026, MatchPeriod, MatchTime, MatchTimeError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ChannelValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    StringArray(Vec<String>),
    Struct { type_name: String, bytes: Vec<u8> },
}

impl ChannelValue {
    /// Type name used by descriptors to declare which channels they accept.
    pub fn type_name(&self) -> &str {
        match self {
            ChannelValue::Boolean(_) => "boolean",
            ChannelValue::Integer(_) => "int",
            ChannelValue::Double(_) => "double",
            ChannelValue::String(_) => "string",
            ChannelValue::StringArray(_) => "string[]",
            ChannelValue::Struct { type_name, .. } => type_name,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ChannelValue::Integer(v) => Some(*v as f64),
            ChannelValue::Double(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub path: String,
    pub timestamp_us: i64,
    pub value: ChannelValue,
}

impl ChannelRecord {
    pub fn new(path: impl Into<String>, timestamp_us: i64, value: ChannelValue) -> Self {
        Self {
            path: path.into(),
            timestamp_us,
            value,
        }
    }
}

/// Source of live channel data.
pub trait ChannelSupplier {
    /// Latest record published on `path`.
    fn record(&self, path: &str) -> Option<ChannelRecord>;

    /// Records on `path` no older than `lookback_secs` before the latest one, oldest first.
    fn history(&self, path: &str, lookback_secs: f64) -> Vec<ChannelRecord>;
}

/// In-memory supplier, used by tests and offline tooling.
#[derive(Debug, Default, Clone)]
pub struct MemoryChannels {
    records: BTreeMap<String, Vec<ChannelRecord>>,
}

impl MemoryChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, record: ChannelRecord) {
        let records = self.records.entry(record.path.clone()).or_default();
        let at = records.partition_point(|r| r.timestamp_us <= record.timestamp_us);
        records.insert(at, record);
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl ChannelSupplier for MemoryChannels {
    fn record(&self, path: &str) -> Option<ChannelRecord> {
        self.records.get(path)?.last().cloned()
    }

    fn history(&self, path: &str, lookback_secs: f64) -> Vec<ChannelRecord> {
        let Some(records) = self.records.get(path) else {
            return Vec::new();
        };
        let Some(latest) = records.last() else {
            return Vec::new();
        };

        let window_us = (lookback_secs.max(0.0) * 1_000_000.0) as i64;
        let oldest = latest.timestamp_us.saturating_sub(window_us);
        records
            .iter()
            .filter(|r| r.timestamp_us >= oldest)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/channel/channels.rs"]
mod tests;

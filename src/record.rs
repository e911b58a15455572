//! Device telemetry records as delivered by the fetch collaborator.
//!
//! The wire format is a JSON array of camelCase objects. Records are values:
//! a fetch replaces the whole collection, nothing is patched in place.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Disconnected,
    Connected,
    Healthy,
    Error,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Disconnected => "disconnected",
            DeviceStatus::Connected => "connected",
            DeviceStatus::Healthy => "healthy",
            DeviceStatus::Error => "error",
        }
    }

    /// Connected and healthy devices share the "healthy" visual class.
    pub fn is_healthy(&self) -> bool {
        matches!(self, DeviceStatus::Connected | DeviceStatus::Healthy)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePoint {
    pub time: f64,
    pub temp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityPoint {
    pub time: f64,
    pub humi: f64,
}

/// Drill-down time series. Presentation data only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub name: String,
    pub temperature_data_points: Vec<TemperaturePoint>,
    pub humidity_data_points: Vec<HumidityPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub current_temperature: f64,
    pub current_humidity: f64,
    /// Carried from the upstream payload; not interpreted.
    #[serde(default)]
    pub open: bool,
    pub status: DeviceStatus,
    pub details: Details,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Duplicate {
    Id(i64),
    Name(String),
}

impl fmt::Display for Duplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Duplicate::Id(id) => write!(f, "duplicate record id {}", id),
            Duplicate::Name(name) => write!(f, "duplicate record name '{}'", name),
        }
    }
}

/// Parse a JSON array of records. Any missing field fails the whole set.
pub fn parse_records(json: &str) -> serde_json::Result<Vec<Record>> {
    serde_json::from_str(json)
}

/// Check that `id` and `name` are unique within one snapshot.
pub fn find_duplicate(records: &[Record]) -> Option<Duplicate> {
    let mut ids = HashSet::with_capacity(records.len());
    let mut names = HashSet::with_capacity(records.len());
    for record in records {
        if !ids.insert(record.id) {
            return Some(Duplicate::Id(record.id));
        }
        if !names.insert(record.name.as_str()) {
            return Some(Duplicate::Name(record.name.clone()));
        }
    }
    None
}

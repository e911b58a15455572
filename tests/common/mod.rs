#![allow(dead_code)]

use sensortui::record::{Details, DeviceStatus, HumidityPoint, Record, TemperaturePoint};
use std::io::Write;
use tempfile::NamedTempFile;

pub fn device(id: i64, name: &str) -> Record {
    device_with(id, name, 20.0 + id as f64, DeviceStatus::Healthy)
}

pub fn device_with(
    id: i64,
    name: &str,
    temperature: f64,
    status: DeviceStatus,
) -> Record {
    Record {
        id,
        name: name.to_string(),
        location: format!("Building {}", (id % 3) + 1),
        current_temperature: temperature,
        current_humidity: 40.0 + (id % 7) as f64,
        open: false,
        status,
        details: Details {
            name: format!("{} history", name),
            temperature_data_points: (0..4)
                .map(|t| TemperaturePoint {
                    time: t as f64,
                    temp: temperature - t as f64,
                })
                .collect(),
            humidity_data_points: (0..4)
                .map(|t| HumidityPoint {
                    time: t as f64,
                    humi: 40.0 + t as f64,
                })
                .collect(),
        },
    }
}

/// `n` devices named `sensor-<id>` with ids 1..=n.
pub fn fleet(n: i64) -> Vec<Record> {
    (1..=n).map(|i| device(i, &format!("sensor-{}", i))).collect()
}

/// Write records as the wire JSON array into a temp file.
pub fn json_file(records: &[Record]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    let json = serde_json::to_string_pretty(records).expect("Failed to encode records");
    file.write_all(json.as_bytes())
        .expect("Failed to write records");
    file
}

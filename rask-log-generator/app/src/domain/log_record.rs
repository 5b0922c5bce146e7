use super::{HttpMethod, LogLevel};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single synthetic log line as shipped to the collector.
///
/// Every documented field is always present. `filler` holds the optional
/// `field_{i}` entries used to inflate a record; they are flattened into the
/// top-level JSON object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: String,
    pub hostname: String,
    pub server_name: String,
    pub username: String,
    pub app_name: String,
    pub container_id: u32,
    pub log_level: LogLevel,
    pub message: String,
    pub request_url: String,
    pub parameters: String,
    pub path: String,
    pub method: HttpMethod,
    pub ip: String,
    pub random_number: u32,
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filler: BTreeMap<String, String>,
}

impl LogRecord {
    /// Field names present on every record, in wire order.
    pub const FIELDS: [&'static str; 14] = [
        "timestamp",
        "hostname",
        "server_name",
        "username",
        "app_name",
        "container_id",
        "log_level",
        "message",
        "request_url",
        "parameters",
        "path",
        "method",
        "ip",
        "random_number",
    ];

    /// Compact single-line JSON, without the trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Compact JSON followed by `\n`, ready to be written to the collector.
    pub fn to_json_line(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }

    /// Serialized size in bytes, excluding the line terminator.
    pub fn encoded_len(&self) -> Result<u64, serde_json::Error> {
        Ok(serde_json::to_vec(self)?.len() as u64)
    }
}

/// Local wall-clock time as ISO-8601 with microsecond precision and no offset.
///
/// The width is fixed so that seeded runs produce records of identical size.
pub fn iso_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

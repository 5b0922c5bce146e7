use serde::{Deserialize, Serialize};

/// Level vocabulary of the `/api/logs` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiLevel {
    Info,
    Warning,
    Error,
}

impl ApiLevel {
    pub const ALL: [ApiLevel; 3] = [ApiLevel::Info, ApiLevel::Warning, ApiLevel::Error];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiLogEntry {
    pub id: u64,
    pub timestamp: String,
    pub message: String,
    pub level: ApiLevel,
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Failed to load configuration: {0}")]
    Config(String),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Invalid generation target: {0}")]
    InvalidTarget(String),

    #[error("Failed to serialize log record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Collector {address} unreachable after {attempts} attempts")]
    CollectorUnreachable { address: String, attempts: u32 },

    #[error("Generation cancelled by shutdown")]
    Cancelled,

    #[error("System probe failed: {0}")]
    Probe(String),
}

//! Domain layer for rask-log-generator.
//!
//! - `LogRecord`: one synthetic log line as shipped to the collector
//! - `GenerationTarget` / `GenerationReport`: what a run aims for and what it did
//! - `ApiLogEntry`, `SystemMetrics`: response bodies of the JSON API

pub mod api_entry;
pub mod log_level;
pub mod log_record;
pub mod report;
pub mod system_metrics;
pub mod target;

pub use api_entry::{ApiLevel, ApiLogEntry};
pub use log_level::{HttpMethod, LogLevel};
pub use log_record::{LogRecord, iso_timestamp};
pub use report::{GenerationReport, RunOutcome};
pub use system_metrics::{DiskUsage, MemoryUsage, SystemMetrics};
pub use target::GenerationTarget;

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed(String),
}

/// What a generation run did before it stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Synthesized records handed to the sink. Lifecycle records are not counted.
    pub records: u64,
    /// Cumulative serialized size of those records.
    pub bytes: u64,
    pub elapsed: Duration,
    pub outcome: RunOutcome,
}

impl GenerationReport {
    pub fn is_completed(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }

    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / super::target::BYTES_PER_MB as f64
    }

    pub fn records_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }
}

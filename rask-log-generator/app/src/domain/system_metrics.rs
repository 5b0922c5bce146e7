use serde::{Deserialize, Serialize};

/// Host utilization snapshot returned by `/api/system`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    /// Global CPU usage in percent.
    pub cpu: f64,
    pub memory: MemoryUsage,
    pub disk: DiskUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub total: u64,
    pub available: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

impl MemoryUsage {
    pub fn from_totals(total: u64, available: u64) -> Self {
        let used = total.saturating_sub(available);
        Self {
            total,
            available,
            percent: percent_of(used, total),
        }
    }
}

impl DiskUsage {
    pub fn from_totals(total: u64, free: u64) -> Self {
        let used = total.saturating_sub(free);
        Self {
            total,
            used,
            free,
            percent: percent_of(used, total),
        }
    }
}

/// `part / whole` in percent, rounded to one decimal; 0 when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

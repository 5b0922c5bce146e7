//! Shared test support utilities
//!
//! Test doubles for the `LineSink` and `SystemProbe` ports, for use in unit
//! and integration tests.

use crate::domain::{DiskUsage, LogRecord, MemoryUsage, SystemMetrics};
use crate::error::GeneratorError;
use crate::port::{LineSink, SystemProbe};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Sink that keeps every record it is handed, in send order.
pub struct RecordingSink {
    records: Mutex<Vec<LogRecord>>,
    sends: AtomicUsize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            sends: AtomicUsize::new(0),
        }
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Number of `send` invocations so far.
    pub fn send_count(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSink for RecordingSink {
    fn send<'a>(&'a self, record: &'a LogRecord) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            self.records.lock().unwrap().push(record.clone());
            self.sends.fetch_add(1, Ordering::SeqCst);
        })
    }
}

/// Probe returning fixed figures, or failing on demand.
pub struct FixedProbe {
    metrics: SystemMetrics,
    should_fail: AtomicBool,
}

impl FixedProbe {
    pub fn new() -> Self {
        Self {
            metrics: SystemMetrics {
                cpu: 12.5,
                memory: MemoryUsage::from_totals(8 * 1024 * 1024 * 1024, 2 * 1024 * 1024 * 1024),
                disk: DiskUsage::from_totals(100 * 1024 * 1024 * 1024, 40 * 1024 * 1024 * 1024),
            },
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn metrics(&self) -> &SystemMetrics {
        &self.metrics
    }
}

impl Default for FixedProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe for FixedProbe {
    fn snapshot(&self) -> Pin<Box<dyn Future<Output = Result<SystemMetrics, GeneratorError>> + Send + '_>> {
        Box::pin(async move {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(GeneratorError::Probe("Mock probe failure".to_string()));
            }
            Ok(self.metrics.clone())
        })
    }
}

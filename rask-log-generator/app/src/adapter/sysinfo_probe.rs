use crate::domain::system_metrics::round1;
use crate::domain::{DiskUsage, MemoryUsage, SystemMetrics};
use crate::error::GeneratorError;
use crate::port::SystemProbe;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use sysinfo::{Disks, MINIMUM_CPU_UPDATE_INTERVAL, System};

/// Reads host utilization through `sysinfo` on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoProbe;

impl SysinfoProbe {
    pub fn new() -> Self {
        Self
    }
}

impl SystemProbe for SysinfoProbe {
    fn snapshot(&self) -> Pin<Box<dyn Future<Output = Result<SystemMetrics, GeneratorError>> + Send + '_>> {
        Box::pin(async move {
            tokio::task::spawn_blocking(collect)
                .await
                .map_err(|e| GeneratorError::Probe(e.to_string()))
        })
    }
}

fn collect() -> SystemMetrics {
    let mut system = System::new();
    // CPU usage is a delta between two refreshes
    system.refresh_cpu_usage();
    std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    system.refresh_cpu_usage();
    system.refresh_memory();

    let disks = Disks::new_with_refreshed_list();
    let root = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .or_else(|| disks.list().first());
    let disk = match root {
        Some(disk) => DiskUsage::from_totals(disk.total_space(), disk.available_space()),
        None => DiskUsage::from_totals(0, 0),
    };

    SystemMetrics {
        cpu: round1(f64::from(system.global_cpu_usage())),
        memory: MemoryUsage::from_totals(system.total_memory(), system.available_memory()),
        disk,
    }
}

use std::time::Duration;

use async_trait::async_trait;
use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, ProcessRefreshKind, RefreshKind, System,
};

use crate::error::{GroferError, Result};

use super::metrics::FieldSet;
use super::provider::{
    HostSnapshot, InterfaceCounters, MemorySnapshot, MetricProvider, PartitionSnapshot,
};

/// Metric provider backed by `sysinfo`.
///
/// Every query builds fresh sysinfo handles, so the provider holds no state
/// between rounds and can be shared freely across probe tasks.
#[derive(Debug, Default, Clone)]
pub struct SysinfoProvider;

impl SysinfoProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Run a blocking sysinfo query off the async workers.
async fn blocking<T, F>(field_set: FieldSet, query: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(query)
        .await
        .map_err(|e| GroferError::provider(field_set, format!("query task failed: {}", e)))?
}

#[async_trait]
impl MetricProvider for SysinfoProvider {
    async fn cpu_percent(&self, window: Duration) -> Result<Vec<f32>> {
        let refresh_kind =
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage());
        let mut system = blocking(FieldSet::Cpu, move || {
            Ok(System::new_with_specifics(refresh_kind))
        })
        .await?;

        // Usage is the delta between two refreshes
        tokio::time::sleep(window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)).await;

        let usage = blocking(FieldSet::Cpu, move || {
            system.refresh_cpu_usage();
            Ok(system
                .cpus()
                .iter()
                .map(|cpu| cpu.cpu_usage())
                .collect::<Vec<_>>())
        })
        .await?;

        if usage.is_empty() {
            return Err(GroferError::provider(FieldSet::Cpu, "no CPU data available"));
        }
        Ok(usage)
    }

    async fn memory(&self) -> Result<MemorySnapshot> {
        blocking(FieldSet::Mem, || {
            let system = System::new_with_specifics(
                RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
            );

            let total = system.total_memory();
            if total == 0 {
                return Err(GroferError::provider(
                    FieldSet::Mem,
                    "memory subsystem unavailable",
                ));
            }

            let available = system.available_memory();
            let free = system.free_memory();

            Ok(MemorySnapshot {
                total_bytes: total,
                used_bytes: system.used_memory(),
                available_bytes: available,
                free_bytes: free,
                cached_bytes: read_cached_bytes().unwrap_or(available.saturating_sub(free)),
            })
        })
        .await
    }

    async fn partitions(&self) -> Result<Vec<PartitionSnapshot>> {
        blocking(FieldSet::Disk, || {
            let disks = Disks::new_with_refreshed_list();

            Ok(disks
                .list()
                .iter()
                .map(|disk| {
                    let total = disk.total_space();
                    let available = disk.available_space();

                    PartitionSnapshot {
                        device: disk.name().to_string_lossy().to_string(),
                        mount_point: disk.mount_point().to_string_lossy().to_string(),
                        fs_type: disk.file_system().to_string_lossy().to_string(),
                        total_bytes: total,
                        used_bytes: total.saturating_sub(available),
                        free_bytes: available,
                    }
                })
                .collect())
        })
        .await
    }

    async fn net_io_counters(&self) -> Result<Vec<InterfaceCounters>> {
        blocking(FieldSet::Net, || {
            let networks = Networks::new_with_refreshed_list();

            Ok(networks
                .iter()
                .map(|(name, data)| InterfaceCounters {
                    name: name.to_string(),
                    bytes_sent: data.total_transmitted(),
                    bytes_received: data.total_received(),
                })
                .collect())
        })
        .await
    }

    async fn host_info(&self) -> Result<HostSnapshot> {
        blocking(FieldSet::Info, || {
            let system = System::new_with_specifics(
                RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing()),
            );

            Ok(HostSnapshot {
                hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
                process_count: system.processes().len() as u64,
                os: std::env::consts::OS.to_string(),
                platform: System::name().unwrap_or_else(|| "unknown".to_string()),
                platform_version: System::os_version().unwrap_or_default(),
                kernel_version: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
                kernel_arch: std::env::consts::ARCH.to_string(),
            })
        })
        .await
    }
}

#[cfg(target_os = "linux")]
fn read_cached_bytes() -> Option<u64> {
    let contents = std::fs::read_to_string("/proc/meminfo").ok()?;
    parse_meminfo_cached(&contents)
}

#[cfg(not(target_os = "linux"))]
fn read_cached_bytes() -> Option<u64> {
    None
}

/// Extract the page cache size from `/proc/meminfo` contents, in bytes.
pub fn parse_meminfo_cached(contents: &str) -> Option<u64> {
    contents.lines().find_map(|line| {
        let rest = line.strip_prefix("Cached:")?;
        let kib = rest.split_whitespace().next()?.parse::<u64>().ok()?;
        Some(kib * 1024)
    })
}

//! OS metric provider contract.
//!
//! The pipeline never talks to the kernel directly. It asks a
//! [`MetricProvider`] for one raw snapshot per metric class and turns that
//! snapshot into a [`Record`](super::Record). Raw values stay in bytes here;
//! unit conversion and filtering happen in the metrics module.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySnapshot {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub free_bytes: u64,
    pub cached_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionSnapshot {
    /// Block device backing the mount, e.g. `/dev/sda1`
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
}

/// Cumulative byte counters of one network interface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceCounters {
    pub name: String,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostSnapshot {
    pub hostname: String,
    pub process_count: u64,
    pub os: String,
    pub platform: String,
    pub platform_version: String,
    pub kernel_version: String,
    pub kernel_arch: String,
}

/// Source of raw system metrics, one query per metric class.
///
/// Failures are reported as [`GroferError::Provider`](crate::GroferError::Provider)
/// tagged with the queried class. Queries may suspend; callers cancel them by
/// dropping the returned future.
#[async_trait]
pub trait MetricProvider: Send + Sync {
    /// Per-core utilization measured over `window`.
    async fn cpu_percent(&self, window: Duration) -> Result<Vec<f32>>;

    async fn memory(&self) -> Result<MemorySnapshot>;

    async fn partitions(&self) -> Result<Vec<PartitionSnapshot>>;

    async fn net_io_counters(&self) -> Result<Vec<InterfaceCounters>>;

    async fn host_info(&self) -> Result<HostSnapshot>;
}

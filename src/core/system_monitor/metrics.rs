use std::fmt;

use serde::{Deserialize, Serialize};

use super::provider::{HostSnapshot, InterfaceCounters, MemorySnapshot, PartitionSnapshot};

const BYTES_PER_GB: f64 = (1u64 << 30) as f64;

/// Device prefix of loopback block devices (snap images, mounted ISOs).
pub const LOOP_DEVICE_PREFIX: &str = "/dev/loop";

/// Storage tree of the container runtime; its overlay mounts mirror real disks.
pub const CONTAINER_STORAGE_PREFIX: &str = "/var/lib/docker";

/// Discriminant identifying which metric class a [`Record`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldSet {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "MEM")]
    Mem,
    #[serde(rename = "DISK")]
    Disk,
    #[serde(rename = "NET")]
    Net,
    #[serde(rename = "INFO")]
    Info,
}

impl FieldSet {
    /// Every field set, in probe registration order.
    pub const ALL: [FieldSet; 5] = [
        FieldSet::Cpu,
        FieldSet::Mem,
        FieldSet::Disk,
        FieldSet::Net,
        FieldSet::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldSet::Cpu => "CPU",
            FieldSet::Mem => "MEM",
            FieldSet::Disk => "DISK",
            FieldSet::Net => "NET",
            FieldSet::Info => "INFO",
        }
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finished sample of a single metric class.
///
/// The payload is tied to the variant, so a record can never carry a tag that
/// disagrees with its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field_set", content = "payload")]
pub enum Record {
    #[serde(rename = "CPU")]
    Cpu(CpuMetrics),
    #[serde(rename = "MEM")]
    Mem(MemoryMetrics),
    #[serde(rename = "DISK")]
    Disk(Vec<DiskMetrics>),
    #[serde(rename = "NET")]
    Net(Vec<NetworkMetrics>),
    #[serde(rename = "INFO")]
    Info(HostMetrics),
}

impl Record {
    pub fn field_set(&self) -> FieldSet {
        match self {
            Record::Cpu(_) => FieldSet::Cpu,
            Record::Mem(_) => FieldSet::Mem,
            Record::Disk(_) => FieldSet::Disk,
            Record::Net(_) => FieldSet::Net,
            Record::Info(_) => FieldSet::Info,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuMetrics {
    /// Utilization per logical core, 0.0 to 100.0
    pub per_core_usage: Vec<f64>,
}

/// Memory figures in gigabytes, rounded to one decimal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryMetrics {
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
    pub free_gb: f64,
    pub cached_gb: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskMetrics {
    pub mount_point: String,
    pub total_gb: f64,
    pub usage_percent: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub fs_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub interface: String,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostMetrics {
    pub hostname: String,
    pub process_count: u64,
    pub os_platform: String,
    pub kernel_arch: String,
}

/// Convert a byte count to gigabytes (2^30) rounded to one decimal place.
pub fn round_off(bytes: u64) -> f64 {
    round_one_decimal(bytes as f64 / BYTES_PER_GB)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Widening sysinfo's `f32` exposes float noise (33.3 -> 33.29999923706055).
fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn collect_cpu(per_core: Vec<f32>) -> CpuMetrics {
    CpuMetrics {
        per_core_usage: per_core
            .into_iter()
            .map(|usage| round_two_decimals(f64::from(usage)).clamp(0.0, 100.0))
            .collect(),
    }
}

pub fn collect_memory(snapshot: &MemorySnapshot) -> MemoryMetrics {
    MemoryMetrics {
        total_gb: round_off(snapshot.total_bytes),
        used_gb: round_off(snapshot.used_bytes),
        available_gb: round_off(snapshot.available_bytes),
        free_gb: round_off(snapshot.free_bytes),
        cached_gb: round_off(snapshot.cached_bytes),
    }
}

/// Loop devices and container-runtime storage mounts are not real partitions.
pub fn is_excluded_partition(partition: &PartitionSnapshot) -> bool {
    partition.device.starts_with(LOOP_DEVICE_PREFIX)
        || partition.mount_point.starts_with(CONTAINER_STORAGE_PREFIX)
}

pub fn collect_disks(partitions: &[PartitionSnapshot]) -> Vec<DiskMetrics> {
    partitions
        .iter()
        .filter(|partition| !is_excluded_partition(partition))
        .map(|partition| {
            let usage_percent = if partition.total_bytes > 0 {
                partition.used_bytes as f64 / partition.total_bytes as f64 * 100.0
            } else {
                0.0
            };

            DiskMetrics {
                mount_point: partition.mount_point.clone(),
                total_gb: round_off(partition.total_bytes),
                usage_percent: round_one_decimal(usage_percent),
                used_gb: round_off(partition.used_bytes),
                free_gb: round_off(partition.free_bytes),
                fs_type: partition.fs_type.clone(),
            }
        })
        .collect()
}

pub fn collect_network(counters: &[InterfaceCounters]) -> Vec<NetworkMetrics> {
    let mut metrics: Vec<NetworkMetrics> = counters
        .iter()
        .map(|counter| NetworkMetrics {
            interface: counter.name.clone(),
            bytes_sent: counter.bytes_sent,
            bytes_received: counter.bytes_received,
        })
        .collect();

    // Interface enumeration order is not stable across refreshes
    metrics.sort_by(|a, b| a.interface.cmp(&b.interface));
    metrics
}

pub fn collect_host(snapshot: &HostSnapshot) -> HostMetrics {
    HostMetrics {
        hostname: snapshot.hostname.clone(),
        process_count: snapshot.process_count,
        os_platform: format!(
            "{}/{} {}",
            snapshot.os, snapshot.platform, snapshot.platform_version
        )
        .trim_end()
        .to_string(),
        kernel_arch: format!("{}/{}", snapshot.kernel_version, snapshot.kernel_arch),
    }
}

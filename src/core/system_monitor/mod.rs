//! System metrics pipeline.
//!
//! One round fans five probes (CPU, MEM, DISK, NET, INFO) out as concurrent
//! tasks, funnels their records through a single-slot channel into one
//! consumer that feeds a [`Sink`], and resolves their outcomes into a single
//! error. See [`Pipeline::run_round`].

pub mod aggregator;
mod collector;
mod metrics;
pub mod provider;
mod runtime;
pub mod scheduler;
mod sink;
pub mod tasks;


pub use collector::{parse_meminfo_cached, SysinfoProvider};
pub use metrics::{
    collect_cpu, collect_disks, collect_host, collect_memory, collect_network,
    is_excluded_partition, round_off, CpuMetrics, DiskMetrics, FieldSet, HostMetrics,
    MemoryMetrics, NetworkMetrics, Record, CONTAINER_STORAGE_PREFIX, LOOP_DEVICE_PREFIX,
};
pub use provider::{
    HostSnapshot, InterfaceCounters, MemorySnapshot, MetricProvider, PartitionSnapshot,
};
pub use runtime::{build_runtime, Pipeline};
pub use sink::Sink;
pub use tasks::{default_probes, Probe, ProbeContext};

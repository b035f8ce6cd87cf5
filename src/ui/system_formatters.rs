use colored::*;

use crate::core::system_monitor::{
    CpuMetrics, DiskMetrics, HostMetrics, MemoryMetrics, NetworkMetrics, Record,
};
use crate::ui::formatters::{format_gb, format_percent, format_size};

/// Render one record as an indented, human-readable section.
pub fn format_record(record: &Record) -> String {
    let mut out = section_header(record.field_set().as_str());

    match record {
        Record::Cpu(cpu) => format_cpu(&mut out, cpu),
        Record::Mem(mem) => format_memory(&mut out, mem),
        Record::Disk(disks) => format_disks(&mut out, disks),
        Record::Net(interfaces) => format_network(&mut out, interfaces),
        Record::Info(host) => format_host(&mut out, host),
    }

    out
}

fn section_header(title: &str) -> String {
    format!("\n{}\n{}\n", title.bold().green(), "-".repeat(title.len()))
}

fn format_cpu(out: &mut String, cpu: &CpuMetrics) {
    for (core, usage) in cpu.per_core_usage.iter().enumerate() {
        out.push_str(&format!("  core{:<3} {:>6}\n", core, format_percent(*usage)));
    }
}

fn format_memory(out: &mut String, mem: &MemoryMetrics) {
    out.push_str(&format!("  Total: {}\n", format_gb(mem.total_gb)));
    out.push_str(&format!("  Used: {}\n", format_gb(mem.used_gb)));
    out.push_str(&format!("  Available: {}\n", format_gb(mem.available_gb)));
    out.push_str(&format!("  Free: {}\n", format_gb(mem.free_gb)));
    out.push_str(&format!("  Cached: {}\n", format_gb(mem.cached_gb)));
}

fn format_disks(out: &mut String, disks: &[DiskMetrics]) {
    if disks.is_empty() {
        out.push_str(&format!("  {}\n", "No partitions".dimmed()));
        return;
    }

    out.push_str(&format!(
        "  {:<24} {:>10} {:>8} {:>10} {:>10}  {}\n",
        "Mount", "Total", "Used %", "Used", "Free", "FS Type"
    ));
    for disk in disks {
        out.push_str(&format!(
            "  {:<24} {:>10} {:>8} {:>10} {:>10}  {}\n",
            disk.mount_point,
            format_gb(disk.total_gb),
            format_percent(disk.usage_percent),
            format_gb(disk.used_gb),
            format_gb(disk.free_gb),
            disk.fs_type
        ));
    }
}

fn format_network(out: &mut String, interfaces: &[NetworkMetrics]) {
    if interfaces.is_empty() {
        out.push_str(&format!("  {}\n", "No interfaces".dimmed()));
        return;
    }

    for interface in interfaces {
        out.push_str(&format!(
            "  {:<16} sent {:>10}  received {:>10}\n",
            interface.interface,
            format_size(interface.bytes_sent),
            format_size(interface.bytes_received)
        ));
    }
}

fn format_host(out: &mut String, host: &HostMetrics) {
    out.push_str(&format!("  Hostname: {}\n", host.hostname));
    out.push_str(&format!("  Processes: {}\n", host.process_count));
    out.push_str(&format!("  OS/Platform: {}\n", host.os_platform));
    out.push_str(&format!("  Kernel/Arch: {}\n", host.kernel_arch));
}

/// Format a byte count in human-readable form (B, KB, MB, GB, TB)
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if size < KB {
        format!("{}B", size)
    } else if size < MB {
        format!("{:.1}KB", size as f64 / KB as f64)
    } else if size < GB {
        format!("{:.1}MB", size as f64 / MB as f64)
    } else if size < TB {
        format!("{:.1}GB", size as f64 / GB as f64)
    } else {
        format!("{:.1}TB", size as f64 / TB as f64)
    }
}

/// Format a gigabyte figure already rounded by the pipeline
pub fn format_gb(gb: f64) -> String {
    format!("{:.1} GB", gb)
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

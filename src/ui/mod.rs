// UI and formatting module

pub mod formatters;
pub mod sinks;
pub mod system_formatters;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_gb, format_percent, format_size};
pub use sinks::{ConsoleSink, JsonSink};
pub use system_formatters::format_record;

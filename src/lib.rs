// grofer library - public API

// Re-export error types
pub mod error;
pub use error::{GroferError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::system_monitor::{Pipeline, Record, Sink};

// Initialize logging; RUST_LOG overrides the default level
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}

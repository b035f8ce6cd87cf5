// Command handlers module
pub mod config;
pub mod stats;
pub mod version;

// Re-exports for cleaner imports
pub use stats::execute as stats;
pub use version::execute as version;

pub mod commands;
pub mod progress;
pub mod status;

// Re-export commonly used types
pub use commands::Command;
pub use progress::GaugeGeometry;

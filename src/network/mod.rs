pub mod isp_lookup;
pub mod speedtest_runner;

// Re-export commonly used types
pub use isp_lookup::{HttpIspLookup, IspLookup, StaticIspLookup};
pub use speedtest_runner::{SimulationOutcome, SpeedSimulator};

pub mod app_state;
pub mod config;
pub mod error;
pub mod insight;
pub mod logging;
pub mod session;

pub use error::{Result, SpeedGaugeError};

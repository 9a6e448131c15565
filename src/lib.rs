//! SpeedGauge: a cosmetic internet speed test.
//!
//! A noisy trajectory converges toward a random target speed, the result is
//! recorded in an in-session history, and a canned insight is derived from
//! the average download.

pub mod core;
pub mod data;
pub mod network;
pub mod ui;

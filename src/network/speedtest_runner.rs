use crate::core::app_state::{RunFlag, RunState};
use crate::core::config::SimulatorConfig;
use crate::core::error::{Result, SpeedGaugeError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Result of one completed simulated run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub target_speed: f64,
    /// Always equal to the target, not the last smoothed tick
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub ticks: u32,
    pub last_tick_speed: f64,
}

/// Transient per-run state
#[derive(Debug, Clone, Copy)]
struct SimulationState {
    current_speed: f64,
    target_speed: f64,
    tick_count: u32,
}

/// One tick of the decay-to-target process, clamped to `[0, max_speed]`
pub fn step(current: f64, target: f64, noise: f64, config: &SimulatorConfig) -> f64 {
    let next = current + (target - current) * config.convergence + noise;
    next.clamp(0.0, config.max_speed)
}

/// Synthetic speed test: a noisy trajectory converging toward a random target
pub struct SpeedSimulator<R = StdRng> {
    config: SimulatorConfig,
    rng: Mutex<R>,
    flag: RunFlag,
}

impl SpeedSimulator<StdRng> {
    pub fn new(config: SimulatorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible trajectories for a given seed
    pub fn seeded(config: SimulatorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SpeedSimulator<R> {
    pub fn with_rng(config: SimulatorConfig, rng: R) -> Self {
        Self { config, rng: Mutex::new(rng), flag: RunFlag::default() }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.flag.state()
    }

    fn with_rng_locked<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut *rng)
    }

    /// Picks the speed the run converges toward
    pub fn generate_target(&self) -> f64 {
        let cfg = &self.config;
        self.with_rng_locked(|rng| {
            let (min, max) = if rng.gen::<f64>() < cfg.slow_probability {
                cfg.slow_range
            } else {
                cfg.fast_range
            };
            rng.gen_range(min..max)
        })
    }

    /// Uniform noise in `[-noise_amplitude, noise_amplitude)`
    fn noise(&self) -> f64 {
        let amplitude = self.config.noise_amplitude;
        self.with_rng_locked(|rng| (rng.gen::<f64>() - 0.5) * 2.0 * amplitude)
    }

    /// Upload figure derived from the final download
    pub fn derive_upload(&self, download_mbps: f64) -> f64 {
        let (low, high) = self.config.upload_ratio;
        self.with_rng_locked(|rng| download_mbps * rng.gen_range(low..high))
    }

    /// Runs one test at the configured cadence, reporting each smoothed speed to `on_tick`
    ///
    /// Fails with [`SpeedGaugeError::SimulationInProgress`] if another run is active.
    pub async fn run<F>(&self, mut on_tick: F) -> Result<SimulationOutcome>
    where
        F: FnMut(f64),
    {
        let _guard = self.flag.try_acquire().ok_or(SpeedGaugeError::SimulationInProgress)?;

        let mut state = SimulationState {
            current_speed: 0.0,
            target_speed: self.generate_target(),
            tick_count: 0,
        };
        info!("Speed test started (target {:.1} Mbps)", state.target_speed);

        let mut ticker = interval(Duration::from_millis(self.config.tick_interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick of a tokio interval completes immediately
        ticker.tick().await;

        while state.tick_count < self.config.tick_count {
            ticker.tick().await;
            state.tick_count += 1;
            state.current_speed = step(state.current_speed, state.target_speed, self.noise(), &self.config);
            debug!("tick {} -> {:.2} Mbps", state.tick_count, state.current_speed);
            on_tick(state.current_speed);
        }

        let download_mbps = state.target_speed;
        let upload_mbps = self.derive_upload(download_mbps);
        info!("Speed test finished: {:.1} down / {:.1} up Mbps", download_mbps, upload_mbps);

        Ok(SimulationOutcome {
            target_speed: state.target_speed,
            download_mbps,
            upload_mbps,
            ticks: state.tick_count,
            last_tick_speed: state.current_speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> SimulatorConfig {
        SimulatorConfig { tick_interval_ms: 1, ..SimulatorConfig::default() }
    }

    #[test]
    fn step_moves_toward_target_without_noise() {
        let config = SimulatorConfig::default();
        let next = step(0.0, 100.0, 0.0, &config);
        assert!((next - 12.0).abs() < 1e-9);

        let next = step(next, 100.0, 0.0, &config);
        assert!((next - 22.56).abs() < 1e-9);
    }

    #[test]
    fn step_clamps_both_ends() {
        let config = SimulatorConfig::default();
        assert_eq!(step(0.0, 10.0, -5.0, &config), 0.0);
        assert_eq!(step(149.0, 150.0, 5.0, &config), 150.0);
    }

    #[test]
    fn targets_stay_in_configured_ranges() {
        let sim = SpeedSimulator::seeded(SimulatorConfig::default(), 7);
        for _ in 0..5_000 {
            let target = sim.generate_target();
            assert!((10.0..140.0).contains(&target), "target {} out of range", target);
        }
    }

    #[test]
    fn upload_is_a_fraction_of_download() {
        let sim = SpeedSimulator::seeded(SimulatorConfig::default(), 11);
        for _ in 0..1_000 {
            let upload = sim.derive_upload(80.0);
            assert!((24.0..=40.0).contains(&upload));
        }
    }

    #[tokio::test]
    async fn run_reports_target_not_smoothed_value() {
        let sim = SpeedSimulator::seeded(fast_config(), 3);
        let mut ticks = Vec::new();
        let outcome = sim.run(|speed| ticks.push(speed)).await.unwrap();

        assert_eq!(ticks.len(), 51);
        assert_eq!(outcome.ticks, 51);
        assert_eq!(outcome.download_mbps, outcome.target_speed);
        assert_eq!(outcome.last_tick_speed, *ticks.last().unwrap());
        assert_eq!(sim.state(), RunState::Idle);
    }
}

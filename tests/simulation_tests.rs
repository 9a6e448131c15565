use rand::rngs::StdRng;
use rand::SeedableRng;
use speedgauge::core::app_state::RunState;
use speedgauge::core::config::{AppConfig, SimulatorConfig, Variant};
use speedgauge::core::error::SpeedGaugeError;
use speedgauge::network::speedtest_runner::{step, SpeedSimulator};
use tokio_test::{assert_err, assert_ok};

fn quick(mut config: SimulatorConfig) -> SimulatorConfig {
    config.tick_interval_ms = 1;
    config
}

#[test]
fn test_targets_in_range_with_minority_fast_share() {
    for (variant, slow_probability) in [(Variant::Campus, 0.7), (Variant::Standard, 0.8)] {
        let config = AppConfig::for_variant(variant).simulator;
        let sim = SpeedSimulator::with_rng(config, StdRng::seed_from_u64(2024));

        let samples = 20_000;
        let mut fast = 0;
        for _ in 0..samples {
            let target = sim.generate_target();
            assert!((10.0..150.0).contains(&target), "target {} out of range", target);
            if target >= 100.0 {
                fast += 1;
            }
        }

        let share = fast as f64 / samples as f64;
        let expected = 1.0 - slow_probability;
        assert!((share - expected).abs() < 0.02, "{:?}: fast share {} vs {}", variant, share, expected);
    }
}

#[test]
fn test_trajectory_converges_without_noise() {
    let config = SimulatorConfig { noise_amplitude: 0.0, ..SimulatorConfig::default() };
    let mut speed = 0.0;
    for _ in 0..51 {
        speed = step(speed, 80.0, 0.0, &config);
    }
    // 0.88^51 of the gap remains
    assert!((80.0 - speed) < 0.2, "speed {} did not converge", speed);
}

#[tokio::test]
async fn test_speed_stays_clamped_every_tick() {
    for seed in 0..20 {
        let sim = SpeedSimulator::seeded(quick(SimulatorConfig::default()), seed);
        let mut ticks = Vec::new();
        assert_ok!(sim.run(|speed| ticks.push(speed)).await);
        assert!(ticks.iter().all(|s| (0.0..=150.0).contains(s)), "seed {} escaped clamp", seed);
    }
}

#[tokio::test]
async fn test_exact_tick_count() {
    let sim = SpeedSimulator::seeded(quick(SimulatorConfig::default()), 5);
    let mut count = 0;
    let outcome = assert_ok!(sim.run(|_| count += 1).await);
    assert_eq!(count, 51);
    assert_eq!(outcome.ticks, 51);

    let sim = SpeedSimulator::seeded(quick(SimulatorConfig { tick_count: 7, ..SimulatorConfig::default() }), 5);
    let mut count = 0;
    assert_ok!(sim.run(|_| count += 1).await);
    assert_eq!(count, 7);
}

#[tokio::test]
async fn test_final_download_is_target_and_upload_fraction() {
    for seed in 0..10 {
        let sim = SpeedSimulator::seeded(quick(SimulatorConfig::default()), seed);
        let outcome = assert_ok!(sim.run(|_| {}).await);
        let f = outcome.download_mbps;
        assert_eq!(f, outcome.target_speed);
        assert!(outcome.upload_mbps >= 0.3 * f && outcome.upload_mbps <= 0.5 * f);
    }
}

#[tokio::test]
async fn test_same_seed_same_trajectory() {
    let a = SpeedSimulator::seeded(quick(SimulatorConfig::default()), 99);
    let b = SpeedSimulator::seeded(quick(SimulatorConfig::default()), 99);

    let mut ta = Vec::new();
    let mut tb = Vec::new();
    let oa = assert_ok!(a.run(|s| ta.push(s)).await);
    let ob = assert_ok!(b.run(|s| tb.push(s)).await);
    assert_eq!(ta, tb);
    assert_eq!(oa, ob);
}

#[tokio::test]
async fn test_second_run_rejected_while_running() {
    let sim = SpeedSimulator::seeded(quick(SimulatorConfig::default()), 1);

    let (first, second) = tokio::join!(sim.run(|_| {}), async {
        tokio::task::yield_now().await;
        let state = sim.state();
        (state, sim.run(|_| {}).await)
    });

    assert_ok!(first);
    let (state_during, second) = second;
    assert_eq!(state_during, RunState::Running);
    let err = assert_err!(second);
    assert!(matches!(err, SpeedGaugeError::SimulationInProgress));

    // flag released after completion
    assert_eq!(sim.state(), RunState::Idle);
    assert_ok!(sim.run(|_| {}).await);
}

#[tokio::test]
async fn test_dropped_run_releases_flag() {
    let sim = SpeedSimulator::seeded(SimulatorConfig { tick_interval_ms: 1_000, ..SimulatorConfig::default() }, 1);

    let result = tokio::time::timeout(std::time::Duration::from_millis(20), sim.run(|_| {})).await;
    assert!(result.is_err());
    assert_eq!(sim.state(), RunState::Idle);
}

use crate::core::app_state::{shared_isp_label, RunState, SharedIspLabel};
use crate::core::config::AppConfig;
use crate::core::error::Result;
use crate::core::insight::{InsightEngine, InsightSummary};
use crate::data::history::History;
use crate::data::models::{Trial, TrialMeta};
use crate::network::speedtest_runner::{SimulationOutcome, SpeedSimulator};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use tokio::sync::RwLock;

/// Snapshot of what the front end renders
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub history: History,
    pub insight: InsightSummary,
}

/// Ties the simulator to the history and insight engine for one process lifetime
pub struct SpeedTestSession<R = StdRng> {
    simulator: SpeedSimulator<R>,
    history: RwLock<History>,
    insight: InsightEngine,
    isp_label: SharedIspLabel,
}

impl SpeedTestSession<StdRng> {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_simulator(config, SpeedSimulator::new(config.simulator.clone()))
    }
}

impl<R: Rng> SpeedTestSession<R> {
    pub fn with_simulator(config: &AppConfig, simulator: SpeedSimulator<R>) -> Self {
        Self {
            simulator,
            history: RwLock::new(History::new()),
            insight: InsightEngine::new(config.insight.clone()),
            isp_label: shared_isp_label(config.isp_lookup.fallback_label.clone()),
        }
    }

    /// Handle for the startup lookup task to write into
    pub fn isp_label_handle(&self) -> SharedIspLabel {
        self.isp_label.clone()
    }

    pub async fn isp_label(&self) -> String {
        self.isp_label.read().await.clone()
    }

    pub fn run_state(&self) -> RunState {
        self.simulator.state()
    }

    pub async fn history(&self) -> History {
        self.history.read().await.clone()
    }

    /// Runs the simulator to completion and records the resulting trial
    ///
    /// A call made while another run is active fails with
    /// `SimulationInProgress` and records nothing. A trial that fails
    /// validation is not recorded either.
    pub async fn run_test<F>(&self, on_tick: F) -> Result<(SimulationOutcome, Trial)>
    where
        F: FnMut(f64),
    {
        let outcome = self.simulator.run(on_tick).await?;
        let meta = TrialMeta::new(self.insight.config().location.clone(), self.isp_label().await);
        let trial = self
            .history
            .write()
            .await
            .record(outcome.download_mbps, outcome.upload_mbps, meta)?
            .clone();
        Ok((outcome, trial))
    }

    pub async fn insight(&self) -> InsightSummary {
        let isp = self.isp_label().await;
        self.insight.summarize(&*self.history.read().await, &isp)
    }

    /// Drops every trial; the insight returns to neutral
    pub async fn clear_history(&self) {
        self.history.write().await.clear();
    }

    pub async fn report(&self) -> SessionReport {
        SessionReport { history: self.history().await, insight: self.insight().await }
    }
}

use crate::core::error::{Result, ResultExt, SpeedGaugeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration with intelligent defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Synthetic speed trajectory parameters
    pub simulator: SimulatorConfig,

    /// History insight wording and thresholds
    pub insight: InsightConfig,

    /// Best-effort ISP label lookup
    pub isp_lookup: IspLookupConfig,

    /// Terminal rendering preferences
    pub ui: UiConfig,
}

/// Named presets reproducing the two page variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Campus wording with location-specific suggestions; 70% slow trials
    Campus,
    /// Generic wording; 80% slow trials
    Standard,
}

/// Speed simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Probability of drawing the target from the slow range (0.0 to 1.0)
    pub slow_probability: f64,

    /// Half-open range `[min, max)` for ordinary trials (Mbps)
    pub slow_range: (f64, f64),

    /// Half-open range `[min, max)` for the occasional fast trial (Mbps)
    pub fast_range: (f64, f64),

    /// Fraction of the remaining gap to the target closed on each tick
    pub convergence: f64,

    /// Noise is drawn uniformly from `[-noise_amplitude, noise_amplitude)`
    pub noise_amplitude: f64,

    /// Upper clamp for the smoothed speed and full scale of the gauge
    pub max_speed: f64,

    /// Number of ticks before the run completes
    pub tick_count: u32,

    /// Interval between ticks (milliseconds)
    pub tick_interval_ms: u64,

    /// Upload is `download * uniform(upload_ratio)`
    pub upload_ratio: (f64, f64),
}

/// Insight engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Average download at or above this is classified as fast (Mbps)
    pub fast_threshold_mbps: f64,

    /// Static location label attached to every trial
    pub location: String,

    /// Message wording
    pub variant: Variant,
}

/// ISP lookup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IspLookupConfig {
    /// Perform the lookup at startup
    pub enabled: bool,

    /// JSON endpoint returning an `org` field
    pub endpoint: String,

    /// Request timeout (seconds)
    pub timeout_seconds: u64,

    /// Label used until the lookup succeeds, and whenever it fails
    pub fallback_label: String,
}

/// Terminal UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Width of the text gauge in characters
    pub gauge_width: usize,

    /// Redraw the gauge on every tick
    pub show_live_gauge: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            slow_probability: 0.7,
            slow_range: (10.0, 100.0),
            fast_range: (100.0, 140.0),
            convergence: 0.12,
            noise_amplitude: 5.0,
            max_speed: 150.0,
            tick_count: 51,
            tick_interval_ms: 150,
            upload_ratio: (0.3, 0.5),
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            fast_threshold_mbps: 50.0,
            location: "VIT, Chennai".to_string(),
            variant: Variant::Campus,
        }
    }
}

impl Default for IspLookupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://ipapi.co/json/".to_string(),
            timeout_seconds: 5,
            fallback_label: "Local ISP".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { gauge_width: 40, show_live_gauge: true }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Campus)
    }
}

impl AppConfig {
    /// Builds the preset for one of the page variants
    pub fn for_variant(variant: Variant) -> Self {
        let mut config = Self {
            simulator: SimulatorConfig::default(),
            insight: InsightConfig::default(),
            isp_lookup: IspLookupConfig::default(),
            ui: UiConfig::default(),
        };
        config.apply_variant(variant);
        config
    }

    /// Switches probability, fast range and wording to the given variant
    pub fn apply_variant(&mut self, variant: Variant) {
        self.insight.variant = variant;
        match variant {
            Variant::Campus => {
                self.simulator.slow_probability = 0.7;
                self.simulator.fast_range = (100.0, 140.0);
            }
            Variant::Standard => {
                self.simulator.slow_probability = 0.8;
                self.simulator.fast_range = (100.0, 150.0);
            }
        }
    }

    /// Loads configuration from the default location or creates it
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if config_path.exists() {
            Self::load_from(&config_path).await
        } else {
            let config = Self::default();
            config.save_to(&config_path).await?;
            Ok(config)
        }
    }

    /// Loads configuration from an explicit file
    ///
    /// Read and parse failures come back as `ConfigurationError` naming the file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(&format!("Cannot read {}", path.display()))?;
        serde_json::from_str(&content).with_context(&format!("Invalid config {}", path.display()))
    }

    /// Saves configuration to an explicit file
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;

        Ok(())
    }

    /// Gets the platform-specific configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SpeedGaugeError::ConfigurationError("Cannot find config directory".to_string()))?
            .join("SpeedGauge");

        Ok(config_dir.join("config.json"))
    }

    /// Validates configuration values
    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulator;

        if !(0.0..=1.0).contains(&sim.slow_probability) {
            return Err(SpeedGaugeError::ConfigurationError(
                "Slow probability must be between 0.0 and 1.0".to_string(),
            ));
        }

        if sim.max_speed <= 0.0 {
            return Err(SpeedGaugeError::ConfigurationError(
                "Maximum speed must be positive".to_string(),
            ));
        }

        for (name, (min, max)) in [("Slow range", sim.slow_range), ("Fast range", sim.fast_range)] {
            if min < 0.0 || min >= max || max > sim.max_speed {
                return Err(SpeedGaugeError::ConfigurationError(format!(
                    "{} must satisfy 0 <= min < max <= {}",
                    name, sim.max_speed
                )));
            }
        }

        let (low, high) = sim.upload_ratio;
        if low <= 0.0 || low >= high || high > 1.0 {
            return Err(SpeedGaugeError::ConfigurationError(
                "Upload ratio must satisfy 0 < min < max <= 1".to_string(),
            ));
        }

        if sim.convergence <= 0.0 || sim.convergence > 1.0 {
            return Err(SpeedGaugeError::ConfigurationError(
                "Convergence must be in (0.0, 1.0]".to_string(),
            ));
        }

        if sim.noise_amplitude < 0.0 {
            return Err(SpeedGaugeError::ConfigurationError(
                "Noise amplitude cannot be negative".to_string(),
            ));
        }

        if sim.tick_count == 0 || sim.tick_interval_ms == 0 {
            return Err(SpeedGaugeError::ConfigurationError(
                "Tick count and tick interval must be positive".to_string(),
            ));
        }

        if self.insight.fast_threshold_mbps <= 0.0 {
            return Err(SpeedGaugeError::ConfigurationError(
                "Fast threshold must be positive".to_string(),
            ));
        }

        if self.isp_lookup.fallback_label.trim().is_empty() {
            return Err(SpeedGaugeError::ConfigurationError(
                "ISP fallback label cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

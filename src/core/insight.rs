use crate::core::config::{InsightConfig, Variant};
use crate::data::history::History;
use serde::{Deserialize, Serialize};

/// Coarse classification of the average download speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierLabel {
    Fast,
    NeedsImprovement,
}

impl TierLabel {
    /// Threshold is inclusive on the fast side
    pub fn classify(average_download: f64, threshold: f64) -> Self {
        if average_download >= threshold { TierLabel::Fast } else { TierLabel::NeedsImprovement }
    }
}

/// Insight derived from the current history; never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub sample_count: usize,
    pub average_download: Option<f64>,
    pub tier: Option<TierLabel>,
    pub isp_label: Option<String>,
    pub subtitle: String,
    pub message: String,
    pub footer: String,
}

impl InsightSummary {
    /// Summary shown before any trial has been recorded
    pub fn neutral() -> Self {
        Self {
            sample_count: 0,
            average_download: None,
            tier: None,
            isp_label: None,
            subtitle: "Run tests to analyze your connection".to_string(),
            message: "Run multiple tests to receive location-based network suggestions.".to_string(),
            footer: "⚡ Waiting for test data...".to_string(),
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.tier.is_none()
    }
}

/// Turns the trial history into a canned recommendation
#[derive(Debug, Clone)]
pub struct InsightEngine {
    config: InsightConfig,
}

impl InsightEngine {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn summarize(&self, history: &History, isp_label: &str) -> InsightSummary {
        let Some(average) = history.average_download() else {
            return InsightSummary::neutral();
        };

        let tier = TierLabel::classify(average, self.config.fast_threshold_mbps);
        let location = &self.config.location;

        let (subtitle, message, footer) = match (tier, self.config.variant) {
            (TierLabel::Fast, Variant::Campus) => (
                "Your connection is blazing fast!",
                format!(
                    "Based on your test history at {}, your average speed of {:.1} Mbps is ideal for {}.",
                    location, average, isp_label
                ),
                "⚡ You're getting great speeds! No improvements needed.",
            ),
            (TierLabel::NeedsImprovement, Variant::Campus) => (
                "Your connection could be improved",
                format!(
                    "Your average speed at {} is {:.1} Mbps. For stronger connectivity, try AB1 ground floor, Gymkhana, or areas near V-Nest during off-peak hours.",
                    location, average
                ),
                "📍 Suggested better connectivity zones nearby.",
            ),
            (TierLabel::Fast, Variant::Standard) => (
                "Your connection is blazing fast!",
                format!(
                    "Your average speed of {:.1} Mbps at {} is great for {}.",
                    average, location, isp_label
                ),
                "⚡ You're getting great speeds! No improvements needed.",
            ),
            (TierLabel::NeedsImprovement, Variant::Standard) => (
                "Your connection could be improved",
                format!(
                    "Your average speed at {} is {:.1} Mbps. Try moving closer to your router or testing during off-peak hours.",
                    location, average
                ),
                "📶 Check your Wi-Fi placement and retest.",
            ),
        };

        InsightSummary {
            sample_count: history.len(),
            average_download: Some(average),
            tier: Some(tier),
            isp_label: Some(isp_label.to_string()),
            subtitle: subtitle.to_string(),
            message,
            footer: footer.to_string(),
        }
    }
}

use crate::core::insight::InsightSummary;
use crate::data::history::History;
use crate::data::models::Trial;
use crate::network::speedtest_runner::SimulationOutcome;
use chrono::Local;

/// Download/upload lines shown once a run completes
pub fn format_result(outcome: &SimulationOutcome) -> String {
    format!(
        "Speed:    {} Mbps\nDownload: {:.1} Mbps\nUpload:   {:.1} Mbps",
        outcome.download_mbps.round() as i64,
        outcome.download_mbps,
        outcome.upload_mbps
    )
}

/// One history entry, local time first
pub fn format_trial(trial: &Trial) -> String {
    let time = trial.timestamp.with_timezone(&Local).format("%H:%M:%S");
    format!(
        "{}  📍 {}  📡 {}  ⬇ {:.1} Mbps  ⬆ {:.1} Mbps",
        time, trial.location, trial.isp_label, trial.download_mbps, trial.upload_mbps
    )
}

pub fn format_history(history: &History) -> String {
    if history.is_empty() {
        return "No tests yet.".to_string();
    }
    history.iter().map(format_trial).collect::<Vec<_>>().join("\n")
}

/// Insight panel: subtitle, ISP, message and footer
pub fn format_insight(summary: &InsightSummary) -> String {
    let mut lines = vec![summary.subtitle.clone()];
    if let Some(isp) = &summary.isp_label {
        lines.push(format!("ISP: {}", isp));
    }
    lines.push(summary.message.clone());
    lines.push(summary.footer.clone());
    lines.join("\n")
}

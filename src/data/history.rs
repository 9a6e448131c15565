use crate::data::models::{Trial, TrialMeta, ValidationError};
use serde::Serialize;
use tracing::debug;

/// Rounds to one decimal place, the precision trials are shown and stored at
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// In-session trial history, newest first
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct History {
    trials: Vec<Trial>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed trial at the front of the history
    ///
    /// Figures are kept at the one-decimal precision they are displayed with,
    /// so the average and the tier agree with what the user reads.
    /// Invalid trials are rejected and the history is left unchanged.
    pub fn record(&mut self, download_mbps: f64, upload_mbps: f64, meta: TrialMeta) -> Result<&Trial, ValidationError> {
        let trial = Trial::new(round_to_tenth(download_mbps), round_to_tenth(upload_mbps), meta);
        trial.validate()?;
        debug!("Recording trial {}: {:.1}/{:.1} Mbps", trial.id, trial.download_mbps, trial.upload_mbps);
        self.trials.insert(0, trial);
        Ok(&self.trials[0])
    }

    /// Discards every recorded trial
    pub fn clear(&mut self) {
        self.trials.clear();
    }

    /// Iterates newest first
    pub fn iter(&self) -> std::slice::Iter<'_, Trial> {
        self.trials.iter()
    }

    pub fn latest(&self) -> Option<&Trial> {
        self.trials.first()
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Mean download over all trials; uploads are ignored
    pub fn average_download(&self) -> Option<f64> {
        if self.trials.is_empty() {
            return None;
        }
        let total: f64 = self.trials.iter().map(|t| t.download_mbps).sum();
        Some(total / self.trials.len() as f64)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Trial;
    type IntoIter = std::slice::Iter<'a, Trial>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> TrialMeta {
        TrialMeta::new("VIT, Chennai", "Local ISP")
    }

    #[test]
    fn newest_trial_comes_first() {
        let mut history = History::new();
        history.record(10.0, 4.0, meta()).unwrap();
        history.record(20.0, 8.0, meta()).unwrap();
        history.record(30.0, 12.0, meta()).unwrap();

        let downloads: Vec<f64> = history.iter().map(|t| t.download_mbps).collect();
        assert_eq!(downloads, vec![30.0, 20.0, 10.0]);
        assert_eq!(history.latest().map(|t| t.download_mbps), Some(30.0));
    }

    #[test]
    fn average_ignores_uploads() {
        let mut history = History::new();
        assert_eq!(history.average_download(), None);

        history.record(60.0, 1.0, meta()).unwrap();
        history.record(40.0, 99.0, meta()).unwrap();
        assert_eq!(history.average_download(), Some(50.0));
    }

    #[test]
    fn stored_figures_match_displayed_precision() {
        let mut history = History::new();
        let trial = history.record(49.96, 20.04, meta()).unwrap();
        assert_eq!(trial.download_mbps, 50.0);
        assert_eq!(trial.upload_mbps, 20.0);
        assert_eq!(history.average_download(), Some(50.0));
    }

    #[test]
    fn invalid_trial_is_rejected_and_not_stored() {
        let mut history = History::new();
        history.record(40.0, 12.0, meta()).unwrap();

        assert!(matches!(history.record(f64::NAN, 12.0, meta()), Err(ValidationError::InvalidSpeed { .. })));
        assert!(matches!(history.record(-3.0, 1.0, meta()), Err(ValidationError::InvalidSpeed { .. })));
        assert!(matches!(history.record(30.0, 9.0, TrialMeta::new("VIT, Chennai", "")), Err(ValidationError::EmptyIspLabel)));

        assert_eq!(history.len(), 1);
        assert_eq!(history.average_download(), Some(40.0));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut history = History::new();
        history.record(25.0, 10.0, meta()).unwrap();
        history.clear();
        assert!(history.is_empty());
        history.clear();
        assert_eq!(history.len(), 0);
    }
}

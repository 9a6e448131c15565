use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for data models
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Speed value must be finite and non-negative: {value}")]
    InvalidSpeed { value: f64 },
    #[error("Location cannot be empty")]
    EmptyLocation,
    #[error("ISP label cannot be empty")]
    EmptyIspLabel,
}

/// Contextual labels attached to a trial when it is recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialMeta {
    pub location: String,
    pub isp_label: String,
}

impl TrialMeta {
    pub fn new(location: impl Into<String>, isp_label: impl Into<String>) -> Self {
        Self { location: location.into(), isp_label: isp_label.into() }
    }
}

/// One completed simulated speed measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub location: String,
    pub isp_label: String,
}

impl Trial {
    pub fn new(download_mbps: f64, upload_mbps: f64, meta: TrialMeta) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            download_mbps,
            upload_mbps,
            location: meta.location,
            isp_label: meta.isp_label,
        }
    }

    /// Validate the trial data
    pub fn validate(&self) -> Result<(), ValidationError> {
        for value in [self.download_mbps, self.upload_mbps] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidSpeed { value });
            }
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::EmptyLocation);
        }
        if self.isp_label.trim().is_empty() {
            return Err(ValidationError::EmptyIspLabel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_validation() {
        let trial = Trial::new(62.4, 21.0, TrialMeta::new("VIT, Chennai", "Local ISP"));
        assert!(trial.validate().is_ok());

        let mut negative = trial.clone();
        negative.upload_mbps = -1.0;
        assert!(matches!(negative.validate(), Err(ValidationError::InvalidSpeed { .. })));

        let mut nan = trial.clone();
        nan.download_mbps = f64::NAN;
        assert!(nan.validate().is_err());

        let mut unlabeled = trial;
        unlabeled.isp_label = "  ".to_string();
        assert!(matches!(unlabeled.validate(), Err(ValidationError::EmptyIspLabel)));
    }

    #[test]
    fn test_trial_serialization() {
        let trial = Trial::new(45.0, 18.0, TrialMeta::new("VIT, Chennai", "ACT Fibernet"));
        let json = serde_json::to_string(&trial).unwrap();
        assert!(json.contains("\"download_mbps\":45.0"));
        assert!(json.contains("ACT Fibernet"));

        let restored: Trial = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, trial);
    }
}

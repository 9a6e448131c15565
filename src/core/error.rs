use crate::data::models::ValidationError;
use thiserror::Error;

/// Result type alias for SpeedGauge operations
pub type Result<T> = std::result::Result<T, SpeedGaugeError>;

/// Core error types for SpeedGauge
/// Errors are rare: the simulator is total arithmetic, only the ISP lookup touches the network
#[derive(Debug, Error)]
pub enum SpeedGaugeError {
    /// A speed test is already running; only one run may be active at a time
    #[error("A speed test is already in progress")]
    SimulationInProgress,

    /// ISP lookup returned something unusable
    #[error("ISP lookup failed: {0}")]
    LookupFailed(String),

    /// HTTP client errors for the ISP lookup
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Configuration and setup errors
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Trial data rejected by model validation
    #[error("Invalid trial data: {0}")]
    ValidationError(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("Data serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SpeedGaugeError {
    /// Determines if this error should be shown to the user or handled silently
    pub fn should_notify_user(&self) -> bool {
        match self {
            SpeedGaugeError::SimulationInProgress => true,
            SpeedGaugeError::ConfigurationError(_) => true,
            // Lookup failures fall back to a static label silently
            _ => false,
        }
    }

    /// Gets a user-friendly message for the terminal
    pub fn user_message(&self) -> String {
        match self {
            SpeedGaugeError::SimulationInProgress => {
                "Testing... wait for the current run to finish.".to_string()
            }
            SpeedGaugeError::ConfigurationError(msg) => {
                format!("Configuration needs attention: {}", msg)
            }
            _ => "SpeedGauge encountered an issue but will continue working.".to_string(),
        }
    }

    /// Determines the severity level for logging
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SpeedGaugeError::SimulationInProgress => ErrorSeverity::Info,
            SpeedGaugeError::LookupFailed(_) | SpeedGaugeError::HttpError(_) => ErrorSeverity::Low,
            SpeedGaugeError::ConfigurationError(_) => ErrorSeverity::High,
            SpeedGaugeError::ValidationError(_) => ErrorSeverity::Medium,
            _ => ErrorSeverity::Low,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Informational - no action needed, just status update
    Info,
    /// Low severity - automatic recovery, minimal logging
    Low,
    /// Medium severity - log for debugging, may affect functionality
    Medium,
    /// High severity - requires user attention or action
    High,
}

/// Extension trait for Result types to add SpeedGauge-specific error handling
pub trait ResultExt<T> {
    /// Converts errors to SpeedGaugeError with context
    fn with_context(self, context: &str) -> Result<T>;

    /// Logs error and continues with default value (for non-critical operations)
    fn log_and_continue(self, default: T) -> T;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_context(self, context: &str) -> Result<T> {
        self.map_err(|e| SpeedGaugeError::ConfigurationError(format!("{}: {}", context, e)))
    }

    fn log_and_continue(self, default: T) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Non-critical operation failed: {}", e);
                default
            }
        }
    }
}

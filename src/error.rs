use thiserror::Error;

/// Reasons a sample is not stored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("invalid sample value {value}")]
    InvalidSample { value: f64 },

    #[error("invalid sample timestamp {timestamp}")]
    InvalidTimestamp { timestamp: f64 },

    #[error("sample at {timestamp:.3}s is older than the newest stored sample at {last:.3}s")]
    OutOfOrder { timestamp: f64, last: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    /// The render target failed mid-tick; the loop stops.
    #[error("update loop failed: {0}")]
    LoopFailure(#[source] std::io::Error),
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The batch as a whole is not a collection of entries.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("unknown granularity `{0}` (expected day, week or month)")]
    InvalidGranularity(String),

    #[error("mood window must cover between 1 and 3660 days, got {0}")]
    InvalidWindow(u32),

    #[error("UTC offset must be within +/-1439 minutes, got {0}")]
    InvalidOffset(i32),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        AnalyticsError::InvalidInput {
            reason: reason.into(),
        }
    }
}

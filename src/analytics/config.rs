use chrono::FixedOffset;

use crate::analytics::period::Granularity;
use crate::error::{AnalyticsError, Result};

/// Longest mood window accepted from settings or the command line (ten years).
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// Offsets must stay strictly inside one day either side of UTC.
pub const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Tunables shared by the views of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Bucket size for the trend series
    pub granularity: Granularity,

    /// Trailing window (in days, today inclusive) for the daily mood scores
    pub window_days: u32,

    /// Offset used to turn absolute instants into local calendar days
    pub utc_offset_minutes: i32,
}

impl AnalyticsConfig {
    pub fn offset(&self) -> Result<FixedOffset> {
        validate_offset(self.utc_offset_minutes)
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Day,
            window_days: 7,
            utc_offset_minutes: 0,
        }
    }
}

pub fn validate_window(days: u32) -> Result<u32> {
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(AnalyticsError::InvalidWindow(days));
    }
    Ok(days)
}

pub fn validate_offset(minutes: i32) -> Result<FixedOffset> {
    if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
        return Err(AnalyticsError::InvalidOffset(minutes));
    }
    FixedOffset::east_opt(minutes * 60).ok_or(AnalyticsError::InvalidOffset(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds() {
        assert_eq!(validate_window(1).unwrap(), 1);
        assert_eq!(validate_window(MAX_WINDOW_DAYS).unwrap(), MAX_WINDOW_DAYS);
        assert!(matches!(validate_window(0), Err(AnalyticsError::InvalidWindow(0))));
        assert!(matches!(
            validate_window(4_000_000_000),
            Err(AnalyticsError::InvalidWindow(4_000_000_000))
        ));
    }

    #[test]
    fn offsets_beyond_a_day_are_rejected() {
        assert_eq!(validate_offset(-300).unwrap().local_minus_utc(), -18_000);
        assert_eq!(validate_offset(1439).unwrap().local_minus_utc(), 86_340);
        assert!(matches!(validate_offset(1440), Err(AnalyticsError::InvalidOffset(1440))));

        let config = AnalyticsConfig {
            utc_offset_minutes: 100_000,
            ..AnalyticsConfig::default()
        };
        assert!(matches!(config.offset(), Err(AnalyticsError::InvalidOffset(100_000))));
    }
}

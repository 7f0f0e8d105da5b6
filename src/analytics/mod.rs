//! Pure views over an immutable batch of emotion entries. Nothing in here
//! keeps state between calls; every result is recomputed from its input.

pub mod color;
pub mod config;
pub mod frequency;
pub mod heatmap;
pub mod mood;
pub mod period;
pub mod spectrum;
pub mod trend;

pub use color::{color_map, color_of, RgbColor};
pub use config::{validate_offset, validate_window, AnalyticsConfig, MAX_WINDOW_DAYS};
pub use frequency::{
    co_occurrence, distribution, emotion_frequency, CoOccurrenceMatrix, DistributionRow,
    FrequencyTable,
};
pub use heatmap::{heatmap, Heatmap, HeatmapCell};
pub use mood::{daily_scores, score_entries, DailyMood, MoodColor, MoodSummary};
pub use period::{group, Granularity, PeriodGrouping, PeriodKey};
pub use spectrum::{spectrum, Spectrum, SpectrumRank};
pub use trend::{trend, TrendLine, TrendPoint, TrendSeries};

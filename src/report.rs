//! Dashboard report: every view computed over one batch in a single call.

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::analytics::{
    co_occurrence, daily_scores, distribution, emotion_frequency, heatmap, trend, AnalyticsConfig,
    CoOccurrenceMatrix, DistributionRow, Heatmap, MoodSummary, TrendSeries,
};
use crate::ingest::Batch;
use crate::log_info;
use crate::models::EmotionEntry;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub entries: usize,
    pub dated_entries: usize,
    /// Catalog size when one was supplied, otherwise distinct emotions seen
    pub emotions: usize,
    pub activities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub today: NaiveDate,
    pub overview: Overview,
    pub distribution: Vec<DistributionRow>,
    pub co_occurrence: CoOccurrenceMatrix,
    pub activity_breakdown: IndexMap<String, IndexMap<String, usize>>,
    pub heatmap: Heatmap,
    pub trend: TrendSeries,
    pub mood: MoodSummary,
}

fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.collect::<IndexSet<_>>().len()
}

pub fn overview(batch: &Batch) -> Overview {
    let entries: &[EmotionEntry] = &batch.entries;
    let emotions = match batch.catalog.emotion_count() {
        0 => distinct(entries.iter().filter_map(EmotionEntry::emotion_name)),
        n => n,
    };
    let activities = match batch.catalog.activity_count() {
        0 => distinct(entries.iter().filter_map(EmotionEntry::activity_name)),
        n => n,
    };

    Overview {
        entries: entries.len(),
        dated_entries: entries.len().saturating_sub(batch.undated),
        emotions,
        activities,
    }
}

pub fn build_report(batch: &Batch, config: &AnalyticsConfig, today: NaiveDate) -> DashboardReport {
    let entries = &batch.entries;
    let matrix = co_occurrence(entries);

    let report = DashboardReport {
        today,
        overview: overview(batch),
        distribution: distribution(&emotion_frequency(entries)),
        activity_breakdown: matrix.by_activity(),
        co_occurrence: matrix,
        heatmap: heatmap(entries),
        trend: trend(entries, config.granularity),
        mood: daily_scores(entries, config.window_days, today),
    };

    log_info!(
        "Built report: {} entries, {} emotions, {} {} periods, {}-day mood window",
        report.overview.entries,
        report.distribution.len(),
        report.trend.series.len(),
        config.granularity,
        config.window_days
    );

    report
}

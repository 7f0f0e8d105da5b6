use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::analytics::color::{color_of, RgbColor};
use crate::analytics::period::{self, Granularity, PeriodKey};
use crate::models::EmotionEntry;

/// Emotion counts for one period. Emotions missing from `counts` are zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub period_key: PeriodKey,
    pub period_label: String,
    pub counts: IndexMap<String, usize>,
}

impl TrendPoint {
    pub fn count(&self, emotion: &str) -> usize {
        self.counts.get(emotion).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendLine {
    pub emotion: String,
    pub color: RgbColor,
}

/// A per-period emotion series. Zero points means no data; a single point is
/// returned as-is without padding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub granularity: Granularity,
    pub series: Vec<TrendPoint>,
    /// Distinct emotions in first-seen (chronological) order
    pub emotions: Vec<TrendLine>,
}

impl TrendSeries {
    pub fn emotion_names(&self) -> Vec<&str> {
        self.emotions.iter().map(|line| line.emotion.as_str()).collect()
    }
}

pub fn trend(entries: &[EmotionEntry], granularity: Granularity) -> TrendSeries {
    let grouping = period::group(entries, granularity);

    let mut emotions: IndexSet<&str> = IndexSet::new();
    let mut series = Vec::with_capacity(grouping.len());

    for (key, members) in grouping.iter() {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for name in members.iter().filter_map(|e| e.emotion_name()) {
            emotions.insert(name);
            *counts.entry(name.to_string()).or_insert(0) += 1;
        }
        series.push(TrendPoint {
            period_key: *key,
            period_label: key.label(),
            counts,
        });
    }

    TrendSeries {
        granularity,
        series,
        emotions: emotions
            .into_iter()
            .map(|name| TrendLine {
                emotion: name.to_string(),
                color: color_of(name),
            })
            .collect(),
    }
}

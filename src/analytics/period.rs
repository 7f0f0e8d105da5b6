//! Calendar bucketing of entries by day, ISO week or month.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::AnalyticsError;
use crate::models::EmotionEntry;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    pub fn key_for(&self, date: NaiveDate) -> PeriodKey {
        match self {
            Granularity::Day => PeriodKey::Day(date),
            Granularity::Week => {
                let iso = date.iso_week();
                PeriodKey::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            Granularity::Month => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }
}

impl FromStr for Granularity {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            other => Err(AnalyticsError::InvalidGranularity(other.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a calendar period. Keys of one granularity order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    /// Human-facing label: `Mar 04`, `Week 12, 2024` or `Mar 2024`.
    pub fn label(&self) -> String {
        match *self {
            PeriodKey::Day(date) => date.format("%b %d").to_string(),
            PeriodKey::Week { year, week } => format!("Week {week}, {year}"),
            PeriodKey::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1)
                .map(|first| first.format("%b %Y").to_string())
                .unwrap_or_else(|| format!("{year}-{month:02}")),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            PeriodKey::Week { year, week } => write!(f, "{year}-W{week:02}"),
            PeriodKey::Month { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Entries bucketed by period, in chronological order of first occurrence.
#[derive(Debug, Clone)]
pub struct PeriodGrouping<'a> {
    pub granularity: Granularity,
    buckets: IndexMap<PeriodKey, Vec<&'a EmotionEntry>>,
    /// Entries left out because they carry no usable timestamp
    pub skipped: usize,
}

impl<'a> PeriodGrouping<'a> {
    /// `(key, label)` for every non-empty period.
    pub fn periods(&self) -> Vec<(PeriodKey, String)> {
        self.buckets.keys().map(|key| (*key, key.label())).collect()
    }

    pub fn members(&self, key: &PeriodKey) -> &[&'a EmotionEntry] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PeriodKey, &[&'a EmotionEntry])> {
        self.buckets
            .iter()
            .map(|(key, members)| (key, members.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Timestamped entries in ascending time order; ties keep input order.
pub(crate) fn time_ordered(entries: &[EmotionEntry]) -> Vec<&EmotionEntry> {
    let mut ordered: Vec<&EmotionEntry> =
        entries.iter().filter(|e| e.created_at.is_some()).collect();
    ordered.sort_by_key(|e| e.created_at);
    ordered
}

/// Bucket entries into calendar periods. Only periods with at least one entry
/// are reported; entries without a timestamp are skipped.
pub fn group(entries: &[EmotionEntry], granularity: Granularity) -> PeriodGrouping<'_> {
    let ordered = time_ordered(entries);
    let skipped = entries.len() - ordered.len();

    let mut buckets: IndexMap<PeriodKey, Vec<&EmotionEntry>> = IndexMap::new();
    for entry in ordered {
        if let Some(day) = entry.day() {
            buckets
                .entry(granularity.key_for(day))
                .or_default()
                .push(entry);
        }
    }

    PeriodGrouping {
        granularity,
        buckets,
        skipped,
    }
}

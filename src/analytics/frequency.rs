//! Single-pass emotion counts and emotion × activity co-occurrence.

use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::analytics::color::{color_of, RgbColor};
use crate::models::EmotionEntry;

/// Emotion name → count, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    counts: IndexMap<String, usize>,
}

impl FrequencyTable {
    pub fn get(&self, emotion: &str) -> usize {
        self.counts.get(emotion).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Descending by count; equal counts keep first-seen order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut rows: Vec<(&str, usize)> = self.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }

    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }
}

/// One bar of the distribution view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRow {
    pub emotion: String,
    pub count: usize,
    /// Count relative to the most frequent emotion, in (0, 1]
    pub share: f64,
    pub color: RgbColor,
}

/// Counts per resolvable emotion. Entries without an emotion are not counted.
pub fn emotion_frequency(entries: &[EmotionEntry]) -> FrequencyTable {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for name in entries.iter().filter_map(EmotionEntry::emotion_name) {
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }
    FrequencyTable { counts }
}

/// Ranked distribution rows with colors and relative bar widths.
pub fn distribution(table: &FrequencyTable) -> Vec<DistributionRow> {
    let max = table.max_count();
    table
        .ranked()
        .into_iter()
        .map(|(emotion, count)| DistributionRow {
            emotion: emotion.to_string(),
            count,
            share: if max == 0 { 0.0 } else { count as f64 / max as f64 },
            color: color_of(emotion),
        })
        .collect()
}

/// (activity, emotion) → count, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoOccurrenceMatrix {
    cells: IndexMap<(String, String), usize>,
}

#[derive(Serialize)]
struct CellRef<'a> {
    activity: &'a str,
    emotion: &'a str,
    count: usize,
}

impl Serialize for CoOccurrenceMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.cells.len()))?;
        for ((activity, emotion), count) in &self.cells {
            seq.serialize_element(&CellRef {
                activity,
                emotion,
                count: *count,
            })?;
        }
        seq.end()
    }
}

impl CoOccurrenceMatrix {
    pub(crate) fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut cells: IndexMap<(String, String), usize> = IndexMap::new();
        for (activity, emotion) in pairs {
            *cells
                .entry((activity.to_string(), emotion.to_string()))
                .or_insert(0) += 1;
        }
        Self { cells }
    }

    /// Count for a cell; absent cells are zero.
    pub fn get(&self, activity: &str, emotion: &str) -> usize {
        self.cells
            .get(&(activity.to_string(), emotion.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.cells.values().sum()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.cells
            .iter()
            .map(|((activity, emotion), count)| (activity.as_str(), emotion.as_str(), *count))
    }

    pub fn max_count(&self) -> usize {
        self.cells.values().copied().max().unwrap_or(0)
    }

    /// Activity → (emotion → count), both levels in first-seen order.
    pub fn by_activity(&self) -> IndexMap<String, IndexMap<String, usize>> {
        let mut grouped: IndexMap<String, IndexMap<String, usize>> = IndexMap::new();
        for (activity, emotion, count) in self.iter() {
            grouped
                .entry(activity.to_string())
                .or_default()
                .insert(emotion.to_string(), count);
        }
        grouped
    }
}

/// Counts entries whose activity and emotion both resolve.
pub fn co_occurrence(entries: &[EmotionEntry]) -> CoOccurrenceMatrix {
    CoOccurrenceMatrix::from_pairs(
        entries
            .iter()
            .filter_map(|e| Some((e.activity_name()?, e.emotion_name()?))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, emotion: Option<&str>, activity: Option<&str>) -> EmotionEntry {
        let mut entry = EmotionEntry::new(id);
        if let Some(name) = emotion {
            entry = entry.with_emotion(name);
        }
        if let Some(name) = activity {
            entry = entry.with_activity(name);
        }
        entry
    }

    #[test]
    fn empty_batch_gives_empty_tables() {
        assert!(emotion_frequency(&[]).is_empty());
        assert!(co_occurrence(&[]).is_empty());
        assert!(distribution(&emotion_frequency(&[])).is_empty());
    }

    #[test]
    fn counts_resolvable_emotions_only() {
        let entries = vec![
            entry("1", Some("joy"), None),
            entry("2", Some("joy"), Some("work")),
            entry("3", Some("sad"), Some("work")),
            entry("4", None, Some("work")),
        ];
        let table = emotion_frequency(&entries);
        assert_eq!(table.get("joy"), 2);
        assert_eq!(table.get("sad"), 1);
        assert_eq!(table.get("angry"), 0);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn ranking_breaks_ties_by_first_seen() {
        let entries = vec![
            entry("1", Some("calm"), None),
            entry("2", Some("sad"), None),
            entry("3", Some("joy"), None),
            entry("4", Some("joy"), None),
            entry("5", Some("sad"), None),
        ];
        let table = emotion_frequency(&entries);
        assert_eq!(table.ranked(), vec![("sad", 2), ("joy", 2), ("calm", 1)]);
    }

    #[test]
    fn distribution_shares_are_relative_to_max() {
        let entries = vec![
            entry("1", Some("joy"), None),
            entry("2", Some("joy"), None),
            entry("3", Some("sad"), None),
        ];
        let rows = distribution(&emotion_frequency(&entries));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].emotion, "joy");
        assert_eq!(rows[0].share, 1.0);
        assert_eq!(rows[1].share, 0.5);
        assert_eq!(rows[1].color, color_of("sad"));
    }

    #[test]
    fn single_pair_occupies_one_cell() {
        let entries = vec![entry("1", Some("calm"), Some("running"))];
        let matrix = co_occurrence(&entries);
        assert_eq!(matrix.get("running", "calm"), 1);
        assert_eq!(matrix.get("running", "joy"), 0);
        assert_eq!(matrix.get("reading", "calm"), 0);
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn matrix_total_matches_fully_resolved_entries() {
        let entries = vec![
            entry("1", Some("joy"), Some("work")),
            entry("2", Some("joy"), Some("work")),
            entry("3", Some("sad"), Some("gym")),
            entry("4", None, Some("gym")),
            entry("5", Some("sad"), None),
        ];
        let matrix = co_occurrence(&entries);
        assert_eq!(matrix.total(), 3);
        assert_eq!(matrix.get("work", "joy"), 2);

        let breakdown = matrix.by_activity();
        let activities: Vec<&String> = breakdown.keys().collect();
        assert_eq!(activities, vec!["work", "gym"]);
        assert_eq!(breakdown["gym"]["sad"], 1);
    }

    #[test]
    fn matrix_serializes_as_cell_list() {
        let matrix = co_occurrence(&[entry("1", Some("calm"), Some("running"))]);
        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "activity": "running", "emotion": "calm", "count": 1 }])
        );
    }
}

//! Emotion spectrum: an ordering of emotions derived purely from when in the
//! day they tend to be logged.
//!
//! Each timestamped entry gets its zero-based position among the entries of
//! its calendar day (in time order). Emotions are ranked ascending by their
//! mean position. The result is used as a negative → positive axis for mood
//! scoring, but it only reflects order-of-logging. It is not a sentiment
//! classifier, and on sparse data it can produce counter-intuitive orders.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::analytics::period::time_ordered;
use crate::models::EmotionEntry;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct PositionTally {
    sum: u64,
    count: u64,
}

impl PositionTally {
    fn mean(&self) -> f64 {
        self.sum as f64 / self.count as f64
    }

    /// Exact comparison of the two means without going through floats.
    fn cmp_mean(&self, other: &Self) -> Ordering {
        (u128::from(self.sum) * u128::from(other.count))
            .cmp(&(u128::from(other.sum) * u128::from(self.count)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrumRank {
    pub emotion: String,
    pub mean_position: f64,
    pub samples: u64,
}

/// Distinct emotion names from most "early" to most "late" on average.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    ranks: IndexMap<String, SpectrumRank>,
}

impl Serialize for Spectrum {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ranks.values())
    }
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.ranks.keys().map(String::as_str).collect()
    }

    pub fn ranks(&self) -> impl Iterator<Item = &SpectrumRank> {
        self.ranks.values()
    }

    /// Zero-based index of an emotion on the spectrum.
    pub fn index_of(&self, emotion: &str) -> Option<usize> {
        self.ranks.get_index_of(emotion)
    }
}

/// Rank emotions by mean intra-day logging position.
///
/// Entries without a timestamp are ignored. Entries without an emotion still
/// take up a position in their day. Equal means keep the order in which the
/// emotions were first met in the time-ordered stream.
pub fn spectrum(entries: &[EmotionEntry]) -> Spectrum {
    let mut next_position: HashMap<NaiveDate, u64> = HashMap::new();
    let mut tallies: IndexMap<&str, PositionTally> = IndexMap::new();

    for entry in time_ordered(entries) {
        let Some(day) = entry.day() else {
            continue;
        };
        let slot = next_position.entry(day).or_insert(0);
        let position = *slot;
        *slot += 1;

        if let Some(name) = entry.emotion_name() {
            let tally = tallies.entry(name).or_default();
            tally.sum += position;
            tally.count += 1;
        }
    }

    let mut ordered: Vec<(&str, PositionTally)> = tallies.into_iter().collect();
    // sort_by is stable, so ties stay in discovery order
    ordered.sort_by(|a, b| a.1.cmp_mean(&b.1));

    Spectrum {
        ranks: ordered
            .into_iter()
            .map(|(name, tally)| {
                (
                    name.to_string(),
                    SpectrumRank {
                        emotion: name.to_string(),
                        mean_position: tally.mean(),
                        samples: tally.count,
                    },
                )
            })
            .collect(),
    }
}

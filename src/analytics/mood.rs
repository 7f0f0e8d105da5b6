use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::analytics::config::MAX_WINDOW_DAYS;
use crate::analytics::spectrum::{spectrum, Spectrum};
use crate::models::EmotionEntry;

/// Presentation color for a score: hue 0 is red, 120 is green.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodColor {
    pub hue: f64,
    pub css: String,
}

impl MoodColor {
    pub fn from_score(score: f64) -> Self {
        let hue = score * 120.0;
        Self {
            hue,
            css: format!("hsl({}, 70%, 50%)", hue.round()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMood {
    pub date: NaiveDate,
    pub weekday: String,
    /// Normalized score in [0, 1]; `None` when the day has no usable data
    pub score: Option<f64>,
    pub color: Option<MoodColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSummary {
    pub days: Vec<DailyMood>,
    pub spectrum: Spectrum,
}

/// Mean normalized spectrum position of the given entries. Entries whose
/// emotion is not on the spectrum are left out of the average.
pub fn score_entries(entries: &[&EmotionEntry], spectrum: &Spectrum) -> Option<f64> {
    let span = spectrum.len();
    if span <= 1 {
        return None;
    }

    let positions: Vec<usize> = entries
        .iter()
        .filter_map(|e| e.emotion_name())
        .filter_map(|name| spectrum.index_of(name))
        .collect();
    if positions.is_empty() {
        return None;
    }

    let total: f64 = positions
        .iter()
        .map(|&index| index as f64 / (span - 1) as f64)
        .sum();
    Some(total / positions.len() as f64)
}

/// One score per day for the `window_days` days ending at `today`, oldest
/// first. Days without entries are included with no score.
///
/// The window is capped at `MAX_WINDOW_DAYS`, and days that would fall before
/// the first representable date are left out.
pub fn daily_scores(entries: &[EmotionEntry], window_days: u32, today: NaiveDate) -> MoodSummary {
    let spectrum = spectrum(entries);

    let window_days = window_days.min(MAX_WINDOW_DAYS);

    let mut by_day: HashMap<NaiveDate, Vec<&EmotionEntry>> = HashMap::new();
    for entry in entries {
        if let Some(day) = entry.day() {
            by_day.entry(day).or_default().push(entry);
        }
    }

    let days = (0..window_days)
        .rev()
        .filter_map(|back| today.checked_sub_signed(Duration::days(i64::from(back))))
        .map(|date| {
            let score = by_day
                .get(&date)
                .and_then(|members| score_entries(members, &spectrum));
            DailyMood {
                date,
                weekday: date.format("%a").to_string(),
                score,
                color: score.map(MoodColor::from_score),
            }
        })
        .collect();

    MoodSummary { days, spectrum }
}

//! Emotion × activity heatmap. Unlike the strict co-occurrence matrix this
//! view substitutes the "Unknown ..." sentinels so every entry lands in a cell.

use serde::Serialize;

use crate::analytics::frequency::CoOccurrenceMatrix;
use crate::models::{EmotionEntry, UNKNOWN_ACTIVITY, UNKNOWN_EMOTION};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub activity: String,
    pub emotion: String,
    pub value: usize,
    /// `value / max value`, in (0, 1]
    pub intensity: f64,
    /// White → red ramp, `rgb(255, g, g)`
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    /// Sorted activity axis
    pub activities: Vec<String>,
    /// Sorted emotion axis
    pub emotions: Vec<String>,
    pub cells: Vec<HeatmapCell>,
}

impl Heatmap {
    pub fn value(&self, activity: &str, emotion: &str) -> usize {
        self.cells
            .iter()
            .find(|cell| cell.activity == activity && cell.emotion == emotion)
            .map(|cell| cell.value)
            .unwrap_or(0)
    }
}

fn intensity_color(intensity: f64) -> String {
    let fade = (255.0 * (1.0 - intensity)).round() as u8;
    format!("rgb(255, {fade}, {fade})")
}

pub fn heatmap(entries: &[EmotionEntry]) -> Heatmap {
    let matrix = CoOccurrenceMatrix::from_pairs(entries.iter().map(|e| {
        (
            e.activity_name().unwrap_or(UNKNOWN_ACTIVITY),
            e.emotion_name().unwrap_or(UNKNOWN_EMOTION),
        )
    }));
    let max = matrix.max_count();

    let mut activities: Vec<String> = Vec::new();
    let mut emotions: Vec<String> = Vec::new();
    let mut cells = Vec::with_capacity(matrix.len());

    for (activity, emotion, value) in matrix.iter() {
        if !activities.iter().any(|a| a == activity) {
            activities.push(activity.to_string());
        }
        if !emotions.iter().any(|e| e == emotion) {
            emotions.push(emotion.to_string());
        }
        let intensity = value as f64 / max as f64;
        cells.push(HeatmapCell {
            activity: activity.to_string(),
            emotion: emotion.to_string(),
            value,
            intensity,
            color: intensity_color(intensity),
        });
    }

    activities.sort();
    emotions.sort();

    Heatmap {
        activities,
        emotions,
        cells,
    }
}

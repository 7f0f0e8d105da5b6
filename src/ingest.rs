//! Turns a fetched JSON batch into normalised `EmotionEntry` records.
//!
//! Accepts either a bare array of entries or a dataset object carrying
//! `emotionEntries` plus optional `emotions`/`activities` catalogs.

use chrono::FixedOffset;
use serde_json::Value;

use crate::error::{AnalyticsError, Result};
use crate::models::entry::id_from_value;
use crate::models::{Activity, Catalog, Emotion, EmotionEntry, RawEntry, Reference};
use crate::utils::time::parse_local_datetime;
use crate::{log_debug, log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// A normalised batch ready for analysis.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub entries: Vec<EmotionEntry>,
    pub catalog: Catalog,
    /// Entries whose timestamp was missing or unparseable
    pub undated: usize,
}

pub fn parse_batch(json: &str, offset: &FixedOffset) -> Result<Batch> {
    let value: Value = serde_json::from_str(json)?;
    batch_from_value(value, offset)
}

pub fn batch_from_value(value: Value, offset: &FixedOffset) -> Result<Batch> {
    let (raw_entries, catalog) = match value {
        Value::Array(items) => (items, Catalog::default()),
        Value::Object(mut map) => {
            let items = match map.remove("emotionEntries").or_else(|| map.remove("entries")) {
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(AnalyticsError::invalid_input(
                        "`emotionEntries` must be an array",
                    ))
                }
                None => {
                    return Err(AnalyticsError::invalid_input(
                        "dataset object has no `emotionEntries` array",
                    ))
                }
            };
            let emotions: Vec<Emotion> = catalog_list(map.remove("emotions"), "emotions")?;
            let activities: Vec<Activity> = catalog_list(map.remove("activities"), "activities")?;
            (items, Catalog::new(emotions, activities))
        }
        other => {
            return Err(AnalyticsError::invalid_input(format!(
                "expected an array of entries, got {}",
                kind_of(&other)
            )))
        }
    };

    let mut entries = Vec::with_capacity(raw_entries.len());
    for (index, item) in raw_entries.into_iter().enumerate() {
        let map = match item {
            Value::Object(map) => map,
            other => {
                return Err(AnalyticsError::invalid_input(format!(
                    "entry #{index} is {}, not an object",
                    kind_of(&other)
                )))
            }
        };
        entries.push(normalize(RawEntry::from_object(map), index, &catalog, offset));
    }

    let undated = entries.iter().filter(|e| e.created_at.is_none()).count();
    if undated > 0 {
        log_warn!(
            "{} of {} entries have no usable timestamp; they are left out of time-based views",
            undated,
            entries.len()
        );
    }
    log_info!("Ingested {} emotion entries", entries.len());

    Ok(Batch {
        entries,
        catalog,
        undated,
    })
}

/// Catalog items that do not deserialize are skipped, not fatal.
fn catalog_list<T: serde::de::DeserializeOwned>(value: Option<Value>, field: &str) -> Result<Vec<T>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    log_warn!("Skipping `{}` item #{}: {}", field, index, err);
                    None
                }
            })
            .collect()),
        Some(other) => Err(AnalyticsError::invalid_input(format!(
            "`{field}` must be an array, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn resolve<T: serde::de::DeserializeOwned>(
    reference: Option<Value>,
    lookup: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    match Reference::from_value(reference?)? {
        Reference::Populated(item) => Some(item),
        Reference::Id(id) => lookup(&id),
    }
}

/// Normalise one wire record. Never fails: bad or non-string timestamps
/// become `None` and unresolved references stay empty.
pub fn normalize(raw: RawEntry, index: usize, catalog: &Catalog, offset: &FixedOffset) -> EmotionEntry {
    let id = raw
        .id
        .as_ref()
        .and_then(id_from_value)
        .unwrap_or_else(|| format!("entry-{index}"));

    let created_at = match raw.created_at {
        None => None,
        Some(Value::String(text)) => match parse_local_datetime(&text, offset, "createdAt") {
            Ok(ts) => Some(ts),
            Err(err) => {
                log_debug!("Entry {}: {:#}", id, err);
                None
            }
        },
        Some(other) => {
            log_debug!("Entry {}: createdAt is {}, not a string", id, kind_of(&other));
            None
        }
    };

    let emotion = resolve(raw.emotion, |key| catalog.emotion(key).cloned())
        .filter(|emotion| !emotion.name.is_empty());
    let activity = resolve(raw.activity, |key| catalog.activity(key).cloned())
        .filter(|activity| !activity.name.is_empty());

    EmotionEntry {
        id,
        created_at,
        emotion,
        activity,
        description: raw.description,
        voice_message: raw.voice_message,
    }
}

//! Emotion-entry data models.
//!
//! `RawEntry` mirrors the wire shape handed over by the entry service;
//! `EmotionEntry` is the normalised record every analytics view consumes.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Display name used by sentinel-aware views for entries without an emotion.
pub const UNKNOWN_EMOTION: &str = "Unknown emotion";
/// Display name used by sentinel-aware views for entries without an activity.
pub const UNKNOWN_ACTIVITY: &str = "Unknown activity";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Emotion {
    #[serde(alias = "_id", default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reaction: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(alias = "_id", default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A normalised entry. `created_at` is local wall-clock time; `None` when the
/// source timestamp could not be parsed.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmotionEntry {
    pub id: String,
    pub created_at: Option<NaiveDateTime>,
    pub emotion: Option<Emotion>,
    pub activity: Option<Activity>,
    /// Opaque payloads, passed through untouched
    pub description: Option<Value>,
    pub voice_message: Option<Value>,
}

impl EmotionEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            emotion: None,
            activity: None,
            description: None,
            voice_message: None,
        }
    }

    pub fn at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_emotion(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.emotion = Some(Emotion {
            id: name.to_lowercase(),
            name,
            reaction: None,
            description: None,
        });
        self
    }

    pub fn with_activity(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.activity = Some(Activity {
            id: name.to_lowercase(),
            name,
        });
        self
    }

    /// Emotion name, if the reference resolved to a named emotion.
    pub fn emotion_name(&self) -> Option<&str> {
        self.emotion
            .as_ref()
            .map(|e| e.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn activity_name(&self) -> Option<&str> {
        self.activity
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Local calendar day of the entry.
    pub fn day(&self) -> Option<NaiveDate> {
        self.created_at.map(|ts| ts.date())
    }
}

/// Ids arrive as strings or numbers; anything else is treated as absent.
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(id_from_value(&Value::deserialize(deserializer)?).unwrap_or_default())
}

/// A reference as delivered on the wire: either populated or a bare id.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference<T> {
    Populated(T),
    Id(String),
}

impl<T: DeserializeOwned> Reference<T> {
    /// `None` for null and for values of the wrong shape.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value).ok().map(Reference::Populated),
            other => id_from_value(&other).map(Reference::Id),
        }
    }
}

/// One wire record. Every field is kept as raw JSON so that a single
/// odd-typed field never rejects the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub id: Option<Value>,
    pub created_at: Option<Value>,
    pub emotion: Option<Value>,
    pub activity: Option<Value>,
    pub description: Option<Value>,
    pub voice_message: Option<Value>,
}

fn take_first(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    let mut found = None;
    for key in keys {
        if let Some(value) = map.remove(*key) {
            if found.is_none() && !value.is_null() {
                found = Some(value);
            }
        }
    }
    found
}

impl RawEntry {
    pub fn from_object(mut map: Map<String, Value>) -> Self {
        Self {
            id: take_first(&mut map, &["_id", "id"]),
            created_at: take_first(&mut map, &["createdAt", "created_at"]),
            emotion: take_first(&mut map, &["emotion", "emotion_id", "emotionId"]),
            activity: take_first(&mut map, &["activity", "activity_id", "activityId"]),
            description: take_first(&mut map, &["description"]),
            voice_message: take_first(&mut map, &["voiceMessage", "voice_message"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn raw_entry_keeps_odd_typed_fields() {
        let raw = RawEntry::from_object(object(json!({
            "_id": 7,
            "createdAt": 1709539200000_u64,
            "emotion_id": { "_id": 3, "name": "joy" },
            "description": { "text": "long day" },
            "voiceMessage": null
        })));
        assert_eq!(raw.id, Some(json!(7)));
        assert_eq!(raw.created_at, Some(json!(1709539200000_u64)));
        assert_eq!(raw.description, Some(json!({ "text": "long day" })));
        assert_eq!(raw.voice_message, None);
    }

    #[test]
    fn first_non_null_alias_wins() {
        let raw = RawEntry::from_object(object(json!({
            "emotion": null,
            "emotion_id": "m1"
        })));
        assert_eq!(raw.emotion, Some(json!("m1")));
    }

    #[test]
    fn references_of_the_wrong_shape_are_dropped() {
        assert_eq!(
            Reference::<Emotion>::from_value(json!(12)),
            Some(Reference::Id("12".into()))
        );
        assert_eq!(Reference::<Emotion>::from_value(json!([1, 2])), None);
        assert_eq!(Reference::<Emotion>::from_value(json!({ "name": 5 })), None);

        match Reference::<Emotion>::from_value(json!({ "_id": 3, "name": "joy" })) {
            Some(Reference::Populated(emotion)) => {
                assert_eq!(emotion.id, "3");
                assert_eq!(emotion.name, "joy");
            }
            other => panic!("expected a populated emotion, got {other:?}"),
        }
    }
}

use std::collections::HashMap;

use crate::models::{Activity, Emotion};

/// Reference entities used to resolve id-only entry references.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    emotions: HashMap<String, Emotion>,
    activities: HashMap<String, Activity>,
}

impl Catalog {
    pub fn new(emotions: Vec<Emotion>, activities: Vec<Activity>) -> Self {
        Self {
            emotions: emotions.into_iter().map(|e| (e.id.clone(), e)).collect(),
            activities: activities.into_iter().map(|a| (a.id.clone(), a)).collect(),
        }
    }

    pub fn emotion(&self, id: &str) -> Option<&Emotion> {
        self.emotions.get(id)
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.get(id)
    }

    pub fn emotion_count(&self) -> usize {
        self.emotions.len()
    }

    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emotions.is_empty() && self.activities.is_empty()
    }
}

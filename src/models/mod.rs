pub mod catalog;
pub mod entry;

pub use catalog::Catalog;
pub use entry::{
    Activity, Emotion, EmotionEntry, RawEntry, Reference, UNKNOWN_ACTIVITY, UNKNOWN_EMOTION,
};

//! Deterministic name → color mapping.
//!
//! Every view that shows an emotion derives its color from the name alone, so
//! independently rendered charts agree without sharing any palette state.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 32-bit signed rolling hash (multiplier 31) over UTF-16 code units.
fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |hash, unit| {
        // hash * 31 + unit, wrapping at every step
        (unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

/// Map a name to its color. Collisions between names are possible and left alone.
pub fn color_of(name: &str) -> RgbColor {
    let hash = name_hash(name);
    let byte = |i: u32| ((hash >> (8 * i)) & 0xff) as u8;
    RgbColor {
        r: byte(0),
        g: byte(1),
        b: byte(2),
    }
}

/// Color every name in `names`, keeping their order.
pub fn color_map<'a, I>(names: I) -> IndexMap<String, RgbColor>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(|name| (name.to_string(), color_of(name)))
        .collect()
}

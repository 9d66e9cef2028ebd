//! Document model: placed elements, their categories, and the persisted shape.
//!
//! This module defines what sits on the map (`SceneElement`, `Category`), the
//! JSON document the editor imports and exports (`MapDocument`,
//! `ElementRecord`), and the coercion rules applied when reading documents
//! written by hand or by older editor builds.
//!
//! Export writes whole-valued numbers as JSON integers. Import accepts numbers
//! or numeric strings; integer fields take the leading integer of a string and
//! truncate floats.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::{CatalogLookupError, ImageHandle};
use crate::viewport::Point;

/// Runtime identity of a placed element. Never persisted.
pub type ElementId = Uuid;

/// Semantic class of a placed element; also the sprite sub-catalog key and the
/// persisted `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "wall")]
    Wall,
    #[serde(rename = "wallAnim")]
    WallAnimated,
    #[serde(rename = "floor")]
    Floor,
    #[serde(rename = "interactable")]
    Interactable,
    #[serde(rename = "interactableAnim")]
    InteractableAnimated,
    #[serde(rename = "doors")]
    Door,
    #[serde(rename = "weapon")]
    Weapon,
    #[serde(rename = "potion")]
    Potion,
    #[serde(rename = "enemy")]
    Enemy,
    #[serde(rename = "player")]
    Player,
}

impl Category {
    /// Every category, in palette order.
    pub const ALL: [Category; 10] = [
        Self::Wall,
        Self::WallAnimated,
        Self::Floor,
        Self::Interactable,
        Self::InteractableAnimated,
        Self::Door,
        Self::Weapon,
        Self::Potion,
        Self::Enemy,
        Self::Player,
    ];

    /// The persisted `type` tag.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::WallAnimated => "wallAnim",
            Self::Floor => "floor",
            Self::Interactable => "interactable",
            Self::InteractableAnimated => "interactableAnim",
            Self::Door => "doors",
            Self::Weapon => "weapon",
            Self::Potion => "potion",
            Self::Enemy => "enemy",
            Self::Player => "player",
        }
    }

    /// Parse a persisted `type` tag. Tags are case-sensitive.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

/// A sprite placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneElement {
    /// Runtime identity used by drag state and host actions.
    pub id: ElementId,
    /// Top-left corner in scene coordinates.
    pub position: Point,
    width: f64,
    height: f64,
    /// Sprite name; exported as `id`. Not unique.
    pub sprite_id: String,
    pub category: Category,
    /// Index into the category's sprite list.
    pub catalog_index: usize,
    /// Set only while the element is being dragged.
    pub highlighted: bool,
    /// Resolved image; re-resolved from the catalog on every load.
    pub image: ImageHandle,
}

impl SceneElement {
    /// Create an element with a fresh runtime id. Size is fixed from here on.
    #[must_use]
    pub fn new(
        position: Point,
        width: f64,
        height: f64,
        sprite_id: impl Into<String>,
        category: Category,
        catalog_index: usize,
        image: ImageHandle,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            sprite_id: sprite_id.into(),
            category,
            catalog_index,
            highlighted: false,
            image,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Persisted form of this element.
    #[must_use]
    pub fn to_record(&self) -> ElementRecord {
        ElementRecord {
            x: self.position.x,
            y: self.position.y,
            width: self.width,
            height: self.height,
            id: self.sprite_id.clone(),
            kind: self.category.tag().to_owned(),
            index: self.catalog_index,
        }
    }
}

/// One element as it appears in an exported document or backup.
///
/// `kind` holds the raw `type` tag so that unknown tags survive parsing and
/// can be skipped per record instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    #[serde(serialize_with = "write_number", deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(serialize_with = "write_number", deserialize_with = "lenient_f64")]
    pub y: f64,
    #[serde(serialize_with = "write_number", deserialize_with = "lenient_f64")]
    pub width: f64,
    #[serde(serialize_with = "write_number", deserialize_with = "lenient_f64")]
    pub height: f64,
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "lenient_usize")]
    pub index: usize,
}

/// The exported map document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDocument {
    pub width: u32,
    pub height: u32,
    pub elements: Vec<ElementRecord>,
}

/// Document as read from disk: dimensions are coerced, element records are
/// kept raw so each can fail on its own.
#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(deserialize_with = "lenient_u32")]
    pub(crate) width: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub(crate) height: u32,
    #[serde(default)]
    pub(crate) elements: Vec<Value>,
}

/// Why a record was left out of a load.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The `type` tag names no known category.
    UnknownType(String),
    /// The category is known but the catalog has no sprite at `index`.
    Catalog(CatalogLookupError),
    /// A field was missing or could not be coerced.
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(tag) => write!(f, "unknown element type `{tag}`"),
            Self::Catalog(e) => write!(f, "{e}"),
            Self::Malformed(msg) => write!(f, "malformed record: {msg}"),
        }
    }
}

/// A record that was skipped during a load.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Position of the record in the document's `elements` array.
    pub position: usize,
    pub reason: SkipReason,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Errors raised by scene-level operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The document was not valid JSON or lacked the map dimensions.
    #[error("failed to parse map document: {0}")]
    Parse(#[source] serde_json::Error),
    /// The document could not be written.
    #[error("failed to serialize map document: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogLookupError),
}

// =============================================================
// Number output
// =============================================================

/// Largest integer an `f64` holds exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Write whole-valued floats as JSON integers so `16.0` exports as `16`.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp, clippy::trivially_copy_pass_by_ref)]
fn write_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

// =============================================================
// Lenient input
// =============================================================

/// Coerce a JSON scalar to a float. Strings are trimmed and parsed whole.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a JSON scalar to an integer the way `parseInt` does: floats are
/// truncated, strings contribute their leading integer digits.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(v) => Some(v),
            None => n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64),
        },
        Value::String(s) => leading_int(s),
        _ => None,
    }
}

fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(v) => Some(sign * v),
        Err(_) => None,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    coerce_f64(&value).ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {value}")))
}

fn lenient_usize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match coerce_i64(&value).map(usize::try_from) {
        Some(Ok(v)) => Ok(v),
        _ => Err(serde::de::Error::custom(format!("expected a non-negative integer, got {value}"))),
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match coerce_i64(&value).map(u32::try_from) {
        Some(Ok(v)) => Ok(v),
        _ => Err(serde::de::Error::custom(format!("expected a map dimension, got {value}"))),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Err(serde::de::Error::custom("expected a sprite id, got null")),
        other => Ok(other.to_string()),
    }
}

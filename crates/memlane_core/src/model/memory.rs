//! Memory record domain model.
//!
//! # Responsibility
//! - Define the record shape shared by the feed, review and layout modules.
//! - Define the richer REST detail shape used by detail views.
//!
//! # Invariants
//! - `id` is the store-assigned key and is unique within one snapshot.
//! - A record without a usable `image_url` is still a valid record.
//! - `timestamp` keeps the raw store text; parsing is lazy and fallible.
//! - Mistyped record fields decode leniently: scalars become text, anything
//!   else becomes absent. A record body is never rejected for a field type.

use crate::model::timestamp::{MemoryTimestamp, TimestampParseError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Store-assigned record key.
pub type MemoryId = String;

/// Canonical memory record as delivered by the real-time store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Store key. Not part of the stored body; filled from the snapshot key.
    #[serde(default, skip_serializing)]
    pub id: MemoryId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub topic: String,
    #[serde(
        default,
        alias = "imageUrl",
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    /// Raw `YYYY-MM-DD HH-MM-SS` text.
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: String,
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub emotion: Option<String>,
}

impl MemoryRecord {
    pub fn new(
        id: impl Into<MemoryId>,
        topic: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            image_url: None,
            timestamp: timestamp.into(),
            summary: None,
            emotion: None,
        }
    }

    /// Parses the raw timestamp.
    pub fn parsed_timestamp(&self) -> Result<MemoryTimestamp, TimestampParseError> {
        MemoryTimestamp::parse(&self.timestamp)
    }

    /// Card label for the timestamp, falling back to the raw text.
    pub fn display_timestamp(&self) -> String {
        match self.parsed_timestamp() {
            Ok(parsed) => parsed.display(),
            Err(_) => self.timestamp.clone(),
        }
    }

    /// Returns the image URL when present and non-blank.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Whether the timestamp starts with the given `YYYY-MM-DD` prefix.
    pub fn is_on_date(&self, date_prefix: &str) -> bool {
        self.timestamp.starts_with(date_prefix)
    }
}

/// Strings pass through, numbers and booleans are rendered, the rest is empty.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Only strings count; any other JSON type reads as absent.
fn lenient_optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Descriptive metadata attached by the generation backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMetadata {
    #[serde(default, alias = "conversationType")]
    pub conversation_type: String,
    #[serde(default, alias = "emotionalTone")]
    pub emotional_tone: String,
    #[serde(default, alias = "importanceLevel")]
    pub importance_level: i64,
    #[serde(default, alias = "visualStyle")]
    pub visual_style: String,
}

/// Full memory shape returned by the REST API for detail views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDetail {
    #[serde(default)]
    pub id: MemoryId,
    #[serde(default)]
    pub topic: String,
    #[serde(default, alias = "dallEPrompt")]
    pub dalle_prompt: Option<String>,
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub sentences: Vec<String>,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub metadata: MemoryMetadata,
}

impl MemoryDetail {
    /// Projects the detail shape onto the record shape used by list views.
    pub fn to_record(&self) -> MemoryRecord {
        MemoryRecord {
            id: self.id.clone(),
            topic: self.topic.clone(),
            image_url: self.image_url.clone(),
            timestamp: self.timestamp.clone(),
            summary: Some(self.summary.clone()).filter(|value| !value.is_empty()),
            emotion: self.emotion.clone().or_else(|| {
                Some(self.metadata.emotional_tone.clone()).filter(|value| !value.is_empty())
            }),
        }
    }
}

//! Core records: raw channel signals in, structured ideas out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RawSignal
// ---------------------------------------------------------------------------

/// One candidate post pulled from an external channel.
///
/// Ephemeral ideation input — flows through the filter and extractor but is
/// never persisted. Every field is required; records missing any of them are
/// dropped during decode rather than defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSignal {
    /// Post id, unique within one channel batch.
    pub id: String,
    /// Channel name, stored bare (`startups`, not `r/startups`).
    pub subreddit: String,
    pub title: String,
    pub body: String,
    /// Popularity metric; drives the deterministic filter fallback.
    pub upvotes: i64,
    pub num_comments: i64,
    /// Epoch seconds as reported by the channel (fractional upstream).
    pub created_utc: f64,
}

// ---------------------------------------------------------------------------
// Topic taxonomy
// ---------------------------------------------------------------------------

/// Closed categorical tag on an [`Idea`].
///
/// The set is fixed; anything outside it coerces to [`Topic::Other`] via
/// [`Topic::parse_lenient`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Devtools,
    Health,
    Education,
    Finance,
    Business,
    Other,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Devtools,
        Topic::Health,
        Topic::Education,
        Topic::Finance,
        Topic::Business,
        Topic::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Devtools => "devtools",
            Topic::Health => "health",
            Topic::Education => "education",
            Topic::Finance => "finance",
            Topic::Business => "business",
            Topic::Other => "other",
        }
    }

    /// Parses a topic string, coercing unknown values to the catch-all.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Topic {
        match raw.trim() {
            "devtools" => Topic::Devtools,
            "health" => Topic::Health,
            "education" => Topic::Education,
            "finance" => Topic::Finance,
            "business" => Topic::Business,
            _ => Topic::Other,
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Idea
// ---------------------------------------------------------------------------

/// Where an idea came from: channel name plus an optional permalink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaSource {
    pub subreddit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One structured product-idea record.
///
/// Created once by the extractor, persisted once, immutable afterwards.
/// Serialized field names are camelCase to match the snapshot file format.
/// `is_new` is a read-time projection and is excluded from every persisted
/// form (`#[serde(skip)]`); the HTTP layer re-exposes it on its own item
/// type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub title: String,
    pub elevator_pitch: String,
    pub pain_point: String,
    pub topic: Topic,
    /// Integer score, always within `0..=100`.
    pub score: i16,
    pub source: IdeaSource,
    /// Server-assigned at acceptance; `None` only on legacy records read
    /// back from storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub is_new: bool,
}

/// Dedup key: idea titles compare case-insensitively, whitespace-trimmed.
#[must_use]
pub fn normalized_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Rounds and clamps a raw numeric score into the valid `0..=100` range.
#[must_use]
pub fn clamp_score(raw: f64) -> i16 {
    #[allow(clippy::cast_possible_truncation)]
    let clamped = raw.round().clamp(0.0, 100.0) as i16;
    clamped
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column order shared by every export format.
pub const RECORD_FIELDS: [&str; 12] = [
    "username",
    "full_name",
    "followers_count",
    "following_count",
    "bio",
    "profile_url",
    "posts_count",
    "engagement_rate",
    "is_verified",
    "profile_image",
    "fetched_at",
    "source",
];

/// A validated public profile snapshot.
///
/// Only [`crate::validate_and_clean`] builds these from untrusted input, so a
/// value of this type always has a normalized, non-empty `username` and a
/// `profile_url` with an HTTP scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub username: String,
    pub full_name: String,
    pub followers_count: u64,
    pub following_count: u64,
    pub bio: String,
    pub profile_url: String,
    pub posts_count: u64,
    pub engagement_rate: Option<f64>,
    pub is_verified: bool,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Live,
    Mock,
    Cached,
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::Live => write!(f, "live"),
            RecordSource::Mock => write!(f, "mock"),
            RecordSource::Cached => write!(f, "cached"),
        }
    }
}

/// A [`ProfileRecord`] stamped by the collector with when and how it was
/// obtained. This is the shape the export writers consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedProfile {
    #[serde(flatten)]
    pub profile: ProfileRecord,
    pub fetched_at: DateTime<Utc>,
    pub source: RecordSource,
}

impl CollectedProfile {
    #[must_use]
    pub fn new(profile: ProfileRecord, fetched_at: DateTime<Utc>, source: RecordSource) -> Self {
        Self {
            profile,
            fetched_at,
            source,
        }
    }

    /// `fetched_at` as written to text outputs, e.g. `2026-10-19T08:30:00Z`.
    #[must_use]
    pub fn fetched_at_rfc3339(&self) -> String {
        self.fetched_at
            .to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
    }
}

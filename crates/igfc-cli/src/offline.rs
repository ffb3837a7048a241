//! `--no-network` mode: reuse a previous JSON export or fabricate clearly
//! labelled mock records so the export pipeline can run end to end.

use std::path::Path;

use chrono::{DateTime, Utc};
use igfc_core::{
    canonical_profile_url, validate_and_clean, validate_collected, CollectedProfile, RawProfile,
    RecordSource,
};
use serde_json::{json, Value};

const MOCK_FOLLOWERS: u64 = 12_345;
const MOCK_FOLLOWING: u64 = 150;
const MOCK_POSTS: u64 = 50;
const MOCK_ENGAGEMENT_RATE: f64 = 2.1;

/// Cached records from `cache_path` when usable, otherwise mock records for
/// `handles`.
pub(crate) fn collect_offline(
    cache_path: &Path,
    handles: &[String],
    fetched_at: DateTime<Utc>,
) -> Vec<CollectedProfile> {
    if let Some(cached) = load_cached(cache_path).filter(|records| !records.is_empty()) {
        tracing::info!(
            path = %cache_path.display(),
            records = cached.len(),
            "loaded cached records"
        );
        return cached;
    }

    let records = mock_records(handles, fetched_at);
    tracing::info!(records = records.len(), "generated mock records (no-network mode)");
    records
}

/// Re-validates a previous JSON export. `None` when the file is missing,
/// unreadable, or not a JSON array; invalid elements are skipped.
pub(crate) fn load_cached(path: &Path) -> Option<Vec<CollectedProfile>> {
    if !path.exists() {
        return None;
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read cached JSON");
            return None;
        }
    };
    let items = match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "cached JSON is not an array");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse cached JSON");
            return None;
        }
    };

    let records = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match validate_collected(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping invalid cached record");
                None
            }
        })
        .collect();
    Some(records)
}

/// One mock record per handle, stamped `source = mock`.
pub(crate) fn mock_records(handles: &[String], fetched_at: DateTime<Utc>) -> Vec<CollectedProfile> {
    handles
        .iter()
        .filter_map(|handle| {
            let raw = mock_raw(handle);
            match validate_and_clean(&raw) {
                Ok(profile) => Some(CollectedProfile::new(profile, fetched_at, RecordSource::Mock)),
                Err(e) => {
                    tracing::warn!(username = %handle, error = %e, "skipping invalid mock record");
                    None
                }
            }
        })
        .collect()
}

fn mock_raw(handle: &str) -> RawProfile {
    let mut raw = RawProfile::new();
    raw.insert("username".into(), json!(handle));
    raw.insert("full_name".into(), json!(capitalize(handle)));
    raw.insert("followers_count".into(), json!(MOCK_FOLLOWERS));
    raw.insert("following_count".into(), json!(MOCK_FOLLOWING));
    raw.insert("bio".into(), json!(format!("Mock bio for {handle}")));
    raw.insert("profile_url".into(), json!(canonical_profile_url(handle)));
    raw.insert("posts_count".into(), json!(MOCK_POSTS));
    raw.insert("engagement_rate".into(), json!(MOCK_ENGAGEMENT_RATE));
    raw.insert("is_verified".into(), json!(false));
    raw.insert(
        "profile_image".into(),
        json!(format!("https://instagram.com/{handle}/profile.jpg")),
    );
    raw
}

fn capitalize(handle: &str) -> String {
    let mut chars = handle.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles() -> Vec<String> {
        vec!["nike".to_string(), "natgeo".to_string()]
    }

    #[test]
    fn mock_records_are_labelled_and_complete() {
        let now = Utc::now();
        let records = mock_records(&handles(), now);
        assert_eq!(records.len(), 2);

        let nike = &records[0];
        assert_eq!(nike.source, RecordSource::Mock);
        assert_eq!(nike.fetched_at, now);
        assert_eq!(nike.profile.full_name, "Nike");
        assert_eq!(nike.profile.followers_count, 12_345);
        assert_eq!(nike.profile.following_count, 150);
        assert_eq!(nike.profile.posts_count, 50);
        assert_eq!(nike.profile.engagement_rate, Some(2.1));
        assert_eq!(nike.profile.bio, "Mock bio for nike");
        assert_eq!(nike.profile.profile_url, "https://www.instagram.com/nike/");
    }

    #[test]
    fn capitalize_handles_edge_cases() {
        assert_eq!(capitalize("natgeo"), "Natgeo");
        assert_eq!(capitalize("_under"), "_under");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn missing_cache_falls_back_to_mocks() {
        let dir = tempfile::tempdir().unwrap();
        let records = collect_offline(&dir.path().join("output.json"), &handles(), Utc::now());
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.source == RecordSource::Mock));
    }

    #[test]
    fn cached_records_are_revalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        let cached = json!([
            {
                "username": "@Nike",
                "followers_count": "1,000",
                "following_count": 5,
                "fetched_at": "2026-10-01T12:00:00Z",
                "source": "live"
            },
            {"username": "legacy", "followersCount": 7, "followingCount": 1, "timestamp": "2026-10-02T00:00:00Z"},
            {"username": "broken", "followers_count": "abc", "following_count": 1, "fetched_at": "2026-10-01T12:00:00Z"},
            "not an object"
        ]);
        std::fs::write(&path, cached.to_string()).unwrap();

        let records = collect_offline(&path, &handles(), Utc::now());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].profile.username, "nike");
        assert_eq!(records[0].profile.followers_count, 1000);
        assert_eq!(records[0].source, RecordSource::Live);
        assert_eq!(records[1].profile.username, "legacy");
        assert_eq!(records[1].source, RecordSource::Cached);
    }

    #[test]
    fn non_array_or_corrupt_cache_uses_mocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");

        std::fs::write(&path, r#"{"username": "nike"}"#).unwrap();
        assert!(load_cached(&path).is_none());
        assert!(collect_offline(&path, &handles(), Utc::now())
            .iter()
            .all(|r| r.source == RecordSource::Mock));

        std::fs::write(&path, "[{").unwrap();
        assert!(load_cached(&path).is_none());
    }

    #[test]
    fn cache_with_only_invalid_records_uses_mocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        std::fs::write(&path, r#"[{"username": ""}]"#).unwrap();

        assert_eq!(load_cached(&path).map(|r| r.len()), Some(0));
        let records = collect_offline(&path, &handles(), Utc::now());
        assert_eq!(records.len(), 2);
    }
}

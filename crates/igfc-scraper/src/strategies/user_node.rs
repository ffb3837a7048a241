//! Mapping from the remote service's `user` node to a [`RawProfile`].
//!
//! The API endpoint and the legacy embedded blobs share this node shape, with
//! field names that drifted between releases; each field lists its current
//! path first and its legacy path second.

use igfc_core::{ensure_int, RawProfile};
use serde_json::{json, Value};

use super::StrategyMiss;

const FOLLOWERS: &[&str] = &["edge_followed_by.count", "follower_count"];
const FOLLOWING: &[&str] = &["edge_follow.count", "following_count"];
const POSTS: &[&str] = &["edge_owner_to_timeline_media.count", "media_count"];
const PROFILE_IMAGE: &[&str] = &["profile_pic_url_hd", "profile_pic_url"];
const RECENT_POSTS: &str = "edge_owner_to_timeline_media.edges";
const POST_LIKES: &[&str] = &["edge_liked_by.count", "edge_media_preview_like.count"];
const POST_COMMENTS: &[&str] = &["edge_media_to_comment.count"];

/// Returns the first non-null value found at any of the dotted `paths`.
pub(super) fn pick<'a>(node: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| {
        path.split('.')
            .try_fold(node, |current, key| current.get(key))
            .filter(|value| !value.is_null())
    })
}

/// Maps a `user` node into raw profile fields.
///
/// Missing counts default to `0`; `username` falls back to the handle that
/// was requested.
///
/// # Errors
///
/// Returns [`StrategyMiss::NotFound`] when `node` is not a non-empty object.
pub(super) fn profile_from_user_node(
    node: &Value,
    requested: &str,
) -> Result<RawProfile, StrategyMiss> {
    if !node.as_object().is_some_and(|map| !map.is_empty()) {
        return Err(StrategyMiss::NotFound("user node"));
    }

    let text = |path: &str| {
        pick(node, &[path])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let count = |paths: &[&str]| pick(node, paths).cloned().unwrap_or(json!(0));

    let username = pick(node, &["username"])
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(requested);

    let mut raw = RawProfile::new();
    raw.insert("username".into(), json!(username));
    raw.insert("full_name".into(), json!(text("full_name")));
    raw.insert("followers_count".into(), count(FOLLOWERS));
    raw.insert("following_count".into(), count(FOLLOWING));
    raw.insert("posts_count".into(), count(POSTS));
    raw.insert("bio".into(), json!(text("biography")));
    raw.insert(
        "is_verified".into(),
        json!(pick(node, &["is_verified"]).and_then(Value::as_bool).unwrap_or(false)),
    );
    if let Some(image) = pick(node, PROFILE_IMAGE).and_then(Value::as_str) {
        raw.insert("profile_image".into(), json!(image));
    }
    if let Some(rate) = engagement_rate(node) {
        raw.insert("engagement_rate".into(), json!(rate));
    }
    Ok(raw)
}

/// Mean interactions (likes + comments) over the recent posts embedded in
/// the node, as a percentage of followers, rounded to two decimals.
///
/// `None` unless the node carries at least one post with a like count and a
/// non-zero follower count.
#[allow(clippy::cast_precision_loss)]
pub(super) fn engagement_rate(node: &Value) -> Option<f64> {
    let followers = pick(node, FOLLOWERS).and_then(|v| ensure_int(v, "followers_count").ok())?;
    if followers == 0 {
        return None;
    }

    let edges = pick(node, &[RECENT_POSTS])?.as_array()?;
    let interactions: Vec<u64> = edges
        .iter()
        .filter_map(|edge| edge.get("node"))
        .filter_map(|post| {
            let likes = pick(post, POST_LIKES).and_then(|v| ensure_int(v, "likes").ok())?;
            let comments = pick(post, POST_COMMENTS)
                .and_then(|v| ensure_int(v, "comments").ok())
                .unwrap_or(0);
            Some(likes.saturating_add(comments))
        })
        .collect();
    if interactions.is_empty() {
        return None;
    }

    let mean = interactions.iter().map(|&n| n as f64).sum::<f64>() / interactions.len() as f64;
    let rate = mean / followers as f64 * 100.0;
    Some((rate * 100.0).round() / 100.0)
}

//! The single validating path from loosely typed profile data to a
//! [`ProfileRecord`].
//!
//! Every extraction strategy emits a [`RawProfile`] map; nothing reaches the
//! exporters without passing through [`validate_and_clean`]. Legacy camelCase
//! keys (`followersCount`, `profileUrl`, `timestamp`, ...) are accepted as
//! aliases so older cached exports still load.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ValidationError;
use crate::record::{CollectedProfile, ProfileRecord, RecordSource};

/// Loosely typed field set produced by an extraction strategy.
pub type RawProfile = serde_json::Map<String, Value>;

const PROFILE_HOST: &str = "instagram.com";
const PROFILE_URL_BASE: &str = "https://www.instagram.com";

/// Canonical public profile URL for an already-normalized handle.
#[must_use]
pub fn canonical_profile_url(username: &str) -> String {
    format!("{PROFILE_URL_BASE}/{username}/")
}

/// Normalizes user input into a bare, lower-case handle.
///
/// Accepts `@handle`, padded input, and pasted profile URLs with or without
/// a scheme: `"@Nike"`, `" nike "`, `"instagram.com/nike"` and
/// `"https://instagram.com/nike/?hl=en"` all become `"nike"`. URLs on any
/// other host, and input that is nothing but a URL wrapper, become `""`.
#[must_use]
pub fn normalize_username(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() {
        return String::new();
    }

    let Some(text) = strip_profile_host(text) else {
        return String::new();
    };
    let text = text.split(['?', '#']).next().unwrap_or_default();
    let text = text
        .trim()
        .trim_start_matches(['@', '/'])
        .trim_end_matches('/');

    text.split('/').next().unwrap_or_default().to_lowercase()
}

/// Strips an optional `http(s)://`, an optional `www.` and the
/// `instagram.com` host (case-insensitive) from the front of `text`.
///
/// Returns `None` for a URL on any other host; text without a scheme or
/// profile host is returned unchanged.
fn strip_profile_host(text: &str) -> Option<&str> {
    // ASCII lower-casing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    let mut offset = if lower.starts_with("https://") {
        "https://".len()
    } else if lower.starts_with("http://") {
        "http://".len()
    } else if lower.contains("://") {
        return None;
    } else {
        0
    };
    let has_scheme = offset > 0;
    if lower[offset..].starts_with("www.") {
        offset += "www.".len();
    }

    let rest = lower[offset..]
        .strip_prefix(PROFILE_HOST)
        .map(|_| &text[offset + PROFILE_HOST.len()..])
        .filter(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']));
    match rest {
        Some(rest) => Some(rest),
        // e.g. `https://instagram.company.example/nike`
        None if has_scheme => None,
        // a bare `instagram.company` style handle is left for the caller
        None => Some(text),
    }
}

/// Coerces a count into a non-negative integer.
///
/// Accepts native integers, finite floats (truncated toward zero), and
/// digit strings with optional thousands separators (`"12,345"`). Negative
/// values, abbreviations such as `"1.2M"`, and non-numeric text fail.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInteger`] naming `field` and the
/// offending value.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn ensure_int(value: &Value, field: &str) -> Result<u64, ValidationError> {
    let invalid = || ValidationError::InvalidInteger {
        field: field.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Ok(u);
            }
            if n.is_i64() {
                return Err(invalid());
            }
            match n.as_f64() {
                Some(f) if f.is_finite() => {
                    let truncated = f.trunc();
                    if truncated >= 0.0 && truncated < u64::MAX as f64 {
                        Ok(truncated as u64)
                    } else {
                        Err(invalid())
                    }
                }
                _ => Err(invalid()),
            }
        }
        Value::String(s) => {
            let cleaned = s.replace(',', "");
            let cleaned = cleaned.trim();
            if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            cleaned.parse::<u64>().map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

/// Validates a strategy's raw field set and builds the canonical record.
///
/// Required: `username`, `followers_count`, `following_count`. Everything
/// else falls back to its documented default.
///
/// # Errors
///
/// - [`ValidationError::MissingField`] if a required field is absent or null.
/// - [`ValidationError::EmptyUsername`] if the username normalizes to `""`.
/// - [`ValidationError::InvalidInteger`] if a count cannot be coerced.
/// - [`ValidationError::InvalidNumber`] if `engagement_rate` is not a
///   non-negative number.
pub fn validate_and_clean(raw: &RawProfile) -> Result<ProfileRecord, ValidationError> {
    let raw_username = value_text(required(raw, "username", None)?);
    let username = normalize_username(&raw_username);
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername { raw: raw_username });
    }

    let followers_count = ensure_int(
        required(raw, "followers_count", Some("followersCount"))?,
        "followers_count",
    )?;
    let following_count = ensure_int(
        required(raw, "following_count", Some("followingCount"))?,
        "following_count",
    )?;
    let posts_count = lookup(raw, "posts_count", Some("postsCount"))
        .map(|v| ensure_int(v, "posts_count"))
        .transpose()?
        .unwrap_or(0);

    let profile_url = lookup(raw, "profile_url", Some("profileUrl"))
        .map(|v| value_text(v).trim().to_string())
        .filter(|url| url.starts_with("http"))
        .unwrap_or_else(|| canonical_profile_url(&username));

    let engagement_rate = lookup(raw, "engagement_rate", Some("engagementRate"))
        .map(|v| ensure_rate(v, "engagement_rate"))
        .transpose()?;

    let is_verified = lookup(raw, "is_verified", Some("isVerified"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let profile_image = lookup(raw, "profile_image", Some("profileImage"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(ProfileRecord {
        username,
        full_name: text_or_empty(lookup(raw, "full_name", Some("fullName"))),
        followers_count,
        following_count,
        bio: text_or_empty(lookup(raw, "bio", Some("biography"))),
        profile_url,
        posts_count,
        engagement_rate,
        is_verified,
        profile_image,
    })
}

/// Validates a previously collected record, e.g. one re-read from a JSON
/// export, including its `fetched_at` (alias `timestamp`) stamp.
///
/// A missing or unrecognized `source` is treated as [`RecordSource::Cached`].
///
/// # Errors
///
/// Everything [`validate_and_clean`] rejects, plus
/// [`ValidationError::NotAnObject`], [`ValidationError::EmptyTimestamp`] and
/// [`ValidationError::InvalidTimestamp`].
pub fn validate_collected(raw: &Value) -> Result<CollectedProfile, ValidationError> {
    let Some(map) = raw.as_object() else {
        return Err(ValidationError::NotAnObject(type_name(raw).to_string()));
    };

    let profile = validate_and_clean(map)?;

    let timestamp = value_text(required(map, "fetched_at", Some("timestamp"))?);
    let timestamp = timestamp.trim();
    if timestamp.is_empty() {
        return Err(ValidationError::EmptyTimestamp);
    }
    let fetched_at = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|e| ValidationError::InvalidTimestamp {
            value: timestamp.to_string(),
            reason: e.to_string(),
        })?
        .with_timezone(&Utc);

    let source = match map.get("source").and_then(Value::as_str) {
        Some("live") => RecordSource::Live,
        Some("mock") => RecordSource::Mock,
        _ => RecordSource::Cached,
    };

    Ok(CollectedProfile::new(profile, fetched_at, source))
}

fn ensure_rate(value: &Value, field: &str) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(rate) if rate.is_finite() && rate >= 0.0 => Ok(rate),
        _ => Err(ValidationError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Looks up `key`, then `alias`, treating JSON `null` as absent.
fn lookup<'a>(raw: &'a RawProfile, key: &str, alias: Option<&str>) -> Option<&'a Value> {
    raw.get(key)
        .filter(|v| !v.is_null())
        .or_else(|| alias.and_then(|a| raw.get(a)).filter(|v| !v.is_null()))
}

fn required<'a>(
    raw: &'a RawProfile,
    key: &'static str,
    alias: Option<&str>,
) -> Result<&'a Value, ValidationError> {
    lookup(raw, key, alias).ok_or(ValidationError::MissingField(key))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_or_empty(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

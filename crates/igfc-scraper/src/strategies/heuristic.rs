//! Last-resort text patterns over the profile page, usually the meta
//! description: `"1.2M Followers, 150 Following, 1,234 Posts - See Instagram
//! photos and videos from Nike (@nike)"`.

use std::sync::LazyLock;

use igfc_core::RawProfile;
use regex::Regex;
use serde_json::json;

use super::{PayloadKind, ProfileStrategy, StrategyInput, StrategyMiss};

static META_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]+(?:property|name)\s*=\s*["'](?:og:description|description|twitter:description)["'][^>]*>"#,
    )
    .expect("valid meta regex")
});

static CONTENT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid content regex")
});

static FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| count_regex("followers"));
static FOLLOWING_RE: LazyLock<Regex> = LazyLock::new(|| count_regex("following"));
static POSTS_RE: LazyLock<Regex> = LazyLock::new(|| count_regex("posts"));

static DISPLAY_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfrom\s+(.+?)\s*\(@([A-Za-z0-9._]+)\)").expect("valid display name regex")
});

fn count_regex(label: &str) -> Regex {
    Regex::new(&format!(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*([kmb])?\s+{label}\b"))
        .expect("valid count regex")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy;

impl ProfileStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn payload(&self) -> PayloadKind {
        PayloadKind::ProfilePage
    }

    fn extract(&self, input: &StrategyInput<'_>) -> Result<RawProfile, StrategyMiss> {
        // Meta descriptions first; the raw page only when none carries counts.
        let mut texts: Vec<String> = META_TAG_RE
            .find_iter(input.body)
            .filter_map(|tag| CONTENT_ATTR_RE.captures(tag.as_str()))
            .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)))
            .map(|content| decode_entities(content.as_str()))
            .collect();
        texts.push(decode_entities(input.body));

        texts
            .iter()
            .find_map(|text| profile_from_text(text, input.username))
            .ok_or(StrategyMiss::NotFound("follower count in page text"))
    }
}

fn profile_from_text(text: &str, requested: &str) -> Option<RawProfile> {
    let followers = first_count(&FOLLOWERS_RE, text)?;
    let following = first_count(&FOLLOWING_RE, text).unwrap_or(0);
    let posts = first_count(&POSTS_RE, text).unwrap_or(0);

    let (full_name, handle) = DISPLAY_NAME_RE
        .captures(text)
        .map(|cap| (cap[1].trim().to_string(), cap[2].to_string()))
        .unwrap_or_default();
    // Only trust the page's handle and display name when the handle agrees
    // with the request.
    let (username, full_name) = if handle.eq_ignore_ascii_case(requested) {
        (handle, full_name)
    } else {
        (requested.to_string(), String::new())
    };

    let mut raw = RawProfile::new();
    raw.insert("username".into(), json!(username));
    raw.insert("full_name".into(), json!(full_name));
    raw.insert("followers_count".into(), json!(followers));
    raw.insert("following_count".into(), json!(following));
    raw.insert("posts_count".into(), json!(posts));
    Some(raw)
}

fn first_count(pattern: &Regex, text: &str) -> Option<u64> {
    pattern.captures_iter(text).find_map(|cap| {
        let number = cap.get(1)?.as_str();
        let suffix = cap.get(2).map_or("", |m| m.as_str());
        parse_abbreviated_count(&format!("{number}{suffix}"))
    })
}

/// Parses `"1,234"`, `"12.5K"`, `"1.2M"`, `"3b"` into whole numbers.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(super) fn parse_abbreviated_count(text: &str) -> Option<u64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let (number, multiplier) = match cleaned.chars().last()?.to_ascii_lowercase() {
        'k' => (&cleaned[..cleaned.len() - 1], Some(1_000.0)),
        'm' => (&cleaned[..cleaned.len() - 1], Some(1_000_000.0)),
        'b' => (&cleaned[..cleaned.len() - 1], Some(1_000_000_000.0)),
        _ => (cleaned.as_str(), None),
    };
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let value = match multiplier {
        None if !number.contains('.') => return number.parse().ok(),
        None => number.parse::<f64>().ok()?,
        Some(multiplier) => number.parse::<f64>().ok()? * multiplier,
    };
    (value.is_finite() && value < u64::MAX as f64).then(|| value.round() as u64)
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&#064;", "@")
        .replace("&#64;", "@")
        .replace("&#x40;", "@")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

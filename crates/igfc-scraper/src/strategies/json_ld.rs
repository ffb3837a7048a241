//! schema.org JSON-LD extraction from the profile page.

use std::sync::LazyLock;

use igfc_core::RawProfile;
use regex::Regex;
use serde_json::{json, Value};

use super::{PayloadKind, ProfileStrategy, StrategyInput, StrategyMiss};

static LD_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid ld+json regex")
});

/// Reads a `Person` node (bare or as a `ProfilePage`'s `mainEntity`) from
/// `<script type="application/ld+json">` blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLdStrategy;

impl ProfileStrategy for JsonLdStrategy {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn payload(&self) -> PayloadKind {
        PayloadKind::ProfilePage
    }

    fn extract(&self, input: &StrategyInput<'_>) -> Result<RawProfile, StrategyMiss> {
        for cap in LD_JSON_RE.captures_iter(input.body) {
            let Some(block) = cap.get(1) else { continue };
            let Ok(value) = serde_json::from_str::<Value>(block.as_str().trim()) else {
                tracing::debug!("skipping unparseable ld+json block");
                continue;
            };

            let mut nodes = Vec::new();
            collect_nodes(&value, &mut nodes);
            for node in nodes {
                if let Some(raw) = person_profile(node, input.username) {
                    return Ok(raw);
                }
            }
        }
        Err(StrategyMiss::NotFound("ld+json Person with follower count"))
    }
}

/// Flattens top-level arrays and `@graph` containers into candidate objects.
fn collect_nodes<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_nodes(item, out)),
        Value::Object(map) => {
            out.push(value);
            if let Some(graph) = map.get("@graph") {
                collect_nodes(graph, out);
            }
        }
        _ => {}
    }
}

/// `@type` may be a plain string or an array of strings.
fn has_type(node: &Value, wanted: &str) -> bool {
    match node.get("@type") {
        Some(Value::String(s)) => s.eq_ignore_ascii_case(wanted),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.eq_ignore_ascii_case(wanted)),
        _ => false,
    }
}

fn person_profile(node: &Value, requested: &str) -> Option<RawProfile> {
    let (person, page) = if has_type(node, "Person") {
        let page = node
            .get("mainEntityOfPage")
            .or_else(|| node.get("mainEntityofPage"));
        (node, page)
    } else if has_type(node, "ProfilePage") {
        let entity = node.get("mainEntity").filter(|e| has_type(e, "Person"))?;
        (entity, Some(node))
    } else {
        return None;
    };

    let counter_sources: Vec<&Value> = std::iter::once(person).chain(page).collect();
    let followers = interaction_count(&counter_sources, "FollowAction")?;
    let posts = interaction_count(&counter_sources, "WriteAction").unwrap_or(json!(0));

    let text = |key: &str| person.get(key).and_then(Value::as_str).map(str::trim);
    let username = text("alternateName")
        .filter(|s| !s.trim_start_matches('@').is_empty())
        .unwrap_or(requested);
    let image = match person.get("image") {
        Some(Value::String(url)) => Some(url.as_str()),
        Some(obj @ Value::Object(_)) => obj.get("url").and_then(Value::as_str),
        _ => None,
    };

    let mut raw = RawProfile::new();
    raw.insert("username".into(), json!(username));
    raw.insert("full_name".into(), json!(text("name").unwrap_or_default()));
    raw.insert("followers_count".into(), followers);
    raw.insert("following_count".into(), json!(0));
    raw.insert("posts_count".into(), posts);
    raw.insert("bio".into(), json!(text("description").unwrap_or_default()));
    if let Some(url) = text("url") {
        raw.insert("profile_url".into(), json!(url));
    }
    if let Some(image) = image.filter(|s| !s.is_empty()) {
        raw.insert("profile_image".into(), json!(image));
    }
    Some(raw)
}

/// Finds the `userInteractionCount` whose `interactionType` ends in `action`.
fn interaction_count(sources: &[&Value], action: &str) -> Option<Value> {
    sources
        .iter()
        .filter_map(|source| source.get("interactionStatistic"))
        .flat_map(|stats| match stats {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .find(|stat| interaction_type(stat).is_some_and(|t| t.ends_with(action)))
        .and_then(|stat| stat.get("userInteractionCount"))
        .filter(|count| !count.is_null())
        .cloned()
}

/// `interactionType` is either a URL string or an object with `@type`.
fn interaction_type(stat: &Value) -> Option<&str> {
    match stat.get("interactionType")? {
        Value::String(s) => Some(s.as_str()),
        obj => obj.get("@type").and_then(Value::as_str),
    }
}

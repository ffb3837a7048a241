//! Legacy embedded state blobs: `window._sharedData` and
//! `window.__additionalDataLoaded(...)`.

use std::sync::LazyLock;

use igfc_core::RawProfile;
use regex::Regex;
use serde_json::Value;

use super::user_node::profile_from_user_node;
use super::{PayloadKind, ProfileStrategy, StrategyInput, StrategyMiss};

static SHARED_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\._sharedData\s*=\s*(\{.*?\})\s*;?\s*</script>")
        .expect("valid sharedData regex")
});

static ADDITIONAL_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)window\.__additionalDataLoaded\(\s*['"][^'"]*['"]\s*,\s*(\{.*?\})\s*\)\s*;?\s*</script>"#,
    )
    .expect("valid additionalDataLoaded regex")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct SharedDataStrategy;

impl ProfileStrategy for SharedDataStrategy {
    fn name(&self) -> &'static str {
        "shared_data"
    }

    fn payload(&self) -> PayloadKind {
        PayloadKind::ProfilePage
    }

    fn extract(&self, input: &StrategyInput<'_>) -> Result<RawProfile, StrategyMiss> {
        // (blob pattern, user node locations inside the blob)
        let blobs: [(&Regex, &[&str]); 2] = [
            (&SHARED_DATA_RE, &["/entry_data/ProfilePage/0/graphql/user"]),
            (&ADDITIONAL_DATA_RE, &["/graphql/user", "/user"]),
        ];
        let mut last_miss = StrategyMiss::NotFound("embedded state blob");

        for (pattern, pointers) in blobs {
            for cap in pattern.captures_iter(input.body) {
                let Some(blob) = cap.get(1) else { continue };
                let state: Value = match serde_json::from_str(blob.as_str()) {
                    Ok(state) => state,
                    Err(source) => {
                        last_miss = StrategyMiss::Json {
                            context: "embedded state blob",
                            source,
                        };
                        continue;
                    }
                };
                let user = pointers
                    .iter()
                    .find_map(|pointer| state.pointer(pointer).filter(|u| !u.is_null()));
                match user.map(|node| profile_from_user_node(node, input.username)) {
                    Some(Ok(raw)) => return Ok(raw),
                    Some(Err(miss)) => last_miss = miss,
                    None => last_miss = StrategyMiss::NotFound("user node in embedded state"),
                }
            }
        }
        Err(last_miss)
    }
}

use igfc_core::RawProfile;
use serde_json::Value;

use super::user_node::profile_from_user_node;
use super::{PayloadKind, ProfileStrategy, StrategyInput, StrategyMiss};

/// Reads `data.user` from the `web_profile_info` JSON endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiStrategy;

impl ProfileStrategy for ApiStrategy {
    fn name(&self) -> &'static str {
        "api"
    }

    fn payload(&self) -> PayloadKind {
        PayloadKind::Api
    }

    fn extract(&self, input: &StrategyInput<'_>) -> Result<RawProfile, StrategyMiss> {
        let body: Value = serde_json::from_str(input.body).map_err(|source| StrategyMiss::Json {
            context: "web_profile_info response",
            source,
        })?;
        let user = body
            .pointer("/data/user")
            .ok_or(StrategyMiss::NotFound("data.user"))?;
        profile_from_user_node(user, input.username)
    }
}

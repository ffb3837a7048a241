//! Ordered extraction strategies for a single profile.
//!
//! Each strategy names the payload it reads and turns that payload into a
//! [`RawProfile`]. Fetching and ordering belong to
//! [`crate::resolver::ProfileResolver`]; strategies never touch the network.

mod api;
mod heuristic;
mod json_ld;
mod shared_data;
mod user_node;

use igfc_core::{RawProfile, ValidationError};
use thiserror::Error;

pub use api::ApiStrategy;
pub use heuristic::HeuristicStrategy;
pub use json_ld::JsonLdStrategy;
pub use shared_data::SharedDataStrategy;

/// Which remote document a strategy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// `web_profile_info` JSON endpoint.
    Api,
    /// Public profile HTML page.
    ProfilePage,
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Api => f.write_str("api"),
            Self::ProfilePage => f.write_str("profile_page"),
        }
    }
}

/// What a strategy sees: the normalized handle and the fetched body.
#[derive(Debug, Clone, Copy)]
pub struct StrategyInput<'a> {
    pub username: &'a str,
    pub body: &'a str,
}

/// Why a strategy produced nothing. Always recoverable: the resolver moves on.
#[derive(Debug, Error)]
pub enum StrategyMiss {
    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("failed to parse {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("extracted data failed validation: {0}")]
    Invalid(#[from] ValidationError),
}

pub trait ProfileStrategy: Send + Sync {
    /// Short stable name used in logs.
    fn name(&self) -> &'static str;

    fn payload(&self) -> PayloadKind;

    /// Extracts a raw field set from `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`StrategyMiss`] when the payload does not carry the
    /// expected data.
    fn extract(&self, input: &StrategyInput<'_>) -> Result<RawProfile, StrategyMiss>;
}

/// The production chain: structured API, JSON-LD, embedded blob, then text
/// heuristics.
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn ProfileStrategy>> {
    vec![
        Box::new(ApiStrategy),
        Box::new(JsonLdStrategy),
        Box::new(SharedDataStrategy),
        Box::new(HeuristicStrategy),
    ]
}

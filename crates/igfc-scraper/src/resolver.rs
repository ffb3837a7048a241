//! Multi-strategy profile resolution.
//!
//! [`ProfileResolver::fetch_profile`] walks an ordered strategy chain,
//! fetching each remote payload at most once and only when the next strategy
//! needs it. The first extraction that also passes
//! [`igfc_core::validate_and_clean`] wins.

use std::collections::HashMap;

use igfc_core::{normalize_username, validate_and_clean, ProfileRecord, RequestSettings};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, REFERER};
use reqwest::Url;

use crate::client::HttpClient;
use crate::error::ScraperError;
use crate::strategies::{default_strategies, PayloadKind, ProfileStrategy, StrategyInput, StrategyMiss};

pub const DEFAULT_API_BASE: &str = "https://i.instagram.com";
pub const DEFAULT_WEB_BASE: &str = "https://www.instagram.com";

/// Public web app id the profile-info endpoint expects.
const IG_APP_ID: &str = "936619743392459";
const API_PATH: [&str; 4] = ["api", "v1", "users", "web_profile_info"];

/// Base URLs for the two payloads. Overridable so tests can target a local
/// mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverEndpoints {
    pub api_base: String,
    pub web_base: String,
}

impl Default for ResolverEndpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
        }
    }
}

impl ResolverEndpoints {
    /// `{api_base}/api/v1/users/web_profile_info/?username={username}`
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `api_base` is not an absolute
    /// http(s) URL.
    pub fn api_url(&self, username: &str) -> Result<Url, ScraperError> {
        let mut url = parse_base(&self.api_base)?;
        url.path_segments_mut()
            .map_err(|()| cannot_be_base(&self.api_base))?
            .pop_if_empty()
            .extend(API_PATH)
            .push("");
        url.query_pairs_mut().append_pair("username", username);
        Ok(url)
    }

    /// `{web_base}/{username}/`
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `web_base` is not an absolute
    /// http(s) URL.
    pub fn page_url(&self, username: &str) -> Result<Url, ScraperError> {
        let mut url = parse_base(&self.web_base)?;
        url.path_segments_mut()
            .map_err(|()| cannot_be_base(&self.web_base))?
            .pop_if_empty()
            .push(username)
            .push("");
        Ok(url)
    }
}

fn parse_base(base: &str) -> Result<Url, ScraperError> {
    let url = Url::parse(base).map_err(|e| ScraperError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidUrl {
            url: base.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

fn cannot_be_base(base: &str) -> ScraperError {
    ScraperError::InvalidUrl {
        url: base.to_string(),
        reason: "URL cannot be a base".to_string(),
    }
}

/// Resolves one username at a time into a validated [`ProfileRecord`].
///
/// Holds a single [`HttpClient`]; share the resolver by reference across
/// concurrent lookups.
pub struct ProfileResolver {
    client: HttpClient,
    endpoints: ResolverEndpoints,
    strategies: Vec<Box<dyn ProfileStrategy>>,
}

impl ProfileResolver {
    /// Resolver over the public endpoints with the default strategy chain.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            endpoints: ResolverEndpoints::default(),
            strategies: default_strategies(),
        }
    }

    /// Builds the client from `settings` and wraps it in a default resolver.
    ///
    /// # Errors
    ///
    /// Propagates [`HttpClient::new`] errors.
    pub fn from_settings(settings: &RequestSettings) -> Result<Self, ScraperError> {
        Ok(Self::new(HttpClient::new(settings)?))
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: ResolverEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Replaces the strategy chain. Order is attempt order.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ProfileStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    #[must_use]
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    #[must_use]
    pub fn endpoints(&self) -> &ResolverEndpoints {
        &self.endpoints
    }

    /// Resolves `username` (any accepted input form) into a record.
    ///
    /// Returns `Ok(None)` when the username is empty after normalization or
    /// when every strategy misses. Network failures are never errors here;
    /// they only make the dependent strategies miss.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if an endpoint URL cannot be
    /// built from the configured bases.
    pub async fn fetch_profile(
        &self,
        username: &str,
    ) -> Result<Option<ProfileRecord>, ScraperError> {
        let normalized = normalize_username(username);
        let username = normalized.as_str();
        if username.is_empty() {
            tracing::debug!("username empty after normalization; skipping");
            return Ok(None);
        }

        let mut payloads: HashMap<PayloadKind, Option<String>> = HashMap::new();

        for strategy in &self.strategies {
            let kind = strategy.payload();
            if !payloads.contains_key(&kind) {
                let body = self.fetch_payload(kind, username).await?;
                payloads.insert(kind, body);
            }
            let Some(body) = payloads.get(&kind).and_then(Option::as_deref) else {
                tracing::debug!(
                    username,
                    strategy = strategy.name(),
                    payload = %kind,
                    "payload unavailable; skipping strategy"
                );
                continue;
            };

            let input = StrategyInput { username, body };
            let outcome = strategy
                .extract(&input)
                .and_then(|raw| validate_and_clean(&raw).map_err(StrategyMiss::from));
            match outcome {
                Ok(record) => {
                    tracing::info!(
                        username,
                        strategy = strategy.name(),
                        followers = record.followers_count,
                        "resolved profile"
                    );
                    return Ok(Some(record));
                }
                Err(miss) => {
                    tracing::debug!(
                        username,
                        strategy = strategy.name(),
                        reason = %miss,
                        "strategy miss"
                    );
                }
            }
        }

        tracing::warn!(username, "all strategies failed");
        Ok(None)
    }

    /// Fetches one payload; `None` unless the service answered 200 with a
    /// non-empty body.
    async fn fetch_payload(
        &self,
        kind: PayloadKind,
        username: &str,
    ) -> Result<Option<String>, ScraperError> {
        let page_url = self.endpoints.page_url(username)?;
        let mut headers = HeaderMap::new();
        let url = match kind {
            PayloadKind::Api => {
                headers.insert(
                    HeaderName::from_static("x-ig-app-id"),
                    HeaderValue::from_static(IG_APP_ID),
                );
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                let referer = HeaderValue::from_str(page_url.as_str()).map_err(|e| {
                    ScraperError::InvalidUrl {
                        url: page_url.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                headers.insert(REFERER, referer);
                self.endpoints.api_url(username)?
            }
            PayloadKind::ProfilePage => {
                headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
                page_url
            }
        };

        let Some(response) = self.client.get(url.as_str(), &headers, true).await else {
            tracing::debug!(username, payload = %kind, "no response");
            return Ok(None);
        };
        if !response.is_ok() {
            tracing::debug!(
                username,
                payload = %kind,
                status = response.status,
                "unexpected status"
            );
            return Ok(None);
        }
        if response.body.trim().is_empty() {
            tracing::debug!(username, payload = %kind, "empty body");
            return Ok(None);
        }
        Ok(Some(response.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_urls() {
        let endpoints = ResolverEndpoints::default();
        assert_eq!(
            endpoints.api_url("nike").unwrap().as_str(),
            "https://i.instagram.com/api/v1/users/web_profile_info/?username=nike"
        );
        assert_eq!(
            endpoints.page_url("nike").unwrap().as_str(),
            "https://www.instagram.com/nike/"
        );
    }

    #[test]
    fn bases_with_paths_and_trailing_slashes() {
        let endpoints = ResolverEndpoints {
            api_base: "http://127.0.0.1:8080/mock/".to_string(),
            web_base: "http://127.0.0.1:8080/web".to_string(),
        };
        assert_eq!(
            endpoints.api_url("natgeo").unwrap().as_str(),
            "http://127.0.0.1:8080/mock/api/v1/users/web_profile_info/?username=natgeo"
        );
        assert_eq!(
            endpoints.page_url("natgeo").unwrap().as_str(),
            "http://127.0.0.1:8080/web/natgeo/"
        );
    }

    #[test]
    fn username_is_a_single_path_segment() {
        let url = ResolverEndpoints::default().page_url("a:b").unwrap();
        assert_eq!(url.host_str(), Some("www.instagram.com"));
        assert_eq!(url.path(), "/a:b/");
    }

    #[test]
    fn rejects_unusable_bases() {
        for base in ["not a url", "mailto:someone@example.com", "ftp://example.com"] {
            let endpoints = ResolverEndpoints {
                api_base: base.to_string(),
                web_base: base.to_string(),
            };
            assert!(
                matches!(endpoints.page_url("nike"), Err(ScraperError::InvalidUrl { .. })),
                "{base}"
            );
        }
    }
}

//! Resilient HTTP client: pooled connections, bounded retry with backoff,
//! courtesy jitter, and user-agent selection.

mod jitter;

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use igfc_core::RequestSettings;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::{redirect, Client, Proxy};

use crate::error::ScraperError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::user_agent;

use jitter::JitterWindow;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_REDIRECTS: usize = 10;
const POOL_MAX_IDLE_PER_HOST: usize = 20;

/// A fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// URL after redirects.
    pub final_url: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// GET-only HTTP client tuned for a rate-limiting remote service.
///
/// Transient outcomes (connection failures, timeouts, and the statuses in
/// the [`RetryPolicy`]) are retried with exponential backoff. Before every
/// call the client also sleeps a random duration inside the configured
/// jitter window. Randomness comes from an RNG owned by this instance, so a
/// fixed `seed` makes delays and user-agent choice reproducible.
///
/// The client is `Send + Sync`; share it behind a reference across workers.
pub struct HttpClient {
    follow: Client,
    no_follow: Client,
    policy: RetryPolicy,
    jitter: JitterWindow,
    user_agent: String,
    rotate_user_agent: bool,
    rng: Mutex<StdRng>,
}

impl HttpClient {
    /// Builds a client from request settings.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidConfig`] if the jitter window is inverted,
    ///   the timeout is zero, or a proxy URL is rejected.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed (e.g., TLS backend failure).
    pub fn new(settings: &RequestSettings) -> Result<Self, ScraperError> {
        Self::with_policy(settings, RetryPolicy::from_settings(settings))
    }

    /// Like [`HttpClient::new`] but with an explicit retry policy.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::new`].
    pub fn with_policy(
        settings: &RequestSettings,
        policy: RetryPolicy,
    ) -> Result<Self, ScraperError> {
        if settings.delay_ms_min > settings.delay_ms_max {
            return Err(ScraperError::InvalidConfig(format!(
                "delay_ms_min ({}) exceeds delay_ms_max ({})",
                settings.delay_ms_min, settings.delay_ms_max
            )));
        }
        if settings.timeout_seconds == 0 {
            return Err(ScraperError::InvalidConfig(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }

        let follow = build_client(settings, redirect::Policy::limited(MAX_REDIRECTS))?;
        let no_follow = build_client(settings, redirect::Policy::none())?;

        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let configured_agent = settings
            .user_agent
            .as_deref()
            .map(str::trim)
            .filter(|ua| !ua.is_empty());
        let rotate_user_agent = settings.rotate_user_agent && configured_agent.is_none();
        let user_agent = configured_agent.map_or_else(
            || user_agent::pick(&mut rng).to_owned(),
            str::to_owned,
        );

        tracing::debug!(
            user_agent = %user_agent,
            rotate_user_agent,
            max_retries = policy.max_retries,
            "built HTTP client"
        );

        Ok(Self {
            follow,
            no_follow,
            policy,
            jitter: JitterWindow {
                min_ms: settings.delay_ms_min,
                max_ms: settings.delay_ms_max,
            },
            user_agent,
            rotate_user_agent,
            rng: Mutex::new(rng),
        })
    }

    /// The user agent chosen at construction.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Issues a GET request, retrying transient failures.
    ///
    /// `headers` override the client's defaults, including `User-Agent`.
    ///
    /// Returns `None` when the request could not be completed at the network
    /// level after all retries. A transient status that persists through
    /// every retry is returned as the final response; other non-2xx
    /// statuses are returned immediately without retrying.
    pub async fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
        allow_redirects: bool,
    ) -> Option<HttpResponse> {
        let (delay, user_agent) = self.next_request_params();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let client = if allow_redirects {
            &self.follow
        } else {
            &self.no_follow
        };
        let policy = &self.policy;

        let result = retry_with_backoff(policy, || {
            let request = client
                .get(url)
                .header(USER_AGENT, user_agent.as_str())
                .headers(headers.clone());
            async move {
                let response = request.send().await?;
                let status = response.status().as_u16();
                let final_url = response.url().to_string();
                let body = response.text().await?;
                let response = HttpResponse {
                    status,
                    body,
                    final_url,
                };
                if policy.is_retryable_status(status) {
                    return Err(ScraperError::TransientStatus { response });
                }
                Ok(response)
            }
        })
        .await;

        match result {
            Ok(response) => Some(response),
            Err(ScraperError::TransientStatus { response }) => {
                tracing::warn!(
                    url,
                    status = response.status,
                    "retries exhausted; returning last transient response"
                );
                Some(response)
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "request failed; no response");
                None
            }
        }
    }

    /// Draws the jitter delay and the user agent for one request.
    fn next_request_params(&self) -> (Duration, String) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let delay = self.jitter.sample(&mut *rng);
        let user_agent = if self.rotate_user_agent {
            user_agent::pick(&mut *rng).to_owned()
        } else {
            self.user_agent.clone()
        };
        (delay, user_agent)
    }
}

fn build_client(
    settings: &RequestSettings,
    redirect_policy: redirect::Policy,
) -> Result<Client, ScraperError> {
    let timeout = Duration::from_secs(settings.timeout_seconds);
    let mut builder = Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(CONNECT_TIMEOUT_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .redirect(redirect_policy);

    if let Some(proxies) = &settings.proxies {
        if let Some(url) = &proxies.http {
            let proxy = Proxy::http(url)
                .map_err(|e| ScraperError::InvalidConfig(format!("invalid http proxy: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(url) = &proxies.https {
            let proxy = Proxy::https(url)
                .map_err(|e| ScraperError::InvalidConfig(format!("invalid https proxy: {e}")))?;
            builder = builder.proxy(proxy);
        }
    }

    Ok(builder.build()?)
}

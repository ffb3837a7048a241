//! Request settings loaded from a JSON or YAML file.
//!
//! Every field has a default, so an absent file or a partial `request`
//! section is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub request: RequestSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSettings {
    pub timeout_seconds: u64,
    /// Additional attempts after the first failure for transient outcomes.
    pub retries: u32,
    /// Maximum number of usernames resolved at the same time.
    pub concurrency: usize,
    pub proxies: Option<ProxySettings>,
    /// Fixed `User-Agent`; when unset one is picked from the built-in pool.
    pub user_agent: Option<String>,
    pub delay_ms_min: u64,
    pub delay_ms_max: u64,
    /// Base delay for exponential retry backoff: `base * 2^(n-1)`.
    pub backoff_base_ms: u64,
    /// Pick a fresh pool user agent for every request instead of once per client.
    pub rotate_user_agent: bool,
    /// Seed for jitter and user-agent selection; OS entropy when unset.
    pub seed: Option<u64>,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 15,
            retries: 2,
            concurrency: 5,
            proxies: None,
            user_agent: None,
            delay_ms_min: 250,
            delay_ms_max: 750,
            backoff_base_ms: 500,
            rotate_user_agent: false,
            seed: None,
        }
    }
}

impl std::fmt::Debug for RequestSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Proxy URLs can embed credentials.
        let redact = |url: &Option<String>| url.as_ref().map(|_| "[redacted]");
        f.debug_struct("RequestSettings")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("retries", &self.retries)
            .field("concurrency", &self.concurrency)
            .field(
                "proxies",
                &self
                    .proxies
                    .as_ref()
                    .map(|p| (redact(&p.http), redact(&p.https))),
            )
            .field("user_agent", &self.user_agent)
            .field("delay_ms_min", &self.delay_ms_min)
            .field("delay_ms_max", &self.delay_ms_max)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("rotate_user_agent", &self.rotate_user_agent)
            .field("seed", &self.seed)
            .finish()
    }
}

impl Settings {
    /// Checks cross-field constraints the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let request = &self.request;
        if request.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "request.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if request.concurrency == 0 {
            return Err(ConfigError::Validation(
                "request.concurrency must be at least 1".to_string(),
            ));
        }
        if request.delay_ms_min > request.delay_ms_max {
            return Err(ConfigError::Validation(format!(
                "request.delay_ms_min ({}) must not exceed request.delay_ms_max ({})",
                request.delay_ms_min, request.delay_ms_max
            )));
        }
        Ok(())
    }
}

/// Load settings from `path`, falling back to defaults when no file is given
/// or the file does not exist.
///
/// Files ending in `.yaml`/`.yml` are parsed as YAML, anything else as JSON.
///
/// # Errors
///
/// Returns [`ConfigError`] if an existing file cannot be read or parsed, or
/// if the resulting settings fail [`Settings::validate`].
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let Some(path) = path else {
        tracing::info!("no settings file given; using defaults");
        return Ok(Settings::default());
    };

    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "settings file does not exist; using defaults"
        );
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let settings = parse_settings(path, &content)?;
    settings.validate()?;
    tracing::info!(path = %path.display(), "loaded settings");
    Ok(settings)
}

fn parse_settings(path: &Path, content: &str) -> Result<Settings, ConfigError> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(content).map_err(|e| ConfigError::SettingsYaml {
            path: path.display().to_string(),
            source: e,
        })
    } else {
        serde_json::from_str(content).map_err(|e| ConfigError::SettingsJson {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

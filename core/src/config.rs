//! Client configuration.
//!
//! A single setting selects the API base URL. When it is unset, requests are
//! issued relative to the host's own origin. The config is built once and
//! handed to `RentalClient`; nothing here is global.

use std::time::Duration;

use tracing::warn;

pub const BASE_URL_ENV: &str = "RENTAL_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "RENTAL_API_TIMEOUT_SECS";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const RELATIVE_LABEL: &str = "relative /api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Build a config from an optional base URL. Blank values count as unset.
    pub fn new(api_base_url: Option<&str>) -> Self {
        let api_base_url = api_base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string());
        if api_base_url.is_none() {
            warn!("{BASE_URL_ENV} is not set, falling back to relative API requests");
        }
        Self {
            api_base_url,
            ..Self::default()
        }
    }

    /// Read `RENTAL_API_BASE_URL` and `RENTAL_API_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_env_with_base(None)
    }

    /// Like `from_env`, but `base_url` replaces `RENTAL_API_BASE_URL` when
    /// given. The timeout is still read from the environment.
    pub fn from_env_with_base(base_url: Option<&str>) -> Self {
        Self::from_lookup(base_url, |key| std::env::var(key).ok())
    }

    fn from_lookup(base_url: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = match base_url {
            Some(url) => Some(url.to_string()),
            None => lookup(BASE_URL_ENV),
        };
        let mut config = Self::new(base.as_deref());
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid {TIMEOUT_ENV}"),
            }
        }
        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// What the home page shows as the API location.
    pub fn base_url_label(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(RELATIVE_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_base_url_is_unset() {
        let config = ClientConfig::new(Some("   "));
        assert!(config.api_base_url.is_none());
        assert_eq!(config.base_url_label(), "relative /api");
    }

    #[test]
    fn base_url_is_trimmed() {
        let config = ClientConfig::new(Some(" http://api.example.com/ "));
        assert_eq!(config.api_base_url.as_deref(), Some("http://api.example.com"));
        assert_eq!(config.base_url_label(), "http://api.example.com");
    }

    #[test]
    fn default_timeout() {
        assert_eq!(ClientConfig::new(None).timeout, DEFAULT_TIMEOUT);
        let config = ClientConfig::new(None).with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn env_supplies_base_and_timeout() {
        let env = [(BASE_URL_ENV, "http://env.example.com"), (TIMEOUT_ENV, "5")];
        let config = ClientConfig::from_lookup(None, vars(&env));
        assert_eq!(config.api_base_url.as_deref(), Some("http://env.example.com"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn explicit_base_keeps_env_timeout() {
        let env = [(BASE_URL_ENV, "http://env.example.com"), (TIMEOUT_ENV, "5")];
        let config = ClientConfig::from_lookup(Some("http://flag.example.com/"), vars(&env));
        assert_eq!(config.api_base_url.as_deref(), Some("http://flag.example.com"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_timeout_keeps_default() {
        let env = [(TIMEOUT_ENV, "soon")];
        let config = ClientConfig::from_lookup(None, vars(&env));
        assert!(config.api_base_url.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}

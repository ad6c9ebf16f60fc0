//! Registry connection settings read from the process environment.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding the registry API token.
pub const TOKEN_VAR: &str = "REDCAP_API_TOKEN";

/// Environment variable holding the registry API endpoint.
pub const URL_VAR: &str = "REDCAP_API_URL";

/// Environment variable overriding the request timeout (seconds).
pub const TIMEOUT_VAR: &str = "REDCAP_TIMEOUT_SECS";

/// Environment variable overriding the cache lifetime (seconds).
pub const CACHE_TTL_VAR: &str = "REDCAP_CACHE_TTL_SECS";

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default lifetime of a cached export (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Connection settings for one registry project.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// API endpoint (e.g. `https://redcap.example.org/api/`).
    pub api_url: String,
    token: String,
    /// Upper bound for one export request.
    pub timeout: Duration,
    /// How long an export may be served from cache.
    pub cache_ttl: Duration,
}

impl RegistryConfig {
    /// Create settings with default timeout and cache lifetime.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Read settings from the process environment.
    ///
    /// `url_override` takes precedence over `REDCAP_API_URL`.
    pub fn from_env(url_override: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_lookup(url_override, |name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(url_override: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let token = non_empty(TOKEN_VAR).ok_or(ConfigError::MissingVariable(TOKEN_VAR))?;
        let api_url = match url_override {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => non_empty(URL_VAR).ok_or(ConfigError::MissingVariable(URL_VAR))?,
        };
        if !(api_url.starts_with("https://") || api_url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                name: URL_VAR,
                value: api_url,
            });
        }

        let mut config = Self::new(api_url, token.trim());
        if let Some(timeout) = parse_seconds(TIMEOUT_VAR, non_empty(TIMEOUT_VAR))? {
            config.timeout = timeout;
        }
        if let Some(ttl) = parse_seconds(CACHE_TTL_VAR, non_empty(CACHE_TTL_VAR))? {
            config.cache_ttl = ttl;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }
}

fn parse_seconds(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidValue { name, value }),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
    }
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_missing_token() {
        let vars = env(&[(URL_VAR, "https://redcap.example.org/api/")]);
        let err = RegistryConfig::from_lookup(None, |name| vars.get(name).cloned()).unwrap_err();
        assert_eq!(err, ConfigError::MissingVariable(TOKEN_VAR));
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let vars = env(&[(TOKEN_VAR, "  "), (URL_VAR, "https://redcap.example.org/api/")]);
        let err = RegistryConfig::from_lookup(None, |name| vars.get(name).cloned()).unwrap_err();
        assert_eq!(err, ConfigError::MissingVariable(TOKEN_VAR));
    }

    #[test]
    fn test_defaults_and_override() {
        let vars = env(&[(TOKEN_VAR, "ABC123"), (URL_VAR, "https://a.example/api/")]);
        let config =
            RegistryConfig::from_lookup(Some("https://b.example/api/"), |name| vars.get(name).cloned())
                .unwrap();
        assert_eq!(config.api_url, "https://b.example/api/");
        assert_eq!(config.token(), "ABC123");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.cache_ttl, DEFAULT_CACHE_TTL);
    }

    #[test]
    fn test_timeout_and_ttl_from_env() {
        let vars = env(&[
            (TOKEN_VAR, "ABC123"),
            (URL_VAR, "https://a.example/api/"),
            (TIMEOUT_VAR, "5"),
            (CACHE_TTL_VAR, "60"),
        ]);
        let config = RegistryConfig::from_lookup(None, |name| vars.get(name).cloned()).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_values() {
        let vars = env(&[
            (TOKEN_VAR, "ABC123"),
            (URL_VAR, "https://a.example/api/"),
            (TIMEOUT_VAR, "0"),
        ]);
        let err = RegistryConfig::from_lookup(None, |name| vars.get(name).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: TIMEOUT_VAR, .. }));

        let vars = env(&[(TOKEN_VAR, "ABC123"), (URL_VAR, "redcap.example.org")]);
        let err = RegistryConfig::from_lookup(None, |name| vars.get(name).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: URL_VAR, .. }));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = RegistryConfig::new("https://a.example/api/", "SECRET");
        let debug = format!("{config:?}");
        assert!(!debug.contains("SECRET"));
        assert!(debug.contains("[REDACTED]"));
    }
}

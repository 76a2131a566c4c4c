use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Development backend as seen from the Android emulator.
pub const DEFAULT_API_URL: &str = "http://10.0.2.2:5285/api/";

/// Per-request timeout applied by the transport.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL every endpoint path is appended to. Always ends with `/`.
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests do not have
    /// to mutate the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_url = optional(&lookup, "THERMOGUARD_API_URL", DEFAULT_API_URL);
        let api_url = normalize_base_url(&raw_url)?;
        let timeout_ms: u64 = optional(&lookup, "THERMOGUARD_TIMEOUT_MS", "30000")
            .parse()
            .context("THERMOGUARD_TIMEOUT_MS must be a positive integer")?;
        if timeout_ms == 0 {
            bail!("THERMOGUARD_TIMEOUT_MS must be a positive integer");
        }

        Ok(Self {
            api_url,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Checks the scheme and appends the trailing slash endpoint paths rely on.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        bail!("API URL must start with http:// or https://, got: {trimmed:?}");
    }
    if trimmed.ends_with('/') {
        Ok(trimmed.to_owned())
    } else {
        Ok(format!("{trimmed}/"))
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_millis(30_000));
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("THERMOGUARD_API_URL", "https://thermo.example.com/api"),
            ("THERMOGUARD_TIMEOUT_MS", "1500"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://thermo.example.com/api/");
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("THERMOGUARD_TIMEOUT_MS", "0")])).unwrap_err();
        assert!(err.to_string().contains("THERMOGUARD_TIMEOUT_MS"));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let err =
            Config::from_lookup(lookup_from(&[("THERMOGUARD_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("positive integer"));
    }

    #[test]
    fn base_url_without_scheme_is_rejected() {
        let err = normalize_base_url("localhost:5285/api").unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn base_url_keeps_existing_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:5285/api/").unwrap(),
            "http://localhost:5285/api/"
        );
    }
}

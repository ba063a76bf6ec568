//! Process configuration loaded from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

pub const ENV_BIND: &str = "GATEHOUSE_BIND";
pub const ENV_SITE_URL: &str = "GATEHOUSE_SITE_URL";
pub const ENV_SITE_SEED: &str = "GATEHOUSE_SITE_SEED";
pub const ENV_OPTIONS: &str = "GATEHOUSE_OPTIONS";
pub const ENV_SESSION_TTL_MINUTES: &str = "GATEHOUSE_SESSION_TTL_MINUTES";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Public base URL of the site, used to build permalinks and return paths.
    pub site_url: String,
    /// JSON document describing site content; the demo shop when unset.
    pub site_seed: Option<PathBuf>,
    /// JSON document of initial option values (e.g. gate settings).
    pub options: Option<PathBuf>,
    pub session_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            site_url: "http://localhost:8080".to_string(),
            site_seed: None,
            options: None,
            session_ttl: Duration::hours(2),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset or blank variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(ENV_BIND) {
            config.bind_addr = raw
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_BIND, &raw, e))?;
        }

        if let Some(raw) = get(ENV_SITE_URL) {
            let parsed = url::Url::parse(&raw).map_err(|e| ConfigError::invalid(ENV_SITE_URL, &raw, e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::invalid(ENV_SITE_URL, &raw, "scheme must be http or https"));
            }
            config.site_url = raw.trim_end_matches('/').to_string();
        }

        config.site_seed = get(ENV_SITE_SEED).map(PathBuf::from);
        config.options = get(ENV_OPTIONS).map(PathBuf::from);

        if let Some(raw) = get(ENV_SESSION_TTL_MINUTES) {
            let minutes: i64 = raw
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_SESSION_TTL_MINUTES, &raw, e))?;
            if minutes <= 0 {
                return Err(ConfigError::invalid(ENV_SESSION_TTL_MINUTES, &raw, "must be positive"));
            }
            config.session_ttl = Duration::minutes(minutes);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(load(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            (ENV_BIND, "127.0.0.1:9000"),
            (ENV_SITE_URL, "https://shop.example/"),
            (ENV_SITE_SEED, "/etc/gatehouse/site.json"),
            (ENV_SESSION_TTL_MINUTES, "15"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.site_url, "https://shop.example");
        assert_eq!(config.site_seed, Some(PathBuf::from("/etc/gatehouse/site.json")));
        assert_eq!(config.options, None);
        assert_eq!(config.session_ttl, Duration::minutes(15));
    }

    #[test]
    fn blank_values_keep_defaults() {
        assert_eq!(load(&[(ENV_BIND, "  ")]).unwrap().bind_addr, AppConfig::default().bind_addr);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            load(&[(ENV_BIND, "not-an-addr")]),
            Err(ConfigError::Invalid { var: ENV_BIND, .. })
        ));
        assert!(load(&[(ENV_SITE_URL, "ftp://shop.example")]).is_err());
        assert!(load(&[(ENV_SESSION_TTL_MINUTES, "0")]).is_err());
    }
}

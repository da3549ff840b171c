use std::{env, str::FromStr, time::Duration};

use billwatch_core::freshness::FreshnessPolicy;
use billwatch_core::retry::RetryPolicy;

use crate::sync::EngineSettings;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bill freshness TTL in seconds (default: 86,400)
    pub bill_ttl_seconds: u64,
    /// Summary freshness TTL in seconds (default: 604,800)
    pub summary_ttl_seconds: u64,
    /// How long a not-found answer is remembered (default: 300)
    pub not_found_ttl_seconds: u64,
    /// Per-attempt upstream timeout in seconds (default: 30)
    pub upstream_timeout_seconds: u64,
    /// Attempts per fetch, including the first (default: 3)
    pub retry_max_attempts: u32,
    pub retry_initial_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "billwatch.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Expired-entry sweep interval in seconds; 0 disables (default: 3,600)
    pub cleanup_interval_seconds: u64,
    /// Age at which the sweep drops a bill (default: 2,592,000).
    /// Clamped to at least the bill TTL.
    pub cache_retention_seconds: u64,
    pub openstates_base_url: String,
    pub openstates_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BILL_TTL_SECONDS` - Bill TTL (default: 86400)
    /// - `SUMMARY_TTL_SECONDS` - Summary TTL (default: 604800)
    /// - `NOT_FOUND_TTL_SECONDS` - Not-found TTL (default: 300)
    /// - `UPSTREAM_TIMEOUT_SECONDS` - Per-call timeout (default: 30)
    /// - `RETRY_MAX_ATTEMPTS` - Attempts per fetch (default: 3)
    /// - `RETRY_INITIAL_DELAY_MS` - First backoff delay (default: 250)
    /// - `RETRY_MAX_DELAY_MS` - Backoff cap (default: 5000)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "billwatch.db")
    /// - `CLEANUP_INTERVAL_SECONDS` - Sweep interval, 0 disables (default: 3600)
    /// - `CACHE_RETENTION_SECONDS` - Bill age the sweep removes (default: 2592000)
    /// - `OPENSTATES_BASE_URL` - Legislative API (default: "https://v3.openstates.org")
    /// - `OPENSTATES_API_KEY` - Sent as `X-API-KEY` (default: unset)
    /// - `OPENAI_BASE_URL` - Model provider (default: "https://api.openai.com/v1")
    /// - `OPENAI_API_KEY` - Bearer token (default: unset)
    /// - `OPENAI_MODEL` - Model identifier (default: "gpt-4o")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse_or = |key: &str, default| parse_var(&lookup, key).unwrap_or(default);
        let string_or = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| default.to_string())
        };
        let secret = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            bill_ttl_seconds: parse_or("BILL_TTL_SECONDS", 86_400),
            summary_ttl_seconds: parse_or("SUMMARY_TTL_SECONDS", 604_800),
            not_found_ttl_seconds: parse_or("NOT_FOUND_TTL_SECONDS", 300),
            upstream_timeout_seconds: parse_or("UPSTREAM_TIMEOUT_SECONDS", 30),
            retry_max_attempts: parse_var(&lookup, "RETRY_MAX_ATTEMPTS").unwrap_or(3),
            retry_initial_delay_ms: parse_or("RETRY_INITIAL_DELAY_MS", 250),
            retry_max_delay_ms: parse_or("RETRY_MAX_DELAY_MS", 5_000),
            cache_max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES").unwrap_or(10_000),
            sqlite_path: string_or("SQLITE_PATH", "billwatch.db"),
            cleanup_interval_seconds: parse_or("CLEANUP_INTERVAL_SECONDS", 3_600),
            cache_retention_seconds: parse_or("CACHE_RETENTION_SECONDS", 2_592_000),
            openstates_base_url: string_or("OPENSTATES_BASE_URL", "https://v3.openstates.org"),
            openstates_api_key: secret("OPENSTATES_API_KEY"),
            openai_base_url: string_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_api_key: secret("OPENAI_API_KEY"),
            openai_model: string_or("OPENAI_MODEL", "gpt-4o"),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }

    /// Engine tunables derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            freshness: FreshnessPolicy {
                bill_ttl: Duration::from_secs(self.bill_ttl_seconds),
                summary_ttl: Duration::from_secs(self.summary_ttl_seconds),
                not_found_ttl: Duration::from_secs(self.not_found_ttl_seconds),
            },
            retry: RetryPolicy {
                max_attempts: self.retry_max_attempts,
                initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
                max_delay: Duration::from_millis(self.retry_max_delay_ms),
                ..RetryPolicy::default()
            },
            upstream_timeout: self.upstream_timeout(),
            retention: Duration::from_secs(self.cache_retention_seconds),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.bill_ttl_seconds, 86_400);
        assert_eq!(config.summary_ttl_seconds, 604_800);
        assert_eq!(config.not_found_ttl_seconds, 300);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_max_attempts, 3);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.sqlite_path, "billwatch.db");
        assert_eq!(config.cleanup_interval(), Duration::from_secs(3_600));
        assert_eq!(config.cache_retention_seconds, 2_592_000);
        assert_eq!(config.openstates_base_url, "https://v3.openstates.org");
        assert_eq!(config.openstates_api_key, None);
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.openai_model, "gpt-4o");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BILL_TTL_SECONDS", "60"),
            ("RETRY_MAX_ATTEMPTS", "5"),
            ("CLEANUP_INTERVAL_SECONDS", "0"),
            ("OPENSTATES_API_KEY", "abc"),
        ]);

        assert_eq!(config.bill_ttl_seconds, 60);
        assert_eq!(config.retry_max_attempts, 5);
        assert!(config.cleanup_interval().is_zero());
        assert_eq!(config.openstates_api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_unparseable_values_fall_back_to_defaults() {
        let config = config_from(&[("BILL_TTL_SECONDS", "a day"), ("CACHE_MAX_ENTRIES", "-1")]);

        assert_eq!(config.bill_ttl_seconds, 86_400);
        assert_eq!(config.cache_max_entries, 10_000);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = config_from(&[("OPENAI_API_KEY", "  ")]);
        assert_eq!(config.openai_api_key, None);
    }

    #[test]
    fn test_engine_settings() {
        let config = config_from(&[
            ("BILL_TTL_SECONDS", "60"),
            ("SUMMARY_TTL_SECONDS", "120"),
            ("RETRY_INITIAL_DELAY_MS", "10"),
            ("CACHE_RETENTION_SECONDS", "7200"),
        ]);

        let settings = config.engine_settings();

        assert_eq!(settings.freshness.bill_ttl, Duration::from_secs(60));
        assert_eq!(settings.freshness.summary_ttl, Duration::from_secs(120));
        assert_eq!(settings.freshness.not_found_ttl, Duration::from_secs(300));
        assert_eq!(settings.retry.initial_delay, Duration::from_millis(10));
        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.upstream_timeout, Duration::from_secs(30));
        assert_eq!(settings.retention, Duration::from_secs(7_200));
    }
}

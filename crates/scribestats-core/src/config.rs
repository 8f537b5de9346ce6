//! Environment-driven application configuration.
//!
//! Every knob has a default so the CLI works out of the box against a saved
//! dashboard page; the session cookie is only needed for live fetches.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Clone)]
pub struct AppConfig {
    /// Origin of the content-hosting site, no trailing slash.
    pub base_url: String,
    /// Session cookie header value inherited from the user's browser login.
    /// Absent means only `--input FILE` refreshes are possible.
    pub session_cookie: Option<String>,
    /// Directory holding the history log files.
    pub data_dir: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Fixed delay between per-article enrichment fetches.
    pub inter_request_delay_ms: u64,
    /// Bounded observation window for asynchronously-rendered dashboards.
    pub extract_timeout_secs: u64,
    pub extract_poll_interval_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[redacted]"),
            )
            .field("data_dir", &self.data_dir)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("extract_timeout_secs", &self.extract_timeout_secs)
            .field(
                "extract_poll_interval_ms",
                &self.extract_poll_interval_ms,
            )
            .finish()
    }
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = or_default("SCRIBESTATS_BASE_URL", "https://medium.com")
        .trim_end_matches('/')
        .to_string();
    let session_cookie = lookup("SCRIBESTATS_SESSION_COOKIE").ok();
    let data_dir = PathBuf::from(or_default("SCRIBESTATS_DATA_DIR", "./scribestats-data"));
    let log_level = or_default("SCRIBESTATS_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("SCRIBESTATS_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SCRIBESTATS_USER_AGENT", "scribestats/0.1 (writer-analytics)");
    let inter_request_delay_ms = parse_u64("SCRIBESTATS_INTER_REQUEST_DELAY_MS", "300")?;
    let extract_timeout_secs = parse_u64("SCRIBESTATS_EXTRACT_TIMEOUT_SECS", "10")?;
    let extract_poll_interval_ms = parse_u64("SCRIBESTATS_EXTRACT_POLL_INTERVAL_MS", "500")?;

    Ok(AppConfig {
        base_url,
        session_cookie,
        data_dir,
        log_level,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        extract_timeout_secs,
        extract_poll_interval_ms,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_env_yields_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.base_url, "https://medium.com");
        assert!(config.session_cookie.is_none());
        assert_eq!(config.inter_request_delay_ms, 300);
        assert_eq!(config.extract_timeout_secs, 10);
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let mut map = HashMap::new();
        map.insert("SCRIBESTATS_BASE_URL", "https://example.com/");
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.base_url, "https://example.com");
    }

    #[test]
    fn invalid_delay_is_rejected() {
        let mut map = HashMap::new();
        map.insert("SCRIBESTATS_INTER_REQUEST_DELAY_MS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. })
                if var == "SCRIBESTATS_INTER_REQUEST_DELAY_MS"
        ));
    }

    #[test]
    fn debug_redacts_session_cookie() {
        let mut map = HashMap::new();
        map.insert("SCRIBESTATS_SESSION_COOKIE", "sid=secret");
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
    }
}

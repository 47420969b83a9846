use std::path::PathBuf;

use expo_admin_core::locale::Locale;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} has an invalid value `{value}`: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Console configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash. Requests go to
    /// `{api_url}/api/{endpoint}`.
    pub api_url: String,
    /// Base URL for uploaded assets.
    pub static_url: String,
    /// File holding the persisted `auth_token`.
    pub token_file: PathBuf,
    pub request_timeout_secs: u64,
    /// Locale of interface messages.
    pub locale: Locale,
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                     | Default                       |
    /// |-----------------------------|-------------------------------|
    /// | `EXPO_API_URL`              | required                      |
    /// | `EXPO_STATIC_URL`           | value of `EXPO_API_URL`       |
    /// | `EXPO_TOKEN_FILE`           | `$HOME/.expo-admin/auth_token`|
    /// | `EXPO_REQUEST_TIMEOUT_SECS` | `30`                          |
    /// | `EXPO_UI_LOCALE`            | `ru`                          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = var("EXPO_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or(ConfigError::Missing("EXPO_API_URL"))?;
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "EXPO_API_URL",
                value: api_url,
                reason: "expected an http:// or https:// URL",
            });
        }

        let static_url = var("EXPO_STATIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| api_url.clone());

        let token_file = match var("EXPO_TOKEN_FILE") {
            Some(path) => PathBuf::from(path),
            None => {
                let home = var("HOME").ok_or(ConfigError::Missing("EXPO_TOKEN_FILE"))?;
                PathBuf::from(home).join(".expo-admin").join("auth_token")
            }
        };

        let request_timeout_secs = match var("EXPO_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "EXPO_REQUEST_TIMEOUT_SECS",
                value: raw,
                reason: "expected a whole number of seconds",
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let locale = match var("EXPO_UI_LOCALE") {
            Some(raw) => Locale::from_code(&raw).ok_or(ConfigError::Invalid {
                var: "EXPO_UI_LOCALE",
                value: raw,
                reason: "expected one of tk, en, ru",
            })?,
            None => Locale::default(),
        };

        Ok(Self {
            api_url,
            static_url,
            token_file,
            request_timeout_secs,
            locale,
        })
    }
}

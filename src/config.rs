use std::net::SocketAddr;

use crate::constants::{
    API_KEY_ENV, BIND_ADDR_ENV, DEFAULT_BIND_ADDR, DEFAULT_CAPTION_MODEL,
    DEFAULT_GEMINI_ENDPOINT, DEFAULT_MAX_UPLOAD_BYTES, ENDPOINT_ENV, LEGACY_API_KEY_ENV,
    MAX_UPLOAD_BYTES_ENV, MODEL_ENV,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid socket address: {value}")]
    InvalidAddr { name: &'static str, value: String },

    #[error("{name} must be a positive byte count, got {value}")]
    InvalidByteCount { name: &'static str, value: String },
}

/// Process-wide settings, read once at startup and never mutated.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Loads `.env` (if any) and then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = non_empty(API_KEY_ENV).or_else(|| non_empty(LEGACY_API_KEY_ENV));

        let model = non_empty(MODEL_ENV).unwrap_or_else(|| DEFAULT_CAPTION_MODEL.to_string());
        let endpoint =
            non_empty(ENDPOINT_ENV).unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string());

        let bind_value = non_empty(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr {
                name: BIND_ADDR_ENV,
                value: bind_value.clone(),
            })?;

        let max_upload_bytes = match non_empty(MAX_UPLOAD_BYTES_ENV) {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|bytes| *bytes > 0)
                .ok_or(ConfigError::InvalidByteCount {
                    name: MAX_UPLOAD_BYTES_ENV,
                    value,
                })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            api_key,
            model,
            endpoint,
            bind_addr,
            max_upload_bytes,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("bind_addr", &self.bind_addr)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_CAPTION_MODEL);
        assert_eq!(config.endpoint, DEFAULT_GEMINI_ENDPOINT);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn legacy_key_name_is_a_fallback() {
        let config = config_from(&[(LEGACY_API_KEY_ENV, "legacy")]).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("legacy"));

        let config = config_from(&[(LEGACY_API_KEY_ENV, "legacy"), (API_KEY_ENV, "primary")]).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = config_from(&[(API_KEY_ENV, "   ")]).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[(BIND_ADDR_ENV, "localhost")]),
            Err(ConfigError::InvalidAddr { .. })
        ));
        assert!(matches!(
            config_from(&[(MAX_UPLOAD_BYTES_ENV, "0")]),
            Err(ConfigError::InvalidByteCount { .. })
        ));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = config_from(&[(API_KEY_ENV, "super-secret")]).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

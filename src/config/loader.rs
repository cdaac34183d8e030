use std::env;

use url::Url;

use super::env::{AppConfig, ConfigError, DirectoryConfig, GeminiConfig, LoggingConfig};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_RETENTION_DAYS: usize = 7;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        // A missing key surfaces only when a call is attempted.
        let api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY"));

        let api_base = non_empty("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = validate_base(&api_base)?;

        let gemini = GeminiConfig {
            api_key,
            model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base,
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            retention_days: retention_days(non_empty("LOG_RETENTION_DAYS")),
        };

        let timezone = env::var("DISPLAY_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());

        Ok(Self {
            gemini,
            directories,
            logging,
            timezone,
        })
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// Unparseable or zero values fall back to the default.
fn retention_days(raw: Option<String>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_RETENTION_DAYS)
}

fn validate_base(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|err| ConfigError::Invalid {
        key: "GEMINI_API_BASE",
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: "GEMINI_API_BASE",
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

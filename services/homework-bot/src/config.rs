//! Configuration types for the homework bot

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
///
/// Credentials may come from the config file, but the environment variables
/// applied by [`Config::apply_env`] (from `.env` or the process) take
/// precedence.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub practicum_token: Option<String>,
    #[serde(default)]
    pub telegram_token: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    #[serde(default = "default_retry_interval")]
    pub retry_interval_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            practicum_token: None,
            telegram_token: None,
            telegram_chat_id: None,
            endpoint: default_endpoint(),
            telegram_api_url: default_telegram_api_url(),
            retry_interval_seconds: default_retry_interval(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &redact(&self.practicum_token))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_interval_seconds", &self.retry_interval_seconds)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    match secret {
        Some(_) => "<set>",
        None => "<unset>",
    }
}

impl Config {
    /// Override credentials with values returned by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(PRACTICUM_TOKEN_VAR) {
            self.practicum_token = Some(value);
        }
        if let Some(value) = lookup(TELEGRAM_TOKEN_VAR) {
            self.telegram_token = Some(value);
        }
        if let Some(value) = lookup(TELEGRAM_CHAT_ID_VAR) {
            self.telegram_chat_id = Some(value);
        }
    }

    /// Override credentials from the process environment
    pub fn apply_process_env(&mut self) {
        self.apply_env(|name| std::env::var(name).ok());
    }

    /// Names of required credentials that are absent or empty
    pub fn missing_tokens(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN_VAR, &self.practicum_token),
            (TELEGRAM_TOKEN_VAR, &self.telegram_token),
            (TELEGRAM_CHAT_ID_VAR, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| name)
        .collect()
    }

    /// Check that all credentials are present, logging each one that is not
    pub fn check_tokens(&self) -> bool {
        let missing = self.missing_tokens();
        for name in &missing {
            tracing::error!(
                "Missing required variable \"{}\". The bot will not start.",
                name
            );
        }
        missing.is_empty()
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_interval() -> u64 {
    600
}

fn default_request_timeout() -> u64 {
    30
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::BotError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Read variables from the nearest `.env` file in the working directory or
/// its parents. A missing file yields an empty map.
pub fn load_dotenv() -> crate::Result<HashMap<String, String>> {
    match dotenvy::dotenv_iter() {
        Ok(iter) => collect_env(iter),
        Err(e) if e.not_found() => {
            tracing::debug!("No .env file found, using the process environment only");
            Ok(HashMap::new())
        }
        Err(e) => Err(dotenv_error(e)),
    }
}

/// Read variables from the dotenv file at `path`
pub fn load_env_file(path: &Path) -> crate::Result<HashMap<String, String>> {
    collect_env(dotenvy::from_path_iter(path).map_err(dotenv_error)?)
}

fn collect_env<R: std::io::Read>(
    iter: dotenvy::Iter<R>,
) -> crate::Result<HashMap<String, String>> {
    iter.map(|item| item.map_err(dotenv_error)).collect()
}

fn dotenv_error(e: dotenvy::Error) -> crate::BotError {
    crate::BotError::Config(format!("Failed to read .env file: {}", e))
}

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::{EyewitnessError, Result};

/// Application settings read by every client call.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the monitoring API, without trailing slash.
    pub api_url: String,
    /// Administrative switch. When `false`, pings short-circuit.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub app_token: String,
    pub secret_key: String,
    /// Runtime environment name reported with every ping.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Lock file uploaded by the dependency check.
    #[serde(default = "default_lock_file_path")]
    pub lock_file_path: PathBuf,
}

fn default_enabled() -> bool {
    true
}

fn default_environment() -> String {
    "production".to_owned()
}

fn default_lock_file_path() -> PathBuf {
    PathBuf::from("composer.lock")
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_url", &self.api_url)
            .field("enabled", &self.enabled)
            .field("app_token", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("lock_file_path", &self.lock_file_path)
            .finish()
    }
}

impl Settings {
    pub fn new(
        api_url: impl Into<String>,
        app_token: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            api_url: normalize_api_url(&api_url.into()),
            enabled: default_enabled(),
            app_token: app_token.into(),
            secret_key: secret_key.into(),
            environment: default_environment(),
            lock_file_path: default_lock_file_path(),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_lock_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_file_path = path.into();
        self
    }

    /// Reads settings from environment variables.
    ///
    /// Reads:
    /// - `EYEWITNESS_API_URL`, `EYEWITNESS_APP_TOKEN`, `EYEWITNESS_SECRET_KEY` (required)
    /// - `EYEWITNESS_ENABLED` — `true`/`false`, defaults to `true`
    /// - `APP_ENV` — environment name, defaults to `production`
    /// - `EYEWITNESS_LOCK_FILE` — defaults to `composer.lock`
    pub fn from_env() -> Result<Self> {
        let api_url = required_var("EYEWITNESS_API_URL")?;
        let app_token = required_var("EYEWITNESS_APP_TOKEN")?;
        let secret_key = required_var("EYEWITNESS_SECRET_KEY")?;
        let mut settings = Self::new(api_url, app_token, secret_key);

        if let Some(raw) = optional_var("EYEWITNESS_ENABLED") {
            settings.enabled = parse_bool(&raw).ok_or_else(|| {
                EyewitnessError::Config(format!("EYEWITNESS_ENABLED is not a boolean: '{raw}'"))
            })?;
        }
        if let Some(environment) = optional_var("APP_ENV") {
            settings.environment = environment;
        }
        if let Some(path) = optional_var("EYEWITNESS_LOCK_FILE") {
            settings.lock_file_path = PathBuf::from(path);
        }
        Ok(settings)
    }

    pub(crate) fn route_url(&self, route: &str) -> String {
        format!(
            "{}/{}",
            normalize_api_url(&self.api_url),
            route.trim_start_matches('/')
        )
    }
}

fn required_var(name: &str) -> Result<String> {
    let value = std::env::var(name)
        .map_err(|_| EyewitnessError::Config(format!("missing {name} environment variable")))?;
    if value.trim().is_empty() {
        return Err(EyewitnessError::Config(format!("{name} is set but empty")));
    }
    Ok(value)
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn normalize_api_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

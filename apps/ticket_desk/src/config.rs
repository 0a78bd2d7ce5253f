use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::SessionContext;
use ticket_core::transport::{DEFAULT_CATEGORIES_PATH, DEFAULT_CREATE_PATH};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub categories_path: String,
    pub create_path: String,
    pub request_timeout_secs: u64,
    pub employee_id: String,
    pub access_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".into(),
            categories_path: DEFAULT_CATEGORIES_PATH.into(),
            create_path: DEFAULT_CREATE_PATH.into(),
            request_timeout_secs: 30,
            employee_id: String::new(),
            access_token: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            employee_id: self.employee_id.clone(),
            access_token: self.access_token.clone(),
        }
    }
}

/// Defaults, then `path` if it exists, then `APP__*` environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let settings = read_settings_file(path)?;
    Ok(apply_env_overrides(settings, |key| std::env::var(key).ok()))
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("malformed settings file '{}'", path.display()))
}

fn apply_env_overrides(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__CATEGORIES_PATH") {
        settings.categories_path = v;
    }
    if let Some(v) = lookup("APP__CREATE_PATH") {
        settings.create_path = v;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APP__REQUEST_TIMEOUT_SECS"),
        }
    }
    if let Some(v) = lookup("APP__EMPLOYEE_ID") {
        settings.employee_id = v;
    }
    if let Some(v) = lookup("APP__ACCESS_TOKEN") {
        settings.access_token = Some(v).filter(|token| !token.is_empty());
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

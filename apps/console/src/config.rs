use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use client_core::{remote_store::DEFAULT_EVENTS_TABLE, RemoteStoreConfig, ThemeParams};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "event-form.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub events_table: String,
    pub request_timeout_seconds: u64,
    pub theme: ThemeParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            events_table: DEFAULT_EVENTS_TABLE.into(),
            request_timeout_seconds: 10,
            theme: ThemeParams::default(),
        }
    }
}

impl Settings {
    /// Remote persistence is only configured when both url and key are set.
    pub fn remote_store_config(&self) -> Option<RemoteStoreConfig> {
        let url = self.supabase_url.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        let key = self
            .supabase_anon_key
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())?;

        let mut config = RemoteStoreConfig::new(url, key);
        config.table = self.events_table.clone();
        config.timeout = Duration::from_secs(self.request_timeout_seconds.max(1));
        Some(config)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    events_table: Option<String>,
    request_timeout_seconds: Option<u64>,
    #[serde(default)]
    theme: Option<ThemeParams>,
}

/// Defaults, then the TOML file, then environment variables.
///
/// An explicitly passed config path must exist; the default file is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_from(config_path, |key| std::env::var(key).ok())
}

fn load_settings_from(
    config_path: Option<&Path>,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if required || path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
    }

    apply_env(&mut settings, var);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.supabase_url {
        settings.supabase_url = Some(v);
    }
    if let Some(v) = file_cfg.supabase_anon_key {
        settings.supabase_anon_key = Some(v);
    }
    if let Some(v) = file_cfg.events_table {
        settings.events_table = v;
    }
    if let Some(v) = file_cfg.request_timeout_seconds {
        settings.request_timeout_seconds = v;
    }
    if let Some(v) = file_cfg.theme {
        settings.theme = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SUPABASE_URL") {
        settings.supabase_url = Some(v);
    }
    if let Some(v) = var("APP__SUPABASE_URL") {
        settings.supabase_url = Some(v);
    }

    if let Some(v) = var("SUPABASE_ANON_KEY") {
        settings.supabase_anon_key = Some(v);
    }
    if let Some(v) = var("APP__SUPABASE_ANON_KEY") {
        settings.supabase_anon_key = Some(v);
    }

    if let Some(v) = var("APP__EVENTS_TABLE") {
        settings.events_table = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_run_offline() {
    let settings = Settings::default();
    assert_eq!(settings.events_table, "events");
    assert!(settings.remote_store_config().is_none());
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r##"
supabase_url = "https://project.supabase.co"
supabase_anon_key = "file-key"
events_table = "meetups"
request_timeout_seconds = 3

[theme]
bg_color = "#000000"
"##,
    )
    .expect("parse");

    let remote = settings.remote_store_config().expect("remote");
    assert_eq!(remote.base_url, "https://project.supabase.co");
    assert_eq!(remote.api_key, "file-key");
    assert_eq!(remote.table, "meetups");
    assert_eq!(remote.timeout, Duration::from_secs(3));
    assert_eq!(settings.theme.bg_color.as_deref(), Some("#000000"));
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let mut settings = Settings::default();
    apply_file(&mut settings, r#"supabase_url = "https://file.example""#).expect("parse");

    apply_env(
        &mut settings,
        env_from(&[
            ("SUPABASE_URL", "https://plain.example"),
            ("APP__SUPABASE_URL", "https://prefixed.example"),
            ("SUPABASE_ANON_KEY", "env-key"),
            ("APP__REQUEST_TIMEOUT_SECONDS", "not-a-number"),
        ]),
    );

    assert_eq!(settings.supabase_url.as_deref(), Some("https://prefixed.example"));
    assert_eq!(settings.supabase_anon_key.as_deref(), Some("env-key"));
    assert_eq!(settings.request_timeout_seconds, 10);
}

#[test]
fn blank_key_keeps_remote_disabled() {
    let settings = Settings {
        supabase_url: Some("https://project.supabase.co".into()),
        supabase_anon_key: Some("   ".into()),
        ..Settings::default()
    };
    assert!(settings.remote_store_config().is_none());
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("event_form_missing_{suffix}.toml"));

    let err = load_settings(Some(&missing)).expect_err("missing file");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn explicit_config_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("event_form_config_{suffix}.toml"));
    fs::write(&path, "events_table = \"gatherings\"\n").expect("write config");

    let settings = load_settings_from(Some(&path), env_from(&[])).expect("load");
    assert_eq!(settings.events_table, "gatherings");
    assert!(settings.remote_store_config().is_none());

    fs::remove_file(path).expect("cleanup");
}

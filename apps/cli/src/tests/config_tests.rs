use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(tag: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("finddog_config_{tag}_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn defaults_point_at_the_shelter_service() {
    let settings = Settings::default();
    assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.log_filter, "info");
    assert!(settings.name.is_none());
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config(
        "file_values",
        r#"
base_url = "http://localhost:9000"
name = "Ada"
log = "debug"
"#,
    );

    let file_cfg = read_file_settings(&path, true)
        .expect("read config")
        .expect("file present");
    let mut settings = Settings::default();
    apply_file(&mut settings, file_cfg);

    assert_eq!(settings.base_url, "http://localhost:9000");
    assert_eq!(settings.name.as_deref(), Some("Ada"));
    assert!(settings.email.is_none());
    assert_eq!(settings.log_filter, "debug");

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let env: HashMap<&str, &str> = [
        ("FINDDOG_BASE_URL", "http://plain"),
        ("APP__BASE_URL", "http://app"),
        ("FINDDOG_EMAIL", "ada@example.com"),
    ]
    .into_iter()
    .collect();

    let mut settings = Settings::default();
    apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.base_url, "http://app");
    assert_eq!(settings.email.as_deref(), Some("ada@example.com"));
    assert!(settings.name.is_none());
}

#[test]
fn missing_default_file_is_not_an_error() {
    let path = env::temp_dir().join("finddog_config_test_missing.toml");
    assert!(read_file_settings(&path, false).expect("optional").is_none());
    assert!(read_file_settings(&path, true).is_err());
}

#[test]
fn malformed_file_is_reported() {
    let path = temp_config("malformed", "base_url = [");
    let err = read_file_settings(&path, true).expect_err("bad toml");
    assert!(err.to_string().contains("failed to parse config"));
    fs::remove_file(path).expect("cleanup");
}

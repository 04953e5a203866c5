use super::*;

use std::{collections::HashMap, io::Write};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn defaults_point_at_randomuser_with_batches_of_ten() {
    let settings = Settings::default();
    assert_eq!(settings.api_url, "https://randomuser.me/api/");
    assert_eq!(settings.batch_size, 10);
    assert!(settings.validate().is_ok());
}

#[test]
fn file_values_override_defaults() {
    let file = write_config(
        r#"
api_url = "http://127.0.0.1:9000/api/"
batch_size = 4
seed = "demo"
exit_fallback_ms = 250
"#,
    );
    let mut settings = Settings::default();
    apply_file(&mut settings, file.path()).expect("apply file");

    assert_eq!(settings.api_url, "http://127.0.0.1:9000/api/");
    assert_eq!(settings.batch_size, 4);
    assert_eq!(settings.seed.as_deref(), Some("demo"));
    assert_eq!(settings.nationalities, None);
    assert_eq!(settings.exit_fallback_ms, 250);
    assert_eq!(settings.exit_animation_ms, Settings::default().exit_animation_ms);
}

#[test]
fn unknown_keys_in_file_are_rejected() {
    let file = write_config("batch_sise = 3\n");
    let err = apply_file(&mut Settings::default(), file.path()).expect_err("typo rejected");
    assert!(matches!(err, SettingsError::Parse { .. }));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_settings(Some(&dir.path().join("absent.toml"))).expect_err("missing file");
    assert!(matches!(err, SettingsError::Read { .. }));
}

#[test]
fn env_overrides_beat_file_values() {
    let mut settings = Settings {
        batch_size: 4,
        ..Settings::default()
    };
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("SWIPE_API_URL", "http://localhost:1/a/"),
            ("APP__API_URL", "http://localhost:2/b/"),
            ("APP__BATCH_SIZE", " 25 "),
            ("APP__NAT", "gb,fr"),
            ("APP__EXIT_FALLBACK_MS", "not-a-number"),
        ]),
    );

    assert_eq!(settings.api_url, "http://localhost:2/b/");
    assert_eq!(settings.batch_size, 25);
    assert_eq!(settings.nationalities.as_deref(), Some("gb,fr"));
    assert_eq!(settings.exit_fallback_ms, Settings::default().exit_fallback_ms);
}

#[test]
fn blank_env_values_are_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, env_from(&[("APP__SEED", "  ")]));
    assert_eq!(settings.seed, None);
}

#[test]
fn validation_rejects_bad_url_and_empty_batch() {
    let bad_url = Settings {
        api_url: "not a url".into(),
        ..Settings::default()
    };
    assert!(matches!(
        bad_url.validate(),
        Err(SettingsError::InvalidApiUrl { .. })
    ));

    let empty = Settings {
        batch_size: 0,
        ..Settings::default()
    };
    assert!(matches!(empty.validate(), Err(SettingsError::EmptyBatch)));
}

#[test]
fn validation_rejects_fallback_shorter_than_animation() {
    let zero = Settings {
        exit_fallback_ms: 0,
        ..Settings::default()
    };
    assert!(matches!(
        zero.validate(),
        Err(SettingsError::FallbackBeforeAnimation {
            fallback_ms: 0,
            animation_ms: 350
        })
    ));

    let equal = Settings {
        exit_animation_ms: 500,
        exit_fallback_ms: 500,
        ..Settings::default()
    };
    assert!(equal.validate().is_ok());
}

#[test]
fn loaded_file_with_early_fallback_fails_validation() {
    let file = write_config("exit_animation_ms = 400\nexit_fallback_ms = 100\n");
    let err = load_settings(Some(file.path())).expect_err("fallback before animation");
    assert!(matches!(err, SettingsError::FallbackBeforeAnimation { .. }));
}

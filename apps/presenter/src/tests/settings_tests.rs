use super::*;

use std::fs;

fn env_with(pairs: &[(&str, &str)]) -> Environment {
    let vars: config::Map<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    environment().source(Some(vars))
}

#[test]
fn missing_file_yields_defaults() {
    let temp = tempfile::tempdir().expect("tempdir");
    let settings =
        load_settings_with(&temp.path().join("presenter.toml"), env_with(&[])).expect("settings");

    assert_eq!(settings, PresenterSettings::default());
    assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
    assert_eq!(settings.controller.exit_delay_ms, 200);
}

#[test]
fn file_and_environment_layer_over_defaults() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("presenter.toml");
    fs::write(
        &path,
        "server_url = \"http://deck.local:8080\"\n\n[controller]\nexit_delay_ms = 100\npersist_debounce_ms = 250\n",
    )
    .expect("write settings");

    let settings = load_settings_with(
        &path,
        env_with(&[
            ("PRESENTER__TICK_INTERVAL_MS", "25"),
            ("PRESENTER__CONTROLLER__PERSIST_DEBOUNCE_MS", "900"),
        ]),
    )
    .expect("settings");

    assert_eq!(settings.server_url, "http://deck.local:8080");
    assert_eq!(settings.tick_interval_ms, 25);
    assert_eq!(settings.controller.exit_delay_ms, 100);
    assert_eq!(settings.controller.persist_debounce_ms, 900);
    assert_eq!(settings.controller.view_settle_ms, 500);
}

#[test]
fn malformed_values_are_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("presenter.toml");
    fs::write(&path, "tick_interval_ms = \"soon\"\n").expect("write settings");

    assert!(load_settings_with(&path, env_with(&[])).is_err());
}

//! Tests for configuration layer precedence.

use rstest::rstest;
use serde_json::{Value, json};

use super::helpers::build_config_from_layers;

#[rstest]
#[case::file_overrides_defaults(
    vec![("defaults", json!({"workspace": "default-ws"})), ("file", json!({"workspace": "file-ws"}))],
    "workspace",
    "file-ws",
    "file should override default"
)]
#[case::environment_overrides_file(
    vec![("file", json!({"token": "file-token"})), ("environment", json!({"token": "env-token"}))],
    "token",
    "env-token",
    "environment should override file"
)]
#[case::cli_overrides_environment(
    vec![("environment", json!({"repo": "env-repo"})), ("cli", json!({"repo": "cli-repo"}))],
    "repo",
    "cli-repo",
    "CLI should override environment"
)]
#[case::api_root_defaults_file_env_cli(
    vec![
        ("defaults", json!({"api_root": "https://default.example/2.0"})),
        ("file", json!({"api_root": "https://file.example/2.0"})),
        ("environment", json!({"api_root": "https://env.example/2.0"})),
        ("cli", json!({"api_root": "https://cli.example/2.0"}))
    ],
    "api_root",
    "https://cli.example/2.0",
    "CLI should win for api_root"
)]
fn test_layer_precedence(
    #[case] layers: Vec<(&str, Value)>,
    #[case] field: &str,
    #[case] expected: &str,
    #[case] message: &str,
) {
    let config = build_config_from_layers(&layers);

    let actual = match field {
        "workspace" => config.workspace.as_deref(),
        "repo" => config.repo.as_deref(),
        "token" => config.token.as_deref(),
        "api_root" => config.api_root.as_deref(),
        _ => panic!("unknown field: {field}"),
    };

    assert_eq!(actual, Some(expected), "{message}");
}

#[rstest]
fn defaults_apply_when_no_sources_provided() {
    let config = build_config_from_layers(&[("defaults", json!({"workspace": null}))]);

    assert!(config.workspace.is_none(), "workspace should be None");
    assert!(config.token.is_none(), "token should be None");
    assert_eq!(
        config.timeout_seconds, 30,
        "timeout should default to 30 seconds"
    );
    assert!(!config.quiet, "quiet should default to false");
}

#[rstest]
fn file_booleans_are_merged() {
    let config = build_config_from_layers(&[(
        "file",
        json!({"oneline": true, "hide_current": true, "username": "alice"}),
    )]);

    assert!(config.oneline);
    assert!(config.hide_current);
    assert_eq!(config.username.as_deref(), Some("alice"));
}

use std::{fs, path::Path};

use tempfile::{TempDir, tempdir};

use filecascade_cli::{Args, ItemKind, ValueKind, run};

/// Creates a workspace with a configuration file and a few items.
fn workspace() -> TempDir {
    let dir = tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("config.toml"), "[parsing]\nencoding = \"utf-8\"\n").unwrap();
    fs::write(dir.path().join("greeting.txt"), "hello").unwrap();
    fs::write(dir.path().join("port.txt"), "8080\n").unwrap();
    fs::write(dir.path().join("server.toml"), "host = \"localhost\"\n").unwrap();

    let limits = dir.path().join("limits");
    fs::create_dir(&limits).unwrap();
    fs::write(limits.join("low.txt"), "1").unwrap();
    fs::write(limits.join("high.txt"), "9").unwrap();
    dir
}

fn args(root: &Path, item: &str, kind: ValueKind) -> Args {
    Args {
        input: root.join(item).to_string_lossy().to_string(),
        kind,
        item_type: ItemKind::String,
        config: Some(root.join("config.toml").to_string_lossy().to_string()),
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_text_is_printed_as_is() {
    let dir = workspace();

    let output = run(&args(dir.path(), "greeting", ValueKind::String)).unwrap();

    assert_eq!(output, "hello");
}

#[test]
fn e2e_smoke_test_converted_value() {
    let dir = workspace();

    let output = run(&args(dir.path(), "port", ValueKind::Int)).unwrap();

    assert_eq!(output, "8080");
}

#[test]
fn e2e_smoke_test_toml_table() {
    let dir = workspace();

    let output = run(&args(dir.path(), "server", ValueKind::Toml)).unwrap();

    assert!(output.contains("localhost"));
}

#[test]
fn e2e_smoke_test_dict_of_items() {
    let dir = workspace();
    let mut args = args(dir.path(), "limits", ValueKind::Dict);
    args.item_type = ItemKind::Int;

    let output = run(&args).unwrap();

    assert!(output.contains("\"high\": 9"));
    assert!(output.contains("\"low\": 1"));
}

#[test]
fn e2e_smoke_test_list_of_items() {
    let dir = workspace();
    let mut args = args(dir.path(), "limits", ValueKind::List);
    args.item_type = ItemKind::Int;

    let output = run(&args).unwrap();

    let high = output.find('9').unwrap();
    let low = output.find('1').unwrap();
    assert!(high < low, "items must follow name order: {output}");
}

#[test]
fn e2e_smoke_test_missing_item_fails() {
    let dir = workspace();

    let result = run(&args(dir.path(), "absent", ValueKind::String));

    assert!(result.is_err(), "Expected a missing item to fail");
}

#[test]
fn e2e_smoke_test_missing_config_fails() {
    let dir = workspace();
    let mut args = args(dir.path(), "greeting", ValueKind::String);
    args.config = Some(dir.path().join("absent.toml").to_string_lossy().to_string());

    let err = run(&args).unwrap_err();

    assert!(err.to_string().contains("Missing configuration file"));
}

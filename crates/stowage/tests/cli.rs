//! End-to-end tests for the `stowage` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const VOLUMES: &str = r#"[
  {"id": "vol-2", "name": "logs", "size": 20},
  {"id": "vol-1", "name": "data", "size": 100, "attachments": [{"deviceName": "/dev/xvdf"}]}
]"#;

fn stowage(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stowage"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_input(dir: &Path, contents: &str) -> String {
    let path = dir.join("input.json");
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_renders_aligned_volume_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), VOLUMES);

    let out = stowage(&["render", "--kind", "volumes", "--input", &input]);
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "ID     Name  Status     Size\n\
         vol-1  data  attached   100\n\
         vol-2  logs  available  20\n"
    );
}

#[test]
fn test_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), VOLUMES);

    let out = stowage(&["render", "-k", "volumes", "-i", &input, "-f", "json"]);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value[0]["id"], "vol-2");
}

#[test]
fn test_config_file_and_flags() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), r#"["b", "a"]"#);
    let config = dir.path().join("output.yaml");
    fs::write(&config, "format: \"{{ data | join(',') }}\\n\"\n").unwrap();

    let out = stowage(&[
        "render",
        "-k",
        "strings",
        "-i",
        &input,
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "b,a\n");

    let out = stowage(&[
        "render",
        "-k",
        "strings",
        "-i",
        &input,
        "--config",
        config.to_str().unwrap(),
        "--format",
        "tmpl",
    ]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "a\nb\n");
}

#[test]
fn test_render_error_exits_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), VOLUMES);

    let out = stowage(&["render", "-k", "volumes", "-i", &input, "--template-name", "nope"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("template not found: nope"));
}

#[test]
fn test_bad_input_exits_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "{not json");

    let out = stowage(&["render", "-k", "volumes", "-i", &input]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("input is not valid JSON"));
}

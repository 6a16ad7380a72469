//! Tests for loading JSON trees and for the `opwalk` binary.

mod common;

use std::path::{Path, PathBuf};

use common::opwalk;
use opwalk::ir::{self, OperationKind};
use opwalk::WalkError;

const A_B_C_D: &str = r#"{
    "kind": "block",
    "children": [
        { "kind": "literal", "value": "b" },
        { "kind": "return", "children": [ { "kind": "local_reference", "name": "d" } ] }
    ]
}"#;

/// Temp project dir with a `.git` marker so config discovery stays inside it.
fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    dir
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn nested_json(levels: usize) -> String {
    let mut json = r#"{"kind":"local_reference","name":"x","span":{"start":0,"end":1}}"#.to_string();
    for _ in 1..levels {
        json = format!(r#"{{"kind":"parenthesized","children":[{json}]}}"#);
    }
    json
}

#[test]
fn test_load_tree_from_file() {
    let dir = project();
    let path = write(dir.path(), "tree.json", A_B_C_D);
    let tree = ir::load_tree(&path).unwrap();
    assert_eq!(tree.kind, OperationKind::Block);
    assert_eq!(tree.children().count(), 2);
}

#[test]
fn test_load_tree_reports_path_on_bad_json() {
    let dir = project();
    let path = write(dir.path(), "tree.json", r#"{"kind": "block", "children": ["#);
    match ir::load_tree(&path).unwrap_err() {
        WalkError::Load { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_load_tree_missing_file() {
    let dir = project();
    let err = ir::load_tree(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().starts_with("Load error: cannot read tree"));
}

#[test]
fn test_load_tree_rejects_misspelled_key() {
    let dir = project();
    let path = write(
        dir.path(),
        "tree.json",
        r#"{"kind":"block","childern":[{"kind":"return"}]}"#,
    );
    match ir::load_tree(&path).unwrap_err() {
        WalkError::Load { msg, .. } => assert!(msg.contains("childern"), "msg: {msg}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_load_tree_accepts_trees_deeper_than_default_limit() {
    let dir = project();
    let path = write(dir.path(), "tree.json", &nested_json(300));
    let tree = ir::load_tree(&path).unwrap();
    assert_eq!(tree.kind, OperationKind::Parenthesized);
}

#[test]
fn test_cli_walk_prints_preorder() {
    let dir = project();
    let path = write(dir.path(), "tree.json", A_B_C_D);
    let output = opwalk()
        .current_dir(dir.path())
        .arg("walk")
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Block\n  Literal\n  Return\n    LocalReference\n"
    );
}

#[test]
fn test_cli_outline_shows_payloads() {
    let dir = project();
    let path = write(dir.path(), "tree.json", A_B_C_D);
    let output = opwalk()
        .current_dir(dir.path())
        .arg("outline")
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Block\n  Literal b\n  Return\n    LocalReference d\n"
    );
}

#[test]
fn test_cli_stats_json() {
    let dir = project();
    let path = write(dir.path(), "tree.json", A_B_C_D);
    let output = opwalk()
        .current_dir(dir.path())
        .args(["stats", "--json"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["nodes"], 4);
    assert_eq!(stats["max_depth"], 3);
    assert_eq!(stats["placeholders"], 0);
    assert_eq!(stats["kinds"]["Literal"], 1);
}

#[test]
fn test_cli_max_depth_flag_exits_with_code_2() {
    let dir = project();
    let path = write(dir.path(), "tree.json", &nested_json(10));
    let output = opwalk()
        .current_dir(dir.path())
        .args(["walk", "--max-depth", "5"])
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nesting depth 6 exceeds limit 5"), "stderr: {stderr}");
}

#[test]
fn test_cli_max_depth_above_json_nesting_still_applies() {
    let dir = project();
    let path = write(dir.path(), "tree.json", &nested_json(100));
    let output = opwalk()
        .current_dir(dir.path())
        .args(["walk", "--max-depth", "80"])
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nesting depth 81 exceeds limit 80"), "stderr: {stderr}");
}

#[test]
fn test_cli_tree_within_default_limit_walks() {
    let dir = project();
    let path = write(dir.path(), "tree.json", &nested_json(200));
    let output = opwalk()
        .current_dir(dir.path())
        .arg("stats")
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("nodes: 200\nmax depth: 200\n"));
}

#[test]
fn test_cli_tree_past_default_limit_exits_with_code_2() {
    let dir = project();
    let path = write(dir.path(), "tree.json", &nested_json(300));
    let output = opwalk()
        .current_dir(dir.path())
        .arg("walk")
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nesting depth 257 exceeds limit 256"), "stderr: {stderr}");
}

#[test]
fn test_cli_misspelled_key_exits_with_code_1() {
    let dir = project();
    let path = write(dir.path(), "tree.json", r#"{"kind":"block","childern":[]}"#);
    let output = opwalk()
        .current_dir(dir.path())
        .arg("walk")
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error[load]"));
}

#[test]
fn test_cli_discovers_config_file() {
    let dir = project();
    write(dir.path(), "opwalk.toml", "[walker]\nmax-depth = 3\n");
    let path = write(dir.path(), "tree.json", &nested_json(4));
    let output = opwalk()
        .current_dir(dir.path())
        .arg("stats")
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    // The flag wins over the file.
    let output = opwalk()
        .current_dir(dir.path())
        .args(["stats", "--max-depth", "4"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("nodes: 4\nmax depth: 4\n"));
}

#[test]
fn test_cli_bad_config_exits_with_code_1() {
    let dir = project();
    let config = write(dir.path(), "custom.toml", "[walker]\nmax-depth = 0\n");
    let path = write(dir.path(), "tree.json", A_B_C_D);
    let output = opwalk()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("walk")
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error[config]"));
}

#[test]
fn test_cli_renders_source_location() {
    let dir = project();
    let source = write(dir.path(), "main.src", "x\n");
    let path = write(dir.path(), "tree.json", &nested_json(3));
    let output = opwalk()
        .current_dir(dir.path())
        .args(["walk", "--max-depth", "2", "--source"])
        .arg(&source)
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("operation tree too deep"), "stderr: {stderr}");
}

//! CLI Integration Tests
//!
//! These tests verify that the CLI commands work correctly end-to-end.
//! They test the actual binary behavior, not just the library.
//!
//! Run with:
//! ```bash
//! cargo test --test cli_integration
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

/// Get the path to the built binary
fn ygg_binary() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("target");
    path.push("debug");
    path.push("ygg");
    path
}

/// Run ygg and return (stdout, stderr, success)
fn run_ygg(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(ygg_binary())
        .args(args)
        .output()
        .expect("Failed to execute ygg");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// Write a newline-delimited items file
fn items_file(dir: &std::path::Path, lines: &[&str]) -> String {
    let path = dir.join("items.txt");
    fs::write(&path, lines.join("\n")).unwrap();
    path.to_str().unwrap().to_string()
}

// ============================================================================
// Root and length
// ============================================================================

#[test]
fn test_cli_root_known_vector() {
    let dir = tempdir().unwrap();
    let file = items_file(dir.path(), &["a", "b", "c"]);

    let (stdout, _stderr, success) = run_ygg(&["root", &file]);

    assert!(success, "root should succeed");
    assert_eq!(
        stdout.trim(),
        "36642e73c2540ab121e3a6bf9545b0a24982cd830eb13d3cd19de3ce6c021ec1"
    );
}

#[test]
fn test_cli_root_empty_file_fails() {
    let dir = tempdir().unwrap();
    let file = items_file(dir.path(), &[]);

    let (_stdout, stderr, success) = run_ygg(&["root", &file]);

    assert!(!success, "root of an empty file should fail");
    assert!(stderr.contains("empty"), "stderr should explain: {stderr}");
}

#[test]
fn test_cli_len() {
    let dir = tempdir().unwrap();
    let file = items_file(dir.path(), &["one", "two", "three", "four"]);

    let (stdout, _stderr, success) = run_ygg(&["len", &file]);

    assert!(success);
    assert_eq!(stdout.trim(), "4");
}

#[test]
fn test_cli_blake3_root_differs() {
    let dir = tempdir().unwrap();
    let file = items_file(dir.path(), &["a", "b"]);

    let (sha, _, _) = run_ygg(&["root", &file]);
    let (blake, _, success) = run_ygg(&["--algo", "blake3", "root", &file]);

    assert!(success);
    assert_ne!(sha.trim(), blake.trim());
}

// ============================================================================
// Proof and verify
// ============================================================================

#[test]
fn test_cli_proof_then_verify() {
    let dir = tempdir().unwrap();
    let file = items_file(dir.path(), &["a", "b", "c", "d", "e"]);

    let (root, _, _) = run_ygg(&["root", &file]);
    let (proof_json, _stderr, success) = run_ygg(&["proof", &file, "c"]);
    assert!(success, "proof should succeed");

    let proof_path = dir.path().join("proof.json");
    fs::write(&proof_path, &proof_json).unwrap();

    let (stdout, _stderr, success) = run_ygg(&[
        "verify",
        "c",
        "--proof",
        proof_path.to_str().unwrap(),
        "--root",
        root.trim(),
    ]);

    assert!(success, "verify should succeed");
    assert!(stdout.contains("verified"));
}

#[test]
fn test_cli_verify_wrong_item_fails() {
    let dir = tempdir().unwrap();
    let file = items_file(dir.path(), &["a", "b", "c", "d"]);

    let (root, _, _) = run_ygg(&["root", &file]);
    let (proof_json, _, _) = run_ygg(&["proof", &file, "c"]);
    let proof_path = dir.path().join("proof.json");
    fs::write(&proof_path, &proof_json).unwrap();

    let (stdout, _stderr, success) = run_ygg(&[
        "verify",
        "x",
        "--proof",
        proof_path.to_str().unwrap(),
        "--root",
        root.trim(),
    ]);

    assert!(!success, "verifying the wrong item should exit non-zero");
    assert!(stdout.contains("failed"));
}

#[test]
fn test_cli_proof_unknown_item_is_empty() {
    let dir = tempdir().unwrap();
    let file = items_file(dir.path(), &["a", "b"]);

    let (stdout, _stderr, success) = run_ygg(&["proof", &file, "zzz"]);

    assert!(success, "an unknown item still yields a (empty) proof");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["nodes"].as_array().unwrap().len(), 0);
}

// ============================================================================
// Consistency
// ============================================================================

#[test]
fn test_cli_consistency() {
    let dir = tempdir().unwrap();
    let old_file = items_file(dir.path(), &["a", "b", "c"]);
    let (old_root, _, _) = run_ygg(&["root", &old_file]);

    let new_path = dir.path().join("new.txt");
    fs::write(&new_path, "a\nb\nc\nd\ne").unwrap();

    let (stdout, _stderr, success) = run_ygg(&[
        "consistency",
        new_path.to_str().unwrap(),
        "--old-root",
        old_root.trim(),
        "--old-size",
        "3",
    ]);

    assert!(success, "a genuine prefix should be consistent");
    assert!(stdout.contains("consistent"));
}

#[test]
fn test_cli_consistency_rejects_divergent_history() {
    let dir = tempdir().unwrap();
    let old_file = items_file(dir.path(), &["a", "b", "c"]);
    let (old_root, _, _) = run_ygg(&["root", &old_file]);

    let new_path = dir.path().join("new.txt");
    fs::write(&new_path, "a\nREWRITTEN\nc\nd\ne").unwrap();

    let (stdout, _stderr, success) = run_ygg(&[
        "consistency",
        new_path.to_str().unwrap(),
        "--old-root",
        old_root.trim(),
        "--old-size",
        "3",
    ]);

    assert!(!success, "a rewritten history should exit non-zero");
    assert!(stdout.contains("inconsistent"));
}

// ============================================================================
// Render and export
// ============================================================================

#[test]
fn test_cli_render() {
    let dir = tempdir().unwrap();
    let file = items_file(dir.path(), &["a", "b", "c"]);

    let (root, _, _) = run_ygg(&["root", &file]);
    let (stdout, _stderr, success) = run_ygg(&["render", &file]);

    assert!(success);
    assert!(stdout.starts_with(root.trim()), "diagram starts at the root");
    assert!(stdout.contains("└── "));
}

#[test]
fn test_cli_export_to_file() {
    let dir = tempdir().unwrap();
    let file = items_file(dir.path(), &["a", "b", "c", "d"]);
    let out = dir.path().join("tree.json");

    let (root, _, _) = run_ygg(&["root", &file]);
    let (_stdout, _stderr, success) =
        run_ygg(&["export", &file, "--output", out.to_str().unwrap()]);

    assert!(success);
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed["name"].as_str().unwrap(), root.trim());
    assert_eq!(parsed["children"].as_array().unwrap().len(), 2);
}

//! Smoke tests for the covmap CLI
//!
//! These tests run the built binary end to end against small fixtures.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use covmap::{encode, topics_for, EventKind, EventRecord, InstrumentationInfo, Topic};
use predicates::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WALLET: &str = "contracts/Wallet.sol";

/// Get a command for the covmap binary
fn covmap() -> Command {
    let mut cmd = Command::cargo_bin("covmap").expect("covmap binary should exist");
    cmd.env_remove("COVMAP_TOPICS").env_remove("RUST_LOG");
    cmd
}

fn wallet_event(kind: EventKind, values: &[u32]) -> EventRecord {
    EventRecord::with_topic(Topic::for_event(kind, "Wallet"), encode(WALLET, values))
}

/// Write instrumentation and a JSON-lines event log, returning their paths
fn fixtures(dir: &Path, events: &[EventRecord]) -> (PathBuf, PathBuf) {
    let mut contracts = BTreeMap::new();
    contracts.insert(
        WALLET.to_string(),
        InstrumentationInfo::new("Wallet")
            .with_lines([3, 7, 9])
            .with_function("deposit", 3)
            .with_branch("if", 7)
            .with_branch("assert", 9)
            .with_statement(7),
    );
    let instrumentation = dir.join("instrumentation.json");
    fs::write(&instrumentation, serde_json::to_string_pretty(&contracts).unwrap()).unwrap();

    let log = events
        .iter()
        .map(|e| serde_json::to_string(e).unwrap())
        .collect::<Vec<_>>()
        .join("\n");
    let events_path = dir.join("events.jsonl");
    fs::write(&events_path, log).unwrap();

    (instrumentation, events_path)
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    covmap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    covmap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("topics"));
}

#[test]
fn test_no_args_shows_help() {
    covmap().assert().failure(); // Requires a subcommand
}

#[test]
fn test_build_subcommand_help() {
    covmap()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--instrumentation"))
        .stdout(predicate::str::contains("COVMAP_TOPICS"));
}

// ============================================================================
// Topics Command
// ============================================================================

#[test]
fn test_topics_raw_matches_side_channel_format() {
    let expected = topics_for("Wallet").unwrap().to_side_channel();
    covmap()
        .args(["topics", "Wallet", "--raw"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn test_topics_table() {
    let topics = topics_for("Wallet").unwrap();
    covmap()
        .args(["--color", "never", "topics", "Wallet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("assert-post"))
        .stdout(predicate::str::contains(topics.get(EventKind::Line).to_hex()));
}

#[test]
fn test_topics_json() {
    let output = covmap()
        .args(["topics", "Wallet", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["statement"],
        topics_for("Wallet").unwrap().get(EventKind::Statement).to_hex()
    );
}

#[test]
fn test_topics_empty_name_fails() {
    covmap()
        .args(["topics", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty contract name"));
}

// ============================================================================
// Build Command
// ============================================================================

#[test]
fn test_build_writes_coverage_and_topics() {
    let temp = TempDir::new().unwrap();
    let (instrumentation, events) = fixtures(
        temp.path(),
        &[
            wallet_event(EventKind::Line, &[7]),
            wallet_event(EventKind::Branch, &[1, 1]),
            wallet_event(EventKind::AssertPre, &[2]),
            wallet_event(EventKind::AssertPre, &[2]),
            wallet_event(EventKind::AssertPost, &[2]),
        ],
    );
    let topics = temp.path().join("scTopics");
    let output = temp.path().join("coverage.json");

    covmap()
        .arg("build")
        .arg("--instrumentation")
        .arg(&instrumentation)
        .arg("--events")
        .arg(&events)
        .arg("--topics")
        .arg(&topics)
        .arg("--output")
        .arg(&output)
        .args(["--color", "never"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Coverage Summary"))
        .stderr(predicate::str::contains(WALLET));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let wallet = &value[WALLET];
    assert_eq!(wallet["l"]["7"], 1);
    assert_eq!(wallet["l"]["3"], 0);
    assert_eq!(wallet["b"]["1"], serde_json::json!([0, 1]));
    assert_eq!(wallet["b"]["2"], serde_json::json!([1, 1]));
    assert_eq!(wallet["branchMap"]["2"]["type"], "assert");

    assert_eq!(
        fs::read_to_string(&topics).unwrap(),
        topics_for("Wallet").unwrap().to_side_channel()
    );
}

#[test]
fn test_build_to_stdout_with_env_topics() {
    let temp = TempDir::new().unwrap();
    let (instrumentation, events) = fixtures(temp.path(), &[wallet_event(EventKind::Function, &[1])]);
    let topics = temp.path().join("from-env");

    let output = covmap()
        .env("COVMAP_TOPICS", &topics)
        .arg("-q")
        .arg("build")
        .arg("-i")
        .arg(&instrumentation)
        .arg("-e")
        .arg(&events)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stderr.is_empty());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[WALLET]["f"]["1"], 1);
    assert!(topics.exists());
}

#[test]
fn test_build_appends_to_existing_topics() {
    let temp = TempDir::new().unwrap();
    let (instrumentation, events) = fixtures(temp.path(), &[]);
    let topics = temp.path().join("scTopics");
    fs::write(&topics, "0xexisting\n").unwrap();

    covmap()
        .arg("-q")
        .arg("build")
        .arg("-i")
        .arg(&instrumentation)
        .arg("-e")
        .arg(&events)
        .arg("-t")
        .arg(&topics)
        .assert()
        .success();

    let text = fs::read_to_string(&topics).unwrap();
    assert!(text.starts_with("0xexisting\n"));
    assert_eq!(text.lines().count(), 7);
}

#[test]
fn test_build_unregistered_path_fails() {
    let temp = TempDir::new().unwrap();
    let stray = EventRecord::with_topic(
        Topic::for_event(EventKind::Line, "Wallet"),
        encode("contracts/Other.sol", &[3]),
    );
    let (instrumentation, events) = fixtures(temp.path(), &[stray]);

    covmap()
        .arg("build")
        .arg("-i")
        .arg(&instrumentation)
        .arg("-e")
        .arg(&events)
        .arg("-t")
        .arg(temp.path().join("scTopics"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unregistered contract path contracts/Other.sol"));
}

#[test]
fn test_build_missing_instrumentation_fails() {
    let temp = TempDir::new().unwrap();
    covmap()
        .args(["build", "-i"])
        .arg(temp.path().join("nope.json"))
        .arg("-e")
        .arg(temp.path().join("events.jsonl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

//! End-to-end tests for the `shopify-data` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("shopify-data-cli-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn shopify_data(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("shopify-data").unwrap();
    cmd.current_dir(dir)
        .env_remove("SHOP")
        .env_remove("ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let dir = scratch_dir("help");
    shopify_data(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate-orders"))
        .stdout(predicate::str::contains("fetch-events"))
        .stdout(predicate::str::contains("--log-level"));
}

#[test]
fn test_setup_writes_env_file() {
    let dir = scratch_dir("setup");
    std::fs::write(dir.join(".env"), "SHOPIFY_CURRENCY=USD\nSHOP=old-store.myshopify.com\n").unwrap();

    shopify_data(&dir)
        .args(["setup", "--shop", "demo-store", "--access-token", "shpat_abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo-store.myshopify.com"));

    let contents = std::fs::read_to_string(dir.join(".env")).unwrap();
    assert!(contents.contains("SHOPIFY_CURRENCY=USD"));
    assert!(contents.contains("SHOP=demo-store.myshopify.com"));
    assert!(contents.contains("ACCESS_TOKEN=shpat_abc"));
    assert!(!contents.contains("old-store"));
}

#[test]
fn test_setup_rejects_empty_token() {
    let dir = scratch_dir("setup-invalid");
    shopify_data(&dir)
        .args(["setup", "--shop", "demo-store", "--access-token", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --access-token"));
    assert!(!dir.join(".env").exists());
}

#[test]
fn test_missing_configuration_exits_non_zero() {
    let dir = scratch_dir("unconfigured");
    shopify_data(&dir)
        .args(["generate:orders", "-n", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("shopify-data setup"));
}

#[test]
fn test_unknown_webhook_topic_is_rejected() {
    let dir = scratch_dir("webhook");
    shopify_data(&dir)
        .args([
            "create:webhook",
            "--topic",
            "orders/teleported",
            "--url",
            "https://example.com/hook",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown webhook topic"));
}

#[test]
fn test_log_file_receives_output() {
    let dir = scratch_dir("log-file");
    shopify_data(&dir)
        .args([
            "--log-file",
            "logs/app.log",
            "--log-level",
            "debug",
            "setup",
            "--shop",
            "demo-store",
            "--access-token",
            "shpat_abc",
        ])
        .assert()
        .success();

    let log = std::fs::read_to_string(dir.join("logs/app.log")).unwrap();
    assert!(log.contains("saved store credentials"));
}

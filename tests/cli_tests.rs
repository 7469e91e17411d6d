//! Binary-level tests for the `fundarb` command.

use std::io::Write;

use assert_cmd::Command;
use fundarb::testkit::config::{paper_toml_with, PAPER_TOML};
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

fn fundarb() -> Command {
    let mut cmd = Command::cargo_bin("fundarb").expect("binary built");
    cmd.env_remove("TELEGRAM_BOT_TOKEN")
        .env_remove("TELEGRAM_CHAT_ID")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn check_config_accepts_valid_file() {
    let file = write_config(PAPER_TOML);

    fundarb()
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("BTC-USD, ETH-USD"))
        .stdout(predicate::str::contains("PAPER_A_API_KEY"));
}

#[test]
fn check_config_warns_about_unpriced_markets() {
    let file = write_config(&paper_toml_with(r#""ETH-USD" = 2500"#, ""));

    fundarb()
        .args(["check", "config", "-c"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No reference price for ETH-USD"));
}

#[test]
fn invalid_config_exits_nonzero() {
    let file = write_config(&paper_toml_with(
        "position_size_usd = 20",
        "position_size_usd = 500",
    ));

    fundarb()
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("position_size_usd"));
}

#[test]
fn run_with_invalid_config_exits_before_starting() {
    let file = write_config(&paper_toml_with(
        r#"markets = ["BTC-USD", "ETH-USD"]"#,
        "markets = []",
    ));

    fundarb()
        .args(["run", "--config"])
        .arg(file.path())
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("markets"));
}

#[test]
fn run_rejects_zero_interval_override() {
    let file = write_config(PAPER_TOML);

    fundarb()
        .args(["run", "--interval-secs", "0", "--config"])
        .arg(file.path())
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval_secs"));
}

#[test]
fn missing_config_file_exits_nonzero() {
    fundarb()
        .args(["check", "config", "--config", "/nonexistent/fundarb.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn rates_prints_snapshot_table() {
    let file = write_config(PAPER_TOML);

    fundarb()
        .args(["rates", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Diff (A-B)"))
        .stdout(predicate::str::contains("open: long paper-b / short paper-a"))
        .stdout(predicate::str::contains("hold"));
}

#[test]
fn help_lists_commands() {
    fundarb()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("rates"));
}

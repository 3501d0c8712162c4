// Binary-level tests for pihole-stats

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

/// Command isolated from the user's config files and environment.
fn pihole_stats(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("pihole-stats");
    cmd.current_dir(home.path())
        .env("PIHOLE_STATS_CONFIG_DIR", home.path().join("config"))
        .env_remove("PIHOLE_URL")
        .env_remove("PIHOLE_AUTH")
        .arg("--no-color");
    cmd
}

fn mock_status<'a>(server: &'a MockServer, status: &str) -> httpmock::Mock<'a> {
    let body = json!({ "status": status });
    server.mock(|when, then| {
        when.method(GET)
            .path("/admin/api.php")
            .query_param_exists("status")
            .query_param("auth", "tok");
        then.status(200).json_body(body);
    })
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    pihole_stats(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("enable"))
        .stdout(predicate::str::contains("disable"))
        .stdout(predicate::str::contains("summary"));
}

#[test]
fn unknown_command_prints_usage_and_fails() {
    let home = TempDir::new().unwrap();
    pihole_stats(&home)
        .arg("explode")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_url_is_reported() {
    let home = TempDir::new().unwrap();
    pihole_stats(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pi-hole URL is required"))
        .stderr(predicate::str::contains("configure --set-url <url>"));
}

#[test]
fn default_command_prints_summary() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let summary = server.mock(|when, then| {
        when.method(GET)
            .path("/admin/api.php")
            .query_param_exists("summary")
            .query_param("auth", "tok");
        then.status(200).json_body(json!({
            "unique_clients": "12",
            "ads_blocked_today": "340",
            "gravity_last_updated": {
                "file_exists": true,
                "relative": {"days": "3", "hours": "4", "minutes": "10"}
            }
        }));
    });
    let status = mock_status(&server, "enabled");

    pihole_stats(&home)
        .env("PIHOLE_URL", server.url("/admin"))
        .env("PIHOLE_AUTH", "tok")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pi-hole Statistics"))
        .stdout(predicate::str::contains("Status: Enabled"))
        .stdout(predicate::str::contains(
            "Gravity last updated: 3 days, 4 hours, 10 minutes",
        ))
        .stdout(predicate::str::contains("Current unique clients: 12"))
        .stdout(predicate::str::contains("Ads blocked today: 340"));

    summary.assert();
    status.assert();
}

#[test]
fn enable_when_enabled_sends_no_action() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let status = mock_status(&server, "enabled");
    let enable = server.mock(|when, then| {
        when.method(GET)
            .path("/admin/api.php")
            .query_param_exists("enable");
        then.status(200).json_body(json!({"status": "enabled"}));
    });

    pihole_stats(&home)
        .args(["--url", &server.url("/admin"), "--token", "tok", "e"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No change needed."))
        .stdout(predicate::str::contains("Pi-hole status: Enabled"));

    enable.assert_hits(0);
    status.assert_hits(1);
}

#[test]
fn status_as_json() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_status(&server, "disabled");

    let output = pihole_stats(&home)
        .args(["--url", &server.url("/admin"), "--token", "tok"])
        .args(["status", "-o", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, json!({"status": "disabled"}));
}

#[test]
fn malformed_status_fails_without_output() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admin/api.php");
        then.status(200).body("[]");
    });

    pihole_stats(&home)
        .args(["--url", &server.url("/admin"), "--token", "tok", "disable"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("decoding status response"));
}

#[test]
fn configure_then_show_masks_token() {
    let home = TempDir::new().unwrap();
    pihole_stats(&home)
        .args([
            "configure",
            "--set-url",
            "http://pi.hole/admin",
            "--set-token",
            "secret",
            "--scope",
            "local",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(".pihole-stats.yaml"));

    pihole_stats(&home)
        .arg("config-show")
        .assert()
        .success()
        .stdout(predicate::str::contains("url: http://pi.hole/admin"))
        .stdout(predicate::str::contains("*****"))
        .stdout(predicate::str::contains("secret").not());
}

//! Integration tests for the `fmcly` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run
//! without a management center; the rule tests talk to a wiremock stand-in.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOMAIN: &str = "dom-1";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `fmcly` binary with env isolation.
///
/// Clears all `FMCLY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn fmcly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fmcly");
    cmd.env("HOME", "/tmp/fmcly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/fmcly-cli-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("FMCLY_PROFILE")
        .env_remove("FMCLY_CONTROLLER")
        .env_remove("FMCLY_USERNAME")
        .env_remove("FMCLY_PASSWORD")
        .env_remove("FMCLY_DOMAIN")
        .env_remove("FMCLY_OUTPUT")
        .env_remove("FMCLY_INSECURE")
        .env_remove("FMCLY_TIMEOUT");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn config_path(suffix: &str) -> String {
    format!("/api/fmc_config/v1/domain/{DOMAIN}/{suffix}")
}

/// A management center that accepts any login and knows a few objects.
async fn lab_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/fmc_platform/v1/auth/generatetoken"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("X-auth-access-token", "tok")
                .insert_header("DOMAIN_UUID", DOMAIN)
                .insert_header("DOMAINS", r#"[{"name":"Global","uuid":"dom-1"}]"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/fmc_platform/v1/info/serverversion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"serverVersion": "7.0.1"}],
            "paging": {"offset": 0, "limit": 25, "count": 1, "pages": 1}
        })))
        .mount(&server)
        .await;

    mount_items(
        &server,
        "policy/accesspolicies",
        json!([{"name": "Branch ACP", "id": "acp-1", "type": "AccessPolicy"}]),
    )
    .await;
    mount_items(
        &server,
        "policy/ftdnatpolicies",
        json!([{"name": "Branch NAT", "id": "nat-1", "type": "FTDNatPolicy"}]),
    )
    .await;
    mount_items(
        &server,
        "object/securityzones",
        json!([{"name": "inside", "id": "z-in", "type": "SecurityZone"}]),
    )
    .await;
    mount_items(
        &server,
        "object/networkaddresses",
        json!([{"name": "srv1", "id": "abc", "type": "Host"}]),
    )
    .await;
    server
}

async fn mount_items(server: &MockServer, suffix: &str, items: Value) {
    let count = items.as_array().map_or(0, Vec::len);
    Mock::given(method("GET"))
        .and(path(config_path(suffix)))
        .and(query_param("expanded", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": items,
            "paging": {"offset": 0, "limit": 1000, "count": count, "pages": 1}
        })))
        .mount(server)
        .await;
}

/// Run the binary against `server` off the async runtime.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let mut cmd = fmcly_cmd();
    cmd.env("FMCLY_PASSWORD", "secret")
        .args(["--controller", &server.uri(), "--username", "api"])
        .args(["--output", "json-compact"])
        .args(args);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = fmcly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    fmcly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Firepower Management Center")
            .and(predicate::str::contains("access-rule"))
            .and(predicate::str::contains("nat-rule")),
    );
}

#[test]
fn test_version_flag() {
    fmcly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fmcly"));
}

#[test]
fn test_completions_zsh() {
    fmcly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_config_path() {
    fmcly_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_access_rule_requires_policy() {
    let output = fmcly_cmd()
        .args(["access-rule", "create", "web"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--policy"));
}

#[test]
fn test_identity_conflicts_with_translation() {
    let output = fmcly_cmd()
        .args(["nat-rule", "create", "--policy", "p", "--identity", "a"])
        .args(["--translated-network", "b"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_rule_without_controller() {
    let output = fmcly_cmd()
        .args(["access-rule", "create", "web", "--policy", "Branch ACP"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("No management center configured"),
        "Expected missing-config error:\n{text}"
    );
}

#[test]
fn test_unknown_profile() {
    let output = fmcly_cmd()
        .args(["--profile", "staging", "access-rule", "create", "web"])
        .args(["--policy-id", "acp-1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("staging"));
}

// ── Against a management center ─────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_access_rule_dry_run_prints_payload() {
    let server = lab_server().await;
    Mock::given(method("POST"))
        .and(path(config_path("policy/accesspolicies/acp-1/accessrules")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        &[
            "access-rule",
            "create",
            "web",
            "--policy",
            "Branch ACP",
            "--action",
            "ALLOW",
            "--source-zone",
            "inside",
            "--destination-literal",
            "10.0.0.0/24",
            "--dry-run",
        ],
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let payload: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["name"], json!("web"));
    assert_eq!(payload["action"], json!("ALLOW"));
    assert_eq!(
        payload["sourceZones"],
        json!({"objects": [{"name": "inside", "id": "z-in", "type": "SecurityZone"}]})
    );
    assert_eq!(
        payload["destinationNetworks"]["literals"],
        json!([{"type": "Network", "value": "10.0.0.0/24"}])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_strict_refuses_partial_rules() {
    let server = lab_server().await;

    let output = run_against(
        &server,
        &[
            "access-rule",
            "create",
            "web",
            "--policy",
            "Branch ACP",
            "--source-zone",
            "nowhere",
            "--strict",
        ],
    )
    .await;
    assert_eq!(output.status.code(), Some(9));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning[reference_not_found]"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_identity_nat_is_submitted() {
    let server = lab_server().await;
    Mock::given(method("POST"))
        .and(path(config_path("policy/ftdnatpolicies/nat-1/autonatrules")))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": "an-1", "type": "FTDAutoNatRule"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        &["nat-rule", "create", "--policy", "Branch NAT", "--identity", "srv1"],
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let response: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["id"], json!("an-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_policy_is_not_found() {
    let server = lab_server().await;

    let output = run_against(
        &server,
        &["access-rule", "create", "web", "--policy", "Other ACP"],
    )
    .await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Other ACP"));
}

//! Integration tests for the `tripscan` CLI binary.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const MOCK_CONFIG: &str = r#"
[search]
mode = "mock"
timeout_secs = 5

[mock]
failure_rate = 0.0
min_latency_ms = 0
max_latency_ms = 5
seed = 7
"#;

/// Isolated home directory plus helpers for running the binary.
struct TestContext {
    temp_dir: TempDir,
    home: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let home = temp_dir.path().join(".tripscan");
        std::fs::create_dir_all(&home).expect("failed to create tripscan home");
        Self { temp_dir, home }
    }

    fn write_config(&self, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join("config.toml");
        std::fs::write(&path, content).expect("failed to write config");
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tripscan"));
        cmd.env("HOME", self.temp_dir.path())
            .env("TRIPSCAN_HOME", &self.home)
            .env_remove("TRIPSCAN_CONFIG")
            .env_remove("TRIPSCAN_MOCK")
            .env_remove("RUST_LOG")
            .env_remove("HTTP_PROXY")
            .env_remove("http_proxy")
            .env_remove("ALL_PROXY")
            .env_remove("all_proxy");
        cmd
    }

    fn run(&self, config: &Path, args: &[&str]) -> Output {
        self.cmd()
            .arg("--config")
            .arg(config)
            .args(args)
            .output()
            .expect("failed to run tripscan")
    }
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.cmd().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("search"));
}

#[test]
fn test_version_command() {
    let ctx = TestContext::new();
    let output = ctx.cmd().arg("--version").output().expect("failed to run");
    assert!(output.status.success());
}

#[test]
fn test_mock_search_json() {
    let ctx = TestContext::new();
    let config = ctx.write_config(MOCK_CONFIG);
    let json = stdout_json(&ctx.run(&config, &["search", "Goa", "--json"]));

    assert_eq!(json["destination"], "Goa");
    assert_eq!(json["mode"], "results");
    assert_eq!(json["loading"], false);
    assert!(json["error"].is_null());

    let statuses = json["statuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 6);
    assert!(statuses.iter().all(|s| s["status"] == "success"));
    assert_eq!(statuses[0]["source"], "MakeMyTrip");

    let packages = json["packages"].as_array().unwrap();
    assert!(!packages.is_empty());
    let names: Vec<&str> = statuses.iter().map(|s| s["source"].as_str().unwrap()).collect();
    let prices: Vec<f64> = packages.iter().map(|p| p["price"].as_f64().unwrap()).collect();
    assert!(packages.iter().all(|p| names.contains(&p["source"].as_str().unwrap())));
    assert!(prices.windows(2).all(|w| w[0] <= w[1]), "not sorted by price: {prices:?}");
    assert_eq!(json["summary"]["visible"], packages.len());
}

#[test]
fn test_seeded_search_is_reproducible() {
    let ctx = TestContext::new();
    let config = ctx.write_config(MOCK_CONFIG);
    let first = stdout_json(&ctx.run(&config, &["search", "Goa", "--json"]));
    let second = stdout_json(&ctx.run(&config, &["search", "Goa", "--json"]));
    assert_eq!(first["packages"], second["packages"]);
}

#[test]
fn test_rating_filter_and_sort() {
    let ctx = TestContext::new();
    let config = ctx.write_config(MOCK_CONFIG);
    let json = stdout_json(&ctx.run(
        &config,
        &["search", "Kerala", "--json", "--sort", "rating", "--min-rating", "4"],
    ));

    assert_eq!(json["sort"], "rating");
    let ratings: Vec<f64> = json["packages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["rating"].as_f64().unwrap_or(0.0))
        .collect();
    assert!(ratings.iter().all(|r| *r >= 4.0));
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_limit_caps_packages() {
    let ctx = TestContext::new();
    let config = ctx.write_config(MOCK_CONFIG);
    let json = stdout_json(&ctx.run(&config, &["search", "Goa", "--json", "--limit", "2"]));
    assert!(json["packages"].as_array().unwrap().len() <= 2);
}

#[test]
fn test_all_sources_failing() {
    let ctx = TestContext::new();
    let config = ctx.write_config(&MOCK_CONFIG.replace("failure_rate = 0.0", "failure_rate = 1.0"));
    let json = stdout_json(&ctx.run(&config, &["search", "Goa", "--json"]));

    assert_eq!(
        json["error"],
        "No packages found for this destination. Please try a different location."
    );
    assert!(json["packages"].as_array().unwrap().is_empty());
    assert!(
        json["statuses"]
            .as_array()
            .unwrap()
            .iter()
            .all(|s| s["status"] == "error")
    );
}

#[test]
fn test_blank_destination_rejected() {
    let ctx = TestContext::new();
    let config = ctx.write_config(MOCK_CONFIG);
    let output = ctx.run(&config, &["search", "   "]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please enter a destination"), "stderr: {stderr}");
}

#[test]
fn test_human_output_lists_packages() {
    let ctx = TestContext::new();
    let config = ctx.write_config(MOCK_CONFIG);
    let output = ctx.run(&config, &["search", "Manali"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found"), "stdout: {stdout}");
    assert!(stdout.contains("₹"));
    assert!(stdout.contains("Manali"));
}

#[test]
fn test_live_search_against_http_endpoint() {
    let mut server = mockito::Server::new();
    let _alpha = server
        .mock("GET", "/alpha")
        .match_query(mockito::Matcher::UrlEncoded("destination".into(), "Goa".into()))
        .with_status(200)
        .with_body(r#"[{"title": "Goa Trip", "price": 10999, "rating": 4.2}]"#)
        .create();
    let _beta = server
        .mock("GET", "/beta")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"title": "goa trip", "price": 11499}, {"title": "Goa Trip", "price": 12499}]"#)
        .create();
    let _gamma = server
        .mock("GET", "/gamma")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .create();

    let ctx = TestContext::new();
    let config = ctx.write_config(&format!(
        r#"
[live]
base_url = "{}"

[[sources]]
name = "Alpha"
path = "/alpha"

[[sources]]
name = "Beta"
path = "/beta"

[[sources]]
name = "Gamma"
path = "/gamma"
"#,
        server.url()
    ));

    let json = stdout_json(&ctx.run(&config, &["search", "Goa", "--json"]));
    let packages = json["packages"].as_array().unwrap();
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0]["source"], "Alpha");
    assert_eq!(packages[0]["price"].as_f64(), Some(10999.0));
    assert_eq!(packages[1]["price"].as_f64(), Some(12499.0));

    let statuses: Vec<&str> = json["statuses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, ["success", "success", "error"]);
}

#[test]
fn test_suggest_command() {
    let ctx = TestContext::new();
    let output = ctx.cmd().args(["suggest", "goa"]).output().expect("failed to run");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Goa"));
}

#[test]
fn test_sources_command() {
    let ctx = TestContext::new();
    let output = ctx.cmd().arg("sources").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Booking.com"));
    assert!(stdout.contains("/api/amadeus/packages"));
}

#[test]
fn test_config_init_writes_once() {
    let ctx = TestContext::new();
    let first = ctx.cmd().args(["config", "--init"]).output().expect("failed to run");
    assert!(first.status.success());
    assert!(ctx.home.join("config.toml").exists());

    let second = ctx.cmd().args(["config", "--init"]).output().expect("failed to run");
    assert!(!second.status.success());

    let shown = ctx.cmd().arg("config").output().expect("failed to run");
    assert!(String::from_utf8_lossy(&shown.stdout).contains("timeout_secs = 15"));
}

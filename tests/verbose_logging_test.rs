//! Integration tests for verbose and quiet logging modes
//!
//! Logs go to stderr at a level chosen by `-v`/`-q`; stdout only ever
//! carries results.

mod common;

use common::{fresh_fixture_snapshot, TestProject, UNREACHABLE_REGISTRY};
use std::process::Output;

fn run_search(project: &TestProject, flags: &[&str]) -> Output {
    project.write_json("cache.json", &fresh_fixture_snapshot());
    let cache_path = project.file("cache.json");
    let mut args = vec![
        "--cache-path",
        cache_path.to_str().unwrap(),
        "--no-local",
        "--registry",
        UNREACHABLE_REGISTRY,
    ];
    args.extend_from_slice(flags);
    args.extend_from_slice(&["search", "ModuleC", "-f", "name"]);
    project.run(&args)
}

#[test]
fn test_default_run_has_no_debug_logs() {
    let project = TestProject::new();
    let output = run_search(&project, &[]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Checking for caches"));
}

#[test]
fn test_double_verbose_shows_pipeline_steps() {
    let project = TestProject::new();
    let output = run_search(&project, &["-vv"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Checking for caches"));
    assert!(stderr.contains("Local cache exists"));
}

#[test]
fn test_verbose_json_keeps_stdout_parseable() {
    let project = TestProject::new();
    let output = run_search(&project, &["-vv", "--json"]);

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout must be pure JSON");
    assert!(parsed.get("ModuleC").is_some());
}

#[test]
fn test_quiet_prints_results_only() {
    let project = TestProject::new();
    let output = run_search(&project, &["-q"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "ModuleC - This description doesn't say much.");
}

//! CLI contract tests for `depscope check`
//!
//! Each test builds a throwaway project: a resolved graph exported by the
//! build plus a local descriptor repository.

use std::path::Path;
use std::process::Command;

fn depscope_bin() -> String {
    env!("CARGO_BIN_EXE_depscope").to_string()
}

const GRAPH: &str = r#"{
  "root": { "groupId": "com.acme", "artifactId": "app", "version": "1.0" },
  "dependencies": [
    {
      "artifact": { "groupId": "org.lib", "artifactId": "core", "version": "2.1" },
      "scope": "compile"
    },
    {
      "artifact": { "groupId": "org.test", "artifactId": "junit", "version": "4.13" },
      "scope": "test"
    },
    {
      "artifact": { "groupId": "org.util", "artifactId": "helper", "version": "1.0" },
      "scope": "test"
    }
  ]
}"#;

const CLEAN_GRAPH: &str = r#"{
  "root": { "groupId": "com.acme", "artifactId": "app", "version": "1.0" },
  "dependencies": [
    {
      "artifact": { "groupId": "org.lib", "artifactId": "core", "version": "2.1" },
      "scope": "compile"
    },
    {
      "artifact": { "groupId": "org.util", "artifactId": "helper", "version": "1.0" },
      "scope": "runtime"
    }
  ]
}"#;

fn write_descriptor(repo: &Path, group: &str, artifact: &str, version: &str, content: &str) {
    let dir = repo
        .join(group.replace('.', "/"))
        .join(artifact)
        .join(version);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join(format!("{}-{}.deps.json", artifact, version)),
        content,
    )
    .unwrap();
}

/// Project whose compile dependency `core` needs `helper` at runtime while the
/// build demoted `helper` to test scope. `junit` has no descriptor at all.
fn setup_project(graph: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("resolved-graph.json"), graph).unwrap();

    let repo = dir.path().join("repo");
    write_descriptor(
        &repo,
        "org.lib",
        "core",
        "2.1",
        r#"{"dependencies": [
            {"groupId": "org.util", "artifactId": "helper", "version": "1.0", "scope": "runtime"},
            {"groupId": "org.test", "artifactId": "junit", "version": "4.13", "scope": "test"}
        ]}"#,
    );
    write_descriptor(&repo, "org.util", "helper", "1.0", r#"{"dependencies": []}"#);
    dir
}

fn run_check(dir: &Path, extra_args: &[&str]) -> (i32, String, String) {
    let mut cmd = Command::new(depscope_bin());
    cmd.arg("check")
        .arg(dir)
        .arg("--repository")
        .arg(dir.join("repo"))
        .env_remove("RUST_LOG");
    for arg in extra_args {
        cmd.arg(arg);
    }
    let output = cmd.output().expect("Failed to run depscope");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (code, stdout, stderr)
}

#[test]
fn test_violation_warns_by_default() {
    let dir = setup_project(GRAPH);
    let (code, stdout, _) = run_check(dir.path(), &[]);
    assert_eq!(code, 0, "violations only warn without --fail-on-violation");
    assert!(stdout.contains("1 dependency scope violation in com.acme:app:jar:1.0"));
    assert!(stdout.contains("org.util:helper:jar"));
    assert!(stdout.contains("org.lib:core:jar:2.1 (runtime)"));
}

#[test]
fn test_fail_on_violation_exits_one() {
    let dir = setup_project(GRAPH);
    let (code, _, stderr) = run_check(dir.path(), &["--fail-on-violation"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failing due to 1 dependency scope violation"));
}

#[test]
fn test_json_output() {
    let dir = setup_project(GRAPH);
    let (code, stdout, _) = run_check(dir.path(), &["--format", "json", "--no-parallel"]);
    assert_eq!(code, 0);

    let report: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(report["violation_count"], 1);
    assert_eq!(report["root"], "com.acme:app:jar:1.0");
    assert!(report["generated_at"].is_string());

    let groups = report["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["target"], "org.util:helper:jar");
    assert_eq!(groups[0]["actual_scope"], "test");
    let entry = &groups[0]["entries"][0];
    assert_eq!(entry["declared_scope"], "runtime");
    assert_eq!(
        entry["path"],
        serde_json::json!([
            "com.acme:app:jar:1.0",
            "org.lib:core:jar:2.1:compile",
            "org.util:helper:jar:1.0:runtime"
        ])
    );
}

#[test]
fn test_clean_project_succeeds() {
    let dir = setup_project(CLEAN_GRAPH);
    let (code, stdout, _) = run_check(dir.path(), &["--fail-on-violation"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No dependency scope violations"));
}

#[test]
fn test_skip_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    // No graph file: anything other than skipping would fail.
    let (code, stdout, _) = run_check(dir.path(), &["--skip", "--fail-on-violation"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
}

#[test]
fn test_missing_descriptor_fails() {
    let dir = setup_project(GRAPH);
    std::fs::remove_file(
        dir.path()
            .join("repo/org/util/helper/1.0/helper-1.0.deps.json"),
    )
    .unwrap();

    let (code, stdout, stderr) = run_check(dir.path(), &[]);
    assert_eq!(code, 1, "resolution failures always fail the check");
    assert!(stdout.is_empty(), "no partial report on failure");
    assert!(stderr.contains("Dependency scope check failed"));
    assert!(stderr.contains("org.util:helper:jar:1.0"));
}

#[test]
fn test_missing_graph_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_check(dir.path(), &[]);
    assert_eq!(code, 1);
}

#[test]
fn test_verbose_prints_path() {
    let dir = setup_project(GRAPH);
    let (code, stdout, _) = run_check(dir.path(), &["--verbose"]);
    assert_eq!(code, 0);
    assert!(stdout.contains(
        "com.acme:app:jar:1.0 -> org.lib:core:jar:2.1:compile -> org.util:helper:jar:1.0:runtime"
    ));
}

#[test]
fn test_doc_url_printed() {
    let dir = setup_project(GRAPH);
    let (_, stdout, _) = run_check(dir.path(), &["--doc-url", "https://wiki.example.org/scopes"]);
    assert!(stdout.contains("See https://wiki.example.org/scopes for details."));
}

#[test]
fn test_output_file() {
    let dir = setup_project(GRAPH);
    let out = dir.path().join("scope.json");
    let (code, stdout, _) = run_check(
        dir.path(),
        &["--format", "json", "--output", out.to_str().unwrap()],
    );
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["violation_count"], 1);
}

#[test]
fn test_config_file_honored() {
    let dir = setup_project(GRAPH);
    std::fs::write(
        dir.path().join("depscope.toml"),
        "[check]\nfail_on_violation = true\nparallel = false\n",
    )
    .unwrap();

    let (code, _, _) = run_check(dir.path(), &[]);
    assert_eq!(code, 1, "fail_on_violation from depscope.toml");
}

#[test]
fn test_config_skip_honored() {
    let dir = setup_project(GRAPH);
    std::fs::write(dir.path().join("depscope.toml"), "[check]\nskip = true\n").unwrap();

    let (code, stdout, _) = run_check(dir.path(), &["--fail-on-violation"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
}

#[test]
fn test_init_writes_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(depscope_bin())
        .arg("init")
        .arg(dir.path())
        .output()
        .expect("Failed to run depscope");
    assert!(output.status.success());

    let written = std::fs::read_to_string(dir.path().join("depscope.toml")).unwrap();
    assert!(written.contains("[check]"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn skill_audit() -> Command {
    let mut cmd = Command::cargo_bin("skill-audit").expect("binary");
    cmd.env_remove("SKILL_AUDIT_CONFIG");
    cmd
}

fn write_skill(root: &Path, name: &str, body: &str) {
    let dir = root.join("skills").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("SKILL.md"),
        format!("---\nname: {name}\ndescription: {name} helper\n---\n{body}"),
    )
    .unwrap();
}

fn setup_corpus() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write_skill(root, "git-pr-creator", "## What I do\nDelegate to a subagent.\n");
    write_skill(root, "python-ruff-linter", "## What I do\nLint.\n");
    write_skill(root, "jira-status-updater", "## What I do\nUpdate Atlassian tickets.\n");
    temp
}

#[test]
fn suitability_json_reports_the_compatibility_matrix() {
    let temp = setup_corpus();
    let output = skill_audit()
        .current_dir(temp.path())
        .args(["suitability", "--json"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["documents"], 3);
    assert_eq!(body["matrix"]["git-pr-creator"]["primary"], true);
    assert_eq!(body["matrix"]["git-pr-creator"]["linting-subagent"], false);
    assert_eq!(body["matrix"]["jira-status-updater"]["git-workflow-subagent"], true);
    assert_eq!(body["matrix"]["jira-status-updater"]["testing-subagent"], false);
    assert_eq!(body["matrix"]["python-ruff-linter"]["testing-subagent"], true);
}

#[test]
fn duplicity_markdown_goes_to_stdout() {
    let temp = setup_corpus();
    skill_audit()
        .current_dir(temp.path())
        .arg("duplicity")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Skill duplicity report"))
        .stdout(predicate::str::contains("- Skills: `3`"));
}

#[test]
fn tokens_report_is_written_to_output_file() {
    let temp = setup_corpus();
    let out = temp.path().join("tokens.json");
    skill_audit()
        .current_dir(temp.path())
        .args(["tokens", "--json", "--output"])
        .arg(&out)
        .assert()
        .success();

    let body: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let records = body["records"].as_array().unwrap();
    let names: Vec<_> = records.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["git-pr-creator", "jira-status-updater", "python-ruff-linter"]
    );
    assert_eq!(body["summary"]["bands"]["normal"], 3);
}

#[test]
fn custom_skills_dir_and_all_report() {
    let temp = setup_corpus();
    let output = skill_audit()
        .args(["all", "--json", "--skills-dir"])
        .arg(temp.path().join("skills"))
        .output()
        .expect("command run");
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["categories"]["python-ruff-linter"], "language-specific");
    assert_eq!(body["duplicity"]["matrix"]["git-pr-creator"]["git-pr-creator"], 100);
}

#[test]
fn empty_corpus_fails_with_a_clear_message() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("skills")).unwrap();
    skill_audit()
        .current_dir(temp.path())
        .arg("all")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No skill documents found"));
}

#[test]
fn missing_skills_dir_fails() {
    let temp = tempdir().unwrap();
    skill_audit()
        .current_dir(temp.path())
        .args(["tokens", "--skills-dir", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load skills"));
}

#[test]
fn config_file_overrides_profiles() {
    let temp = setup_corpus();
    let config = temp.path().join("audit.toml");
    fs::write(
        &config,
        r#"
[[profiles]]
name = "reviewer"
access = "restricted"
tools = ["read"]
"#,
    )
    .unwrap();

    let output = skill_audit()
        .current_dir(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["suitability", "--json"])
        .output()
        .expect("command run");
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let profiles = body["profiles"].as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["name"], "reviewer");
    assert_eq!(profiles[0]["compatible"], 1);
}

#[test]
fn invalid_config_is_rejected() {
    let temp = setup_corpus();
    let config = temp.path().join("audit.toml");
    fs::write(&config, "[cost]\nchars_per_unit = 0.0\n").unwrap();
    skill_audit()
        .current_dir(temp.path())
        .env("SKILL_AUDIT_CONFIG", &config)
        .arg("tokens")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

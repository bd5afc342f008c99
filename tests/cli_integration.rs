//! Integration tests for the `gd` CLI.
//!
//! Each test points `gd` at a temp data directory (and an isolated
//! XDG_CONFIG_HOME so no real config leaks in), runs it as a subprocess,
//! and verifies stdout and exit status.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the built `gd` binary.
fn gd_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("gd");
    path
}

struct TestEnv {
    _root: TempDir,
    data_dir: PathBuf,
    config_home: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let data_dir = root.path().join("data");
        let config_home = root.path().join("config");
        std::fs::create_dir_all(&config_home).unwrap();
        TestEnv {
            data_dir,
            config_home,
            _root: root,
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(gd_bin())
            .args(["--data-dir", self.data_dir.to_str().unwrap()])
            .args(args)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .output()
            .unwrap()
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "gd {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    /// Create a project via --json and return its id
    fn create_project(&self, name: &str) -> i64 {
        let stdout = self.run_ok(&["--json", "project", "new", name]);
        let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        value["id"].as_i64().unwrap()
    }

    /// Last task id in the current view's --json listing
    fn task_id(&self, text: &str) -> i64 {
        let stdout = self.run_ok(&["--json", "list"]);
        let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        value["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["text"] == text)
            .unwrap_or_else(|| panic!("task '{}' not in listing", text))["id"]
            .as_i64()
            .unwrap()
    }
}

#[test]
fn add_files_to_inbox_by_default() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Buy milk"]);
    let listing = env.run_ok(&["list"]);
    assert!(listing.contains("Inbox:"));
    assert!(listing.contains("[ ] Buy milk"));
}

#[test]
fn empty_text_is_silently_rejected() {
    let env = TestEnv::new();
    let output = env.run(&["add", "   "]);
    assert!(output.status.success());
    let listing = env.run_ok(&["list"]);
    assert!(listing.contains("(no tasks)"));
}

#[test]
fn groceries_end_to_end() {
    let env = TestEnv::new();
    let groceries = env.create_project("Groceries");

    // Add while the project view is active: task belongs to Groceries
    env.run_ok(&["view", "project", &groceries.to_string()]);
    env.run_ok(&["add", "Buy milk"]);

    // Not in the inbox
    env.run_ok(&["view", "inbox"]);
    let inbox = env.run_ok(&["list"]);
    assert!(!inbox.contains("Buy milk"));

    // But in the project view, titled by project name
    env.run_ok(&["view", "project", &groceries.to_string()]);
    let project_view = env.run_ok(&["list"]);
    assert!(project_view.contains("Groceries:"));
    assert!(project_view.contains("[ ] Buy milk"));

    // Deleting the project moves the task to the inbox
    env.run_ok(&["project", "rm", &groceries.to_string()]);
    let inbox = env.run_ok(&["list"]);
    assert!(inbox.contains("Inbox:"));
    assert!(inbox.contains("[ ] Buy milk"));
    let projects = env.run_ok(&["projects"]);
    assert!(projects.contains("(no projects)"));
}

#[test]
fn toggle_moves_between_views() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Call dentist"]);
    let id = env.task_id("Call dentist");

    env.run_ok(&["toggle", &id.to_string()]);
    let inbox = env.run_ok(&["list"]);
    assert!(!inbox.contains("Call dentist"));

    env.run_ok(&["view", "completed"]);
    let completed = env.run_ok(&["list"]);
    assert!(completed.contains("[x] Call dentist"));

    // Toggling back restores it to the inbox
    env.run_ok(&["toggle", &id.to_string()]);
    env.run_ok(&["view", "inbox"]);
    let inbox = env.run_ok(&["list"]);
    assert!(inbox.contains("[ ] Call dentist"));
}

#[test]
fn done_is_idempotent() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Pay rent"]);
    let id = env.task_id("Pay rent");
    env.run_ok(&["done", &id.to_string()]);
    let again = env.run_ok(&["done", &id.to_string()]);
    assert!(again.contains("already done"));

    env.run_ok(&["view", "completed"]);
    let completed = env.run_ok(&["list"]);
    assert!(completed.contains("[x] Pay rent"));
}

#[test]
fn search_is_case_insensitive() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Buy milk"]);
    env.run_ok(&["add", "Water plants"]);

    let upper = env.run_ok(&["list", "--search", "Buy"]);
    let lower = env.run_ok(&["list", "--search", "buy"]);
    assert_eq!(upper, lower);
    assert!(upper.contains("Buy milk"));
    assert!(!upper.contains("Water plants"));
}

#[test]
fn today_view_shows_all_open_tasks() {
    let env = TestEnv::new();
    let chores = env.create_project("Chores");
    env.run_ok(&["add", "Inbox task"]);
    env.run_ok(&["view", "project", &chores.to_string()]);
    env.run_ok(&["add", "Project task"]);

    env.run_ok(&["view", "today"]);
    let today = env.run_ok(&["list"]);
    assert!(today.contains("Inbox task"));
    assert!(today.contains("Project task"));
}

#[test]
fn rm_missing_task_fails() {
    let env = TestEnv::new();
    let output = env.run(&["rm", "12345"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("task not found"));
}

#[test]
fn project_view_requires_an_id() {
    let env = TestEnv::new();
    let output = env.run(&["view", "project"]);
    assert!(!output.status.success());
}

#[test]
fn data_survives_separate_invocations() {
    let env = TestEnv::new();
    env.run_ok(&["add", "persisted"]);
    // Data lives under the data dir as one blob per logical key
    assert!(env.data_dir.join("things-tasks").exists());
    let listing = env.run_ok(&["list"]);
    assert!(listing.contains("persisted"));
}

#[test]
fn json_listing_uses_camel_case_fields() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Buy milk"]);
    let stdout = env.run_ok(&["--json", "list"]);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["view"], "inbox");
    let task = &value["tasks"][0];
    assert_eq!(task["text"], "Buy milk");
    assert_eq!(task["completed"], false);
    assert!(task.get("createdAt").is_some());
    assert!(task.get("projectId").is_some());
}

#[test]
fn watch_without_reminders_exits_immediately() {
    let env = TestEnv::new();
    env.run_ok(&["add", "no reminder here"]);
    let stdout = env.run_ok(&["watch"]);
    assert!(stdout.contains("no reminders to watch"));
}

#[test]
fn add_remind_without_due_fails() {
    let env = TestEnv::new();
    let output = env.run(&["add", "call", "--remind", "10"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--remind needs --due"));
}

#[test]
fn add_with_due_and_reminder_round_trips() {
    let env = TestEnv::new();
    env.run_ok(&[
        "add",
        "Board flight",
        "--due",
        "2099-09-01T09:00:00Z",
        "--remind",
        "30",
    ]);
    let stdout = env.run_ok(&["--json", "list"]);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let task = &value["tasks"][0];
    assert_eq!(task["reminderMinutes"], 30);
    assert_eq!(task["dueDate"], "2099-09-01T09:00:00Z");
}

#[test]
fn bridge_dir_is_preferred_when_configured() {
    let env = TestEnv::new();
    let bridge_dir = env._root.path().join("bridge");
    std::fs::create_dir_all(&bridge_dir).unwrap();
    std::fs::create_dir_all(env.config_home.join("getdone")).unwrap();
    std::fs::write(
        env.config_home.join("getdone").join("config.toml"),
        format!("[storage]\nbridge_dir = {:?}\n", bridge_dir),
    )
    .unwrap();

    env.run_ok(&["add", "via bridge"]);
    // The blob landed in the bridge tier, not the local data dir
    assert!(bridge_dir.join("things-tasks").exists());
    assert!(!env.data_dir.join("things-tasks").exists());
    let listing = env.run_ok(&["list"]);
    assert!(listing.contains("via bridge"));
}

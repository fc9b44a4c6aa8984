//! Integration tests for the `th` CLI.
//!
//! Each test points TASKHIVE_DIR at a fresh temp directory, runs `th` as a
//! subprocess, and verifies stdout and/or the state file on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Get the path to the built `th` binary.
fn th_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("th");
    path
}

/// Run `th` against the given data dir, returning (stdout, stderr, success).
fn run_th(data_dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(th_bin())
        .args(args)
        .env("TASKHIVE_DIR", data_dir)
        .output()
        .expect("failed to run th");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `th` expecting success, return stdout.
fn run_th_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_th(data_dir, args);
    if !success {
        panic!(
            "th {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `th` expecting failure, return stderr.
fn run_th_err(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_th(data_dir, args);
    if success {
        panic!("th {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

// ---------------------------------------------------------------------------
// Init and config
// ---------------------------------------------------------------------------

#[test]
fn test_init_writes_config_and_state() {
    let tmp = TempDir::new().unwrap();
    let stdout = run_th_ok(tmp.path(), &["init"]);
    assert!(stdout.contains("Initialized taskhive"));
    assert!(stdout.contains("backend: local"));
    assert!(tmp.path().join("config.toml").exists());
    assert!(tmp.path().join("state.json").exists());

    // Re-init without --force refuses
    let stderr = run_th_err(tmp.path(), &["init"]);
    assert!(stderr.contains("already initialized"));
    run_th_ok(tmp.path(), &["init", "--force"]);
}

#[test]
fn test_config_backend_switch() {
    let tmp = TempDir::new().unwrap();
    run_th_ok(tmp.path(), &["init"]);
    run_th_ok(tmp.path(), &["config", "backend", "remote"]);
    run_th_ok(tmp.path(), &["config", "url", "http://hive.example:5000"]);

    let stdout = run_th_ok(tmp.path(), &["config"]);
    assert!(stdout.contains("backend:  remote"));
    assert!(stdout.contains("http://hive.example:5000"));

    // The template comments survive toml_edit
    let raw = fs::read_to_string(tmp.path().join("config.toml")).unwrap();
    assert!(raw.contains("# TaskHive configuration"));

    let stderr = run_th_err(tmp.path(), &["config", "backend", "nope"]);
    assert!(stderr.contains("unknown backend"));
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[test]
fn test_add_and_list() {
    let tmp = TempDir::new().unwrap();
    let stdout = run_th_ok(tmp.path(), &["add", "Buy honey", "--desc", "the good kind"]);
    assert!(stdout.contains("added t1 to main"));

    let stdout = run_th_ok(tmp.path(), &["list"]);
    assert!(stdout.contains("== Main (main) =="));
    assert!(stdout.contains("[ ] t1 Buy honey"));
    assert!(stdout.contains("the good kind"));
    assert!(stdout.contains("1 task, 0% complete"));
}

#[test]
fn test_add_rejects_empty_text() {
    let tmp = TempDir::new().unwrap();
    let stderr = run_th_err(tmp.path(), &["add", "   "]);
    assert!(stderr.contains("task text cannot be empty"));
}

#[test]
fn test_done_and_undo_recompute_progress() {
    let tmp = TempDir::new().unwrap();
    run_th_ok(tmp.path(), &["add", "first"]);
    run_th_ok(tmp.path(), &["add", "second"]);

    let stdout = run_th_ok(tmp.path(), &["done", "t1"]);
    assert!(stdout.contains("completed t1 (50% of main done)"));

    let stdout = run_th_ok(tmp.path(), &["list"]);
    assert!(stdout.contains("[x] t1 first"));
    assert!(stdout.contains("[ ] t2 second"));

    let stdout = run_th_ok(tmp.path(), &["undo", "t1"]);
    assert!(stdout.contains("reopened t1 (0% of main done)"));
}

#[test]
fn test_done_unknown_task_fails() {
    let tmp = TempDir::new().unwrap();
    let stderr = run_th_err(tmp.path(), &["done", "t9"]);
    assert!(stderr.contains("task not found"));
}

#[test]
fn test_rm_removes_the_task() {
    let tmp = TempDir::new().unwrap();
    run_th_ok(tmp.path(), &["add", "doomed"]);
    run_th_ok(tmp.path(), &["add", "keeper"]);

    let stdout = run_th_ok(tmp.path(), &["rm", "t1", "--yes"]);
    assert!(stdout.contains("removed t1 from main"));

    let stdout = run_th_ok(tmp.path(), &["list"]);
    assert!(!stdout.contains("doomed"));
    assert!(stdout.contains("keeper"));
}

#[test]
fn test_progress_command() {
    let tmp = TempDir::new().unwrap();
    run_th_ok(tmp.path(), &["add", "a"]);
    run_th_ok(tmp.path(), &["add", "b"]);
    run_th_ok(tmp.path(), &["add", "c"]);
    run_th_ok(tmp.path(), &["done", "t1"]);

    let stdout = run_th_ok(tmp.path(), &["progress"]);
    assert!(stdout.contains("main: 1 done of 3 tasks, 33%"));
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[test]
fn test_tab_lifecycle() {
    let tmp = TempDir::new().unwrap();
    let stdout = run_th_ok(tmp.path(), &["tab", "new", "Work Stuff"]);
    assert!(stdout.contains("created tab Work Stuff (work-stuff)"));

    let stdout = run_th_ok(tmp.path(), &["tab", "use", "work-stuff"]);
    assert!(stdout.contains("switched to work-stuff"));

    // Tasks land in the now-active tab
    run_th_ok(tmp.path(), &["add", "report"]);
    let stdout = run_th_ok(tmp.path(), &["tabs"]);
    assert!(stdout.contains("  Main (main)  0 tasks, 0%"));
    assert!(stdout.contains("* Work Stuff (work-stuff)  1 task, 0%"));

    let stdout = run_th_ok(tmp.path(), &["tab", "delete", "work-stuff", "--yes"]);
    assert!(stdout.contains("deleted tab work-stuff"));

    let stdout = run_th_ok(tmp.path(), &["tabs"]);
    assert!(!stdout.contains("work-stuff"));
    assert!(stdout.contains("* Main (main)"));
}

#[test]
fn test_tab_new_via_flag_targets_other_tab() {
    let tmp = TempDir::new().unwrap();
    run_th_ok(tmp.path(), &["tab", "new", "Errands"]);
    run_th_ok(tmp.path(), &["add", "mail the letter", "--tab", "errands"]);

    let stdout = run_th_ok(tmp.path(), &["list", "errands"]);
    assert!(stdout.contains("mail the letter"));

    // Active tab never changed
    let stdout = run_th_ok(tmp.path(), &["tabs"]);
    assert!(stdout.contains("* Main (main)"));
}

#[test]
fn test_tab_new_use_activates() {
    let tmp = TempDir::new().unwrap();
    let stdout = run_th_ok(tmp.path(), &["tab", "new", "Focus", "--use"]);
    assert!(stdout.contains("switched to focus"));
    let stdout = run_th_ok(tmp.path(), &["tabs"]);
    assert!(stdout.contains("* Focus (focus)"));
}

#[test]
fn test_main_tab_cannot_be_deleted() {
    let tmp = TempDir::new().unwrap();
    run_th_ok(tmp.path(), &["tab", "new", "Work"]);
    let stderr = run_th_err(tmp.path(), &["tab", "delete", "main", "--yes"]);
    assert!(stderr.contains("main tab cannot be deleted"));
}

#[test]
fn test_duplicate_tab_rejected() {
    let tmp = TempDir::new().unwrap();
    run_th_ok(tmp.path(), &["tab", "new", "Work"]);
    let stderr = run_th_err(tmp.path(), &["tab", "new", "  work "]);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_tab_use_unknown_fails() {
    let tmp = TempDir::new().unwrap();
    let stderr = run_th_err(tmp.path(), &["tab", "use", "ghost"]);
    assert!(stderr.contains("tab not found"));
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[test]
fn test_import_file() {
    let tmp = TempDir::new().unwrap();
    let import_path = tmp.path().join("tasks.txt");
    fs::write(&import_path, "A|desc1\n\nB\n").unwrap();

    let stdout = run_th_ok(tmp.path(), &["import", import_path.to_str().unwrap()]);
    assert!(stdout.contains("imported 2 of 2 tasks into main"));

    let stdout = run_th_ok(tmp.path(), &["list"]);
    assert!(stdout.contains("[ ] t1 A"));
    assert!(stdout.contains("desc1"));
    assert!(stdout.contains("[ ] t2 B"));
}

#[test]
fn test_import_completed_counts_toward_progress() {
    let tmp = TempDir::new().unwrap();
    let import_path = tmp.path().join("done.txt");
    fs::write(&import_path, "archived one\narchived two\n").unwrap();

    run_th_ok(
        tmp.path(),
        &["import", import_path.to_str().unwrap(), "--completed"],
    );
    let stdout = run_th_ok(tmp.path(), &["progress"]);
    assert!(stdout.contains("main: 2 done of 2 tasks, 100%"));
}

#[test]
fn test_import_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    let stderr = run_th_err(tmp.path(), &["import", "/no/such/file.txt"]);
    assert!(stderr.contains("could not read"));
}

#[test]
fn test_import_empty_file_fails() {
    let tmp = TempDir::new().unwrap();
    let import_path = tmp.path().join("empty.txt");
    fs::write(&import_path, "\n  \n").unwrap();
    let stderr = run_th_err(tmp.path(), &["import", import_path.to_str().unwrap()]);
    assert!(stderr.contains("no tasks found"));
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[test]
fn test_json_list_and_tabs() {
    let tmp = TempDir::new().unwrap();
    run_th_ok(tmp.path(), &["add", "Buy honey", "--desc", "raw"]);
    run_th_ok(tmp.path(), &["done", "t1"]);

    let stdout = run_th_ok(tmp.path(), &["list", "--json"]);
    let listing: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(listing["tab"], "main");
    assert_eq!(listing["tasks"][0]["id"], "t1");
    assert_eq!(listing["tasks"][0]["text"], "Buy honey");
    assert_eq!(listing["tasks"][0]["description"], "raw");
    assert_eq!(listing["tasks"][0]["completed"], true);

    let stdout = run_th_ok(tmp.path(), &["tabs", "--json"]);
    let tabs: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tabs[0]["id"], "main");
    assert_eq!(tabs[0]["tasks"], 1);
    assert_eq!(tabs[0]["progress"], 100);
    assert_eq!(tabs[0]["active"], true);
}

// ---------------------------------------------------------------------------
// Persistence across invocations
// ---------------------------------------------------------------------------

#[test]
fn test_state_survives_separate_runs() {
    let tmp = TempDir::new().unwrap();
    run_th_ok(tmp.path(), &["tab", "new", "Work", "--use"]);
    run_th_ok(tmp.path(), &["add", "first"]);
    run_th_ok(tmp.path(), &["done", "t1"]);

    // A brand-new invocation sees the same world
    let stdout = run_th_ok(tmp.path(), &["tabs"]);
    assert!(stdout.contains("* Work (work)  1 task, 100%"));

    // And the state file is plain JSON with the documented field names
    let raw = fs::read_to_string(tmp.path().join("state.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["activeTab"], "work");
    assert_eq!(value["tasks"]["work"][0]["completed"], true);
}

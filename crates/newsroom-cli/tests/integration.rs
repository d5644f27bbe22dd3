#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn newsroom(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("newsroom").unwrap();
    cmd.current_dir(dir.path())
        .env("NEWSROOM_ROOT", dir.path())
        .env_remove("NEWSROOM_ACTOR")
        .env_remove("NEWSROOM_ROLE");
    cmd
}

fn as_actor(dir: &TempDir, actor: &str, role: &str) -> Command {
    let mut cmd = newsroom(dir);
    cmd.args(["--actor", actor, "--role", role]);
    cmd
}

fn init_newsroom(dir: &TempDir) {
    newsroom(dir)
        .args(["init", "--name", "The Gazette"])
        .assert()
        .success();
}

fn create(dir: &TempDir, id: &str) {
    as_actor(dir, "u-ana", "staff")
        .args(["article", "create", "--id", id, "--title", &format!("Story {id}")])
        .assert()
        .success();
}

fn submit(dir: &TempDir, id: &str) {
    create(dir, id);
    as_actor(dir, "u-ana", "staff")
        .args(["review", id, "submit", "--yes"])
        .assert()
        .success();
}

fn article_json(dir: &TempDir, id: &str) -> serde_json::Value {
    let out = newsroom(dir)
        .args(["--json", "article", "show", id])
        .output()
        .unwrap();
    assert!(out.status.success());
    serde_json::from_slice(&out.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// init / config
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    assert!(dir.path().join(".newsroom/articles").is_dir());
    assert!(dir.path().join(".newsroom/config.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    newsroom(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:"));
}

#[test]
fn config_show_and_validate() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    newsroom(&dir)
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The Gazette"));
    newsroom(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No warnings"));
}

#[test]
fn commands_fail_before_init() {
    let dir = TempDir::new().unwrap();
    newsroom(&dir)
        .args(["article", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// articles
// ---------------------------------------------------------------------------

#[test]
fn create_requires_actor() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    newsroom(&dir)
        .args(["article", "create", "--title", "Orphan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--actor"));
}

#[test]
fn create_list_show() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    create(&dir, "council-budget");
    newsroom(&dir)
        .args(["article", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("council-budget"))
        .stdout(predicate::str::contains("draft"));
    let json = article_json(&dir, "council-budget");
    assert_eq!(json["author_id"], "u-ana");
}

#[test]
fn actions_for_author_of_draft() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    create(&dir, "council-budget");
    as_actor(&dir, "u-ana", "staff")
        .args(["article", "actions", "council-budget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("submit"));
}

// ---------------------------------------------------------------------------
// review
// ---------------------------------------------------------------------------

#[test]
fn full_review_path() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    submit(&dir, "transit");

    as_actor(&dir, "u-sam", "section-head")
        .args(["review", "transit", "approve-to-eic", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("approved"));

    newsroom(&dir)
        .args(["--json", "queue", "eic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"transit\""));

    as_actor(&dir, "u-eve", "editor-in-chief")
        .args(["review", "transit", "publish", "--yes"])
        .assert()
        .success();

    let json = article_json(&dir, "transit");
    assert_eq!(json["status"], "published");
    assert_eq!(json["reviewer_id"], "u-sam");
    assert_eq!(json["history"].as_array().unwrap().len(), 3);
}

#[test]
fn short_feedback_rejected() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    submit(&dir, "transit");

    as_actor(&dir, "u-sam", "section-head")
        .args(["review", "transit", "request-revision", "--feedback", "fix", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("feedback"));
    assert_eq!(article_json(&dir, "transit")["status"], "in-review");
}

#[test]
fn wrong_role_rejected() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    submit(&dir, "transit");

    as_actor(&dir, "u-ana", "staff")
        .args(["review", "transit", "approve-to-eic", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("may not"));
}

#[test]
fn declined_confirmation_changes_nothing() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    create(&dir, "transit");

    as_actor(&dir, "u-ana", "staff")
        .args(["review", "transit", "submit"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
    assert_eq!(article_json(&dir, "transit")["status"], "draft");
}

#[test]
fn restore_to_in_review() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    submit(&dir, "transit");
    for (actor, role, action) in [
        ("u-sam", "section-head", "approve-to-eic"),
        ("u-eve", "editor-in-chief", "publish"),
        ("u-eve", "editor-in-chief", "archive"),
    ] {
        as_actor(&dir, actor, role)
            .args(["review", "transit", action, "--yes"])
            .assert()
            .success();
    }
    as_actor(&dir, "u-admin", "administrator")
        .args(["review", "transit", "restore", "--restore-to", "in-review", "--yes"])
        .assert()
        .success();
    assert_eq!(article_json(&dir, "transit")["status"], "in-review");
}

// ---------------------------------------------------------------------------
// bulk / queue
// ---------------------------------------------------------------------------

#[test]
fn bulk_partial_failure() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    submit(&dir, "a");
    create(&dir, "b");
    submit(&dir, "c");

    let out = as_actor(&dir, "u-sam", "section-head")
        .args(["--json", "bulk", "approve-to-eic", "a", "b", "c", "--yes"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["total"], 3);
    assert_eq!(json["successful"], 2);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["items"][1]["id"], "b");
}

#[test]
fn bulk_replay_fails() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    submit(&dir, "a");

    as_actor(&dir, "u-sam", "section-head")
        .args(["bulk", "approve-to-eic", "a", "--yes"])
        .assert()
        .success();
    as_actor(&dir, "u-sam", "section-head")
        .args(["bulk", "approve-to-eic", "a", "--yes"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("0 of 1 succeeded"));
}

#[test]
fn queue_filters() {
    let dir = TempDir::new().unwrap();
    init_newsroom(&dir);
    submit(&dir, "a");
    submit(&dir, "b");

    newsroom(&dir)
        .args(["queue", "section-head", "--sort-by", "title", "--order", "asc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Story a"))
        .stdout(predicate::str::contains("Story b"));

    newsroom(&dir)
        .args(["queue", "eic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing waiting"));

    newsroom(&dir)
        .args(["queue", "copy-desk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid queue"));
}

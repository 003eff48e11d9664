//! Integration tests for the runseq binary

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

const CONFIG: &str = r#"
name: demo
tasks:
  clean:
    usage: Remove output
    run: echo clean >> log.txt
  compile:
    usage: Compile sources
    deps: [clean]
    run: echo compile-${mode} >> log.txt
  fail:
    deps: [clean]
    run: exit 4
  hidden:
    private: true
    run: echo hidden >> log.txt
  default:
    deps: [compile]
"#;

fn runseq() -> Command {
    Command::cargo_bin("runseq").unwrap()
}

#[test]
fn test_success_exits_zero() {
    let (dir, path) = common::create_test_config(CONFIG);

    runseq()
        .arg("-f")
        .arg(&path)
        .args(["compile", "-D", "mode=release"])
        .assert()
        .success();

    assert_eq!(common::read_log(&dir), vec!["clean", "compile-release"]);
}

#[test]
fn test_default_task_runs_without_arguments() {
    let (dir, _path) = common::create_test_config(CONFIG);

    runseq()
        .current_dir(dir.path())
        .env("mode", "debug")
        .assert()
        .success();

    assert_eq!(common::read_log(&dir), vec!["clean", "compile-debug"]);
}

#[test]
fn test_failure_exits_non_zero_and_names_task() {
    let (dir, path) = common::create_test_config(CONFIG);

    runseq()
        .arg("--file")
        .arg(&path)
        .args(["fail", "compile"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Task 'fail' failed"));

    assert_eq!(common::read_log(&dir), vec!["clean"]);
}

#[test]
fn test_unknown_task_exits_two() {
    let (_dir, path) = common::create_test_config(CONFIG);

    runseq()
        .arg("-f")
        .arg(&path)
        .arg("publish")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Task 'publish' is not defined"));
}

#[test]
fn test_plan_does_not_run() {
    let (dir, path) = common::create_test_config(CONFIG);

    runseq()
        .arg("-f")
        .arg(&path)
        .args(["--plan", "compile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. clean"))
        .stdout(predicate::str::contains("2. compile"));

    assert!(common::read_log(&dir).is_empty());
}

#[test]
fn test_list_hides_private_tasks() {
    let (_dir, path) = common::create_test_config(CONFIG);

    runseq()
        .arg("-f")
        .arg(&path)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("Compile sources"))
        .stdout(predicate::str::contains("hidden").not());
}

#[test]
fn test_cyclic_config_fails_before_running() {
    let (dir, path) = common::create_test_config(
        r#"
tasks:
  a:
    deps: [b]
    run: echo a >> log.txt
  b:
    deps: [a]
    run: echo b >> log.txt
"#,
    );

    runseq()
        .arg("-f")
        .arg(&path)
        .arg("a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependency detected"));

    assert!(common::read_log(&dir).is_empty());
}

#[test]
fn test_duplicate_task_fails_before_running() {
    let (dir, path) = common::create_test_config(
        r#"
tasks:
  clean:
    run: echo first >> log.txt
  clean:
    run: echo second >> log.txt
"#,
    );

    runseq()
        .arg("-f")
        .arg(&path)
        .arg("clean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task 'clean' is already defined"));

    assert!(common::read_log(&dir).is_empty());
}

#[test]
fn test_plan_for_unknown_task_exits_two() {
    let (_dir, path) = common::create_test_config(CONFIG);

    runseq()
        .arg("-f")
        .arg(&path)
        .args(["--plan", "publish"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Task 'publish' is not defined"));
}

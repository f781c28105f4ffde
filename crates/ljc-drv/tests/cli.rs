//! Black-box CLI tests for the `ljc` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn ljc() -> Command {
    Command::cargo_bin("ljc").expect("binary builds")
}

#[test]
fn test_compile_writes_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("main.lj");
    std::fs::write(&src, "const x = 1 + 2\n").unwrap();

    ljc()
        .arg("compile")
        .arg(&src)
        .arg("-o")
        .arg(dir.path())
        .assert()
        .success();

    let out = dir.path().join("main.js");
    let code = std::fs::read_to_string(out).unwrap();
    assert!(code.contains("const x = (1 + 2);"));
}

#[test]
fn test_compile_error_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("bad.lj");
    std::fs::write(&src, "const = 1\n").unwrap();

    ljc()
        .arg("compile")
        .arg(&src)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error["));
}

#[test]
fn test_missing_file_exits_two() {
    ljc()
        .arg("compile")
        .arg("does-not-exist.lj")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_usage_error_exits_two() {
    ljc().arg("frobnicate").assert().code(2);
}

#[test]
fn test_emit_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("main.lj");
    std::fs::write(&src, "const x = 1\n").unwrap();

    ljc()
        .arg("compile")
        .arg(&src)
        .arg("--emit")
        .arg("tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Const"));
}

#[test]
fn test_build_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(dir.path().join("a.lj"), "const a = 1\n").unwrap();
    std::fs::write(dir.path().join("nested/b.lj"), "const b = 2\n").unwrap();

    ljc().arg("build").arg(dir.path()).assert().success();

    assert!(dir.path().join("a.js").exists());
    assert!(dir.path().join("nested/b.js").exists());
}

#[test]
fn test_build_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("good.lj"), "const a = 1\n").unwrap();
    std::fs::write(dir.path().join("bad.lj"), "const = 1\n").unwrap();

    ljc()
        .arg("build")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bad.lj"));
}

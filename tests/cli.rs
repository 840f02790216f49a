use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn lantana_run_quickstart() {
    let mut cmd = Command::cargo_bin("lantana").expect("binary exists");
    cmd.arg("run").arg("demos/quickstart.lt");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Hello from Lantana!"));
}

#[test]
fn lantana_eval_prints_the_result() {
    let mut cmd = Command::cargo_bin("lantana").expect("binary exists");
    cmd.arg("eval").arg("1 + 2 * 3;");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("7"));
}

#[test]
fn lantana_eval_truthiness_of_zero() {
    let mut cmd = Command::cargo_bin("lantana").expect("binary exists");
    cmd.arg("eval")
        .arg("if 0 { \"zero is truthy\"; } else { \"zero is falsy\"; }");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("zero is truthy"));
}

#[test]
fn lantana_run_executes_script_from_file() {
    let dir = tempdir().expect("create temp dir");
    let script_path = dir.path().join("greet.lt");
    fs::write(
        &script_path,
        "function greet(name) {\n    \"hi, \" + name;\n}\nprint(greet(\"tester\"));\n",
    )
    .expect("write script");

    let mut cmd = Command::cargo_bin("lantana").expect("binary exists");
    cmd.arg("run").arg(&script_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hi, tester"));
}

#[test]
fn lantana_tokens_dumps_the_stream() {
    let dir = tempdir().expect("create temp dir");
    let script_path = dir.path().join("tokens.lt");
    fs::write(&script_path, "x = 1.5;\n").expect("write script");

    let mut cmd = Command::cargo_bin("lantana").expect("binary exists");
    cmd.arg("tokens").arg(&script_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Number"))
        .stdout(predicate::str::contains("Assign"))
        .stdout(predicate::str::contains("Eof"));
}

#[test]
fn syntax_errors_exit_with_65() {
    let mut cmd = Command::cargo_bin("lantana").expect("binary exists");
    cmd.arg("eval").arg("1 +;");
    cmd.assert()
        .code(65)
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn runtime_errors_exit_with_65() {
    let mut cmd = Command::cargo_bin("lantana").expect("binary exists");
    cmd.arg("eval").arg("1 / 0;");
    cmd.assert()
        .code(65)
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn missing_script_exits_with_74() {
    let mut cmd = Command::cargo_bin("lantana").expect("binary exists");
    cmd.arg("run").arg("demos/does_not_exist.lt");
    cmd.assert().code(74);
}

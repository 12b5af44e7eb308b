use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const LONG: &str = "This paragraph was written on several\nshort lines and\nshould be joined.\n";

#[test]
fn stdin_to_stdout() {
    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.arg("-")
        .write_stdin(LONG)
        .assert()
        .success()
        .stdout("This paragraph was written on several short lines and should be joined.\n");
}

#[test]
fn width_flag_is_honoured() {
    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.args(["--width", "30", "-"])
        .write_stdin(LONG)
        .assert()
        .success()
        .stdout("This paragraph was written\non several short lines and\nshould be joined.\n");
}

#[test]
fn width_is_clamped_to_minimum() {
    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.args(["-w", "5", "-"])
        .write_stdin("aaaa bbbb cccc dddd eeee ffff\n")
        .assert()
        .success()
        .stdout("aaaa bbbb cccc dddd\neeee ffff\n");
}

#[test]
fn rewrites_file_in_place() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.adoc");
    fs::write(&path, LONG).unwrap();

    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.arg(&path).assert().success().stdout("");

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "This paragraph was written on several short lines and should be joined.\n"
    );
}

#[test]
fn writes_to_separate_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.adoc");
    let output = dir.path().join("out.adoc");
    fs::write(&input, "already fine\n").unwrap();

    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.arg(&input).arg(&output).assert().success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "already fine\n");
    assert_eq!(fs::read_to_string(&input).unwrap(), "already fine\n");
}

#[test]
fn check_reports_pending_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.adoc");
    fs::write(&path, LONG).unwrap();

    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.arg("--check").arg(&path).assert().code(1).stdout("");
    assert_eq!(fs::read_to_string(&path).unwrap(), LONG);

    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.arg(&path).assert().success();

    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.arg("--check").arg(&path).assert().success();
}

#[test]
fn line_flag_reflows_one_paragraph() {
    let input = "first\nparagraph\n\nsecond\nparagraph\n";
    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.args(["--line", "5", "-"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("first\nparagraph\n\nsecond paragraph\n");
}

#[test]
fn lines_flag_reflows_a_range() {
    let input = "one\ntwo\nthree\nfour\n";
    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.args(["--lines", "2:3", "-"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("one\ntwo three\nfour\n");
}

#[test]
fn lines_past_the_end_is_an_error() {
    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.args(["--lines", "2:9", "-"])
        .write_stdin("one\ntwo\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("line range"));
}

#[test]
fn line_and_lines_conflict() {
    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.args(["--line", "1", "--lines", "1:2", "-"])
        .write_stdin("x\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn zero_line_number_is_rejected() {
    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.args(["--line", "0", "-"])
        .write_stdin("x\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line numbers start at 1"));
}

#[test]
fn config_file_is_discovered_above_input() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".adoc-reflow.toml"), "width = 30\n").unwrap();
    let nested = dir.path().join("docs");
    fs::create_dir(&nested).unwrap();
    let path = nested.join("doc.adoc");
    fs::write(&path, LONG).unwrap();

    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.arg(&path).assert().success();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "This paragraph was written\non several short lines and\nshould be joined.\n"
    );
}

#[test]
fn width_flag_beats_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "width = 30\n").unwrap();

    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.arg("--config")
        .arg(&config)
        .args(["--width", "200", "-"])
        .write_stdin(LONG)
        .assert()
        .success()
        .stdout("This paragraph was written on several short lines and should be joined.\n");
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "colour = \"blue\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.arg("--config")
        .arg(&config)
        .arg("-")
        .write_stdin(LONG)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn missing_input_is_reported() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("adoc-reflow");
    cmd.arg(dir.path().join("nope.adoc"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}

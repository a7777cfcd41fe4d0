use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_input(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write input");
    path
}

#[test]
fn list_grammars() {
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("--list-grammars");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("int-list").and(predicate::str::contains("shell")));
}

#[test]
fn validate_int_list() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "numbers.txt", b"1, 2,3\n");
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("int-list").arg(&path);
    cmd.assert().success().stdout("success\n").stderr("");
}

#[test]
fn parse_int_list_as_json() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "numbers.txt", b"10,20");
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("int-list").arg(&path).args(["--mode", "parse", "--format", "json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("10").and(predicate::str::contains("20")));
}

#[test]
fn recovered_errors_exit_zero_and_report_location() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "numbers.txt", b"1,\n,3");
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("int-list").arg(&path);
    cmd.assert()
        .success()
        .stdout("recovered_error\n")
        .stderr(predicate::str::contains("numbers.txt:2:1: int-list: expected"));
}

#[test]
fn fatal_error_exits_one() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "numbers.txt", b"1,x");
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("int-list").arg(&path).args(["--format", "json"]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("\"status\": \"fatal_error\""))
        .stderr(predicate::str::contains("numbers.txt:1:3"));
}

#[test]
fn shell_tree_hides_whitespace() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "script.sh", b"echo hi $USER\n");
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("shell").arg(&path).args(["--mode", "tree", "--hide-whitespace"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("├─ command 0..14"))
        .stdout(predicate::str::contains("variable 8..13"))
        .stdout(predicate::str::contains("whitespace").not());
}

#[test]
fn shell_parse_as_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "script.sh", b"cd \"my dir\"\n");
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("shell").arg(&path).args(["-m", "parse", "-f", "yaml"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("command: cd").and(predicate::str::contains("quoted: my dir")));
}

#[test]
fn reads_utf16_input() {
    let dir = TempDir::new().unwrap();
    let bytes: Vec<u8> = "pwd".encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect();
    let path = write_input(&dir, "script.txt", &bytes);
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("shell").arg(&path).args(["--encoding", "utf16"]);
    cmd.assert().success().stdout("success\n");
}

#[test]
fn odd_utf16_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "script.txt", b"pwd");
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("shell").arg(&path).args(["--encoding", "utf16"]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("multiple of 2 bytes"));
}

#[test]
fn config_file_sets_format() {
    let dir = TempDir::new().unwrap();
    let config = write_input(&dir, "lexkit.toml", b"[inspect]\nformat = \"json\"\n");
    let path = write_input(&dir, "numbers.txt", b"7");
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("int-list").arg(&path).arg("--config").arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"success\""));
}

#[test]
fn missing_input_exits_two() {
    let dir = TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("int-list").arg(dir.path().join("absent.txt"));
    cmd.assert().code(2).stderr(predicate::str::contains("Cannot read"));
}

#[test]
fn reads_stdin() {
    let mut cmd = cargo_bin_cmd!("lexkit");
    cmd.arg("int-list").arg("-").args(["--mode", "parse"]).write_stdin("4,5");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("4").and(predicate::str::contains("5")));
}

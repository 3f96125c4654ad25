use std::io::Write;

use assert_cmd::Command;
use rstest::rstest;

const BIN: &str = "guardctl";

fn stdout(cmd: &mut Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8_lossy(&out).to_string()
}

#[test]
fn test_empty_args() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.assert().failure();
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.arg("-h").assert().success();
}

#[test]
fn test_bad_keyword() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.arg("bouh").assert().failure();
}

#[test]
fn test_version_keyword() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    let out = stdout(cmd.arg("version"));
    assert!(out.contains("tourguard-geofence/"));
}

#[rstest]
#[case(["0", "0", "0", "0.01"], "1.112")]
#[case(["-33.8688", "151.2093", "-33.8688", "151.2093"], "0.000")]
fn test_distance(#[case] args: [&str; 4], #[case] km: &str) {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    let out = stdout(cmd.arg("distance").args(args));
    assert_eq!(km, out.trim());
}

#[test]
fn test_distance_delhi_mumbai() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    let out = stdout(cmd.args(["distance", "28.6139", "77.2090", "19.0760", "72.8777"]));
    let km: f64 = out.trim().parse().unwrap();
    assert!((1140. ..1160.).contains(&km));
}

#[test]
fn test_distance_out_of_range() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.args(["distance", "91", "0", "0", "0"]).assert().failure();
}

#[test]
fn test_check_restricted() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    let out = stdout(cmd.args(["check", "--at", "2024-03-01T10:00:00Z", "28.6562", "77.2410"]));
    assert!(out.contains("Restricted Area Alert"));
    assert!(out.contains("\"safeArea\": false"));
}

#[test]
fn test_check_safe_area() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    let out = stdout(cmd.args(["check", "28.6315", "77.2167"]));
    assert!(out.contains("\"alerts\": []"));
    assert!(out.contains("\"safeArea\": true"));
}

#[test]
fn test_fences_builtin() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    let out = stdout(cmd.arg("fences"));
    assert!(out.starts_with("List all fences (5)"));
}

#[test]
fn test_fences_from_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        f,
        r#"version = 1

fence "harbour" {{
  name   = "Harbour"
  center = {{ latitude = -33.8568, longitude = 151.2153 }}
  radius = 0.5
  type   = "restricted"
}}"#
    )
    .unwrap();

    let mut cmd = Command::cargo_bin(BIN).unwrap();
    let out = stdout(cmd.arg("--fences").arg(f.path()).arg("fences"));
    assert!(out.starts_with("List all fences (1)"));
    assert!(out.contains("harbour"));
}

#[test]
fn test_replay() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    let out = stdout(cmd.args(["replay", "scenarios/delhi.json"]));
    let lines = out.lines().collect::<Vec<_>>();
    assert_eq!(8, lines.len());
    assert!(lines[5].contains("\"score\":60"));
}

#[test]
fn test_replay_missing_file() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.args(["replay", "/nonexistent.json"]).assert().failure();
}

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tempfile::TempDir;

const JOHN: &str = "C - 3 - 4
M - 1 - 3
T - 1 - 1 - 3
T - 1 - 1 - 2
#Commentaire
 A - John - 1 - 1 - S - AADADAGG
";

const JOHN_REPORT: &str = "C - 3 - 4\nM - 1 - 3\nT - 1 - 1 - 5\nA - John - 0 - 1 - S - 0\n";

fn scenario_file(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("scenario.txt");
    fs::write(&path, contents).expect("write scenario");
    path
}

fn treasure_hunt(input: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_treasure-hunt"))
        .arg(input)
        .args(args)
        .output()
        .expect("failed to run treasure-hunt")
}

#[test]
fn prints_final_report() {
    let dir = TempDir::new().expect("temp dir");
    let input = scenario_file(&dir, JOHN);

    let output = treasure_hunt(&input, &[]);

    assert!(output.status.success(), "treasure-hunt should succeed");
    assert_eq!(String::from_utf8_lossy(&output.stdout), JOHN_REPORT);
}

#[test]
fn writes_report_to_output_file() {
    let dir = TempDir::new().expect("temp dir");
    let input = scenario_file(&dir, JOHN);
    let report = dir.path().join("report.txt");

    let output = treasure_hunt(&input, &["--output", &report.to_string_lossy()]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read_to_string(&report).expect("report written"), JOHN_REPORT);
}

#[test]
fn fails_on_malformed_scenario() {
    let dir = TempDir::new().expect("temp dir");
    let input = scenario_file(&dir, "C - 3 - 4\nX - 1 - 1\n");

    let output = treasure_hunt(&input, &[]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("X is not a valid entry | line 2"));
}

#[test]
fn zero_cell_width_fails_before_any_report_is_emitted() {
    let dir = TempDir::new().expect("temp dir");
    let input = scenario_file(&dir, JOHN);
    let report = dir.path().join("report.txt");

    let printed = treasure_hunt(&input, &["--board", "--cell-width", "0"]);
    assert!(!printed.status.success());
    assert!(printed.stdout.is_empty());
    assert!(String::from_utf8_lossy(&printed.stderr).contains("cell width must be positive"));

    let written = treasure_hunt(
        &input,
        &[
            "--board",
            "--cell-width",
            "0",
            "--output",
            &report.to_string_lossy(),
        ],
    );
    assert!(!written.status.success());
    assert!(!report.exists());
}

#[test]
fn json_with_board_keeps_stdout_parseable() {
    let dir = TempDir::new().expect("temp dir");
    let input = scenario_file(&dir, JOHN);

    let output = treasure_hunt(&input, &["--json", "--board"]);

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a single JSON document");
    assert_eq!(report["adventurers"][0]["name"], "John");
    assert!(String::from_utf8_lossy(&output.stderr).contains("A (John)"));
}

#[test]
fn board_follows_text_report_on_stdout() {
    let dir = TempDir::new().expect("temp dir");
    let input = scenario_file(&dir, JOHN);

    let output = treasure_hunt(&input, &["--board", "--cell-width", "4"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let board = stdout.strip_prefix(JOHN_REPORT).expect("report comes first");
    assert_eq!(board.lines().nth(1), Some("A (JT (5.   "));
}

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn run_freecell(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_freecell"))
        .args(args)
        .output()
        .expect("Failed to execute freecell")
}

fn stdout_of(output: &Output) -> String {
    if !output.status.success() {
        panic!(
            "Command failed with status: {:?}\nstderr: {}\nstdout: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn temp_csv(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("freecell_{}_{}.csv", name, std::process::id()));
    let _ = fs::remove_file(&path);
    path
}

#[test]
fn test_show_text() {
    let stdout = stdout_of(&run_freecell(&["show", "1"]));

    assert!(stdout.starts_with("CC DD HH SS\n-- -- -- --\n\n00 01 02 03\n-- -- -- --\n"));
    assert!(stdout.contains("\n00 01 02 03 04 05 06 07\n-- -- -- -- -- -- -- --\nJD 2D 9H JC 5D 7H 7C 5H\n"));
}

#[test]
fn test_show_json() {
    let stdout = stdout_of(&run_freecell(&["show", "1", "--format", "json"]));
    assert!(stdout.starts_with("[[41,49,7,12,11,21,23],[5,48,51,16,37,31,32],"));
}

#[test]
fn test_show_fixture() {
    let stdout = stdout_of(&run_freecell(&["show", "2", "--format", "fixture"]));

    assert!(stdout.contains("let board = Board::from_layout(\n"));
    assert!(stdout.contains("        \"QD 4D TD 7S AH 3H AS\",\n"));
    assert!(stdout.contains("assert!(board.is_valid());"));
}

#[test]
fn test_solve_deal() {
    let stdout = stdout_of(&run_freecell(&["solve", "1", "-j", "2"]));

    assert!(stdout.contains("Deal #1"), "Should print the deal");
    assert!(stdout.contains("Solved in "), "Should solve deal 1");
    assert!(stdout.contains("Search Statistics:"), "Should print statistics");
    assert!(stdout.contains("Visited nodes: "));
}

#[test]
fn test_solve_with_boards() {
    let stdout = stdout_of(&run_freecell(&["solve", "1", "-j", "1", "--boards", "--no-auto-play"]));

    assert!(stdout.contains("\n#1 "), "Should number the steps");
    assert!(stdout.contains("KC KD KH KS"), "Should end on a complete foundation");
}

#[test]
fn test_solve_node_limit() {
    let stdout = stdout_of(&run_freecell(&["solve", "1", "--max-nodes", "3"]));
    assert!(stdout.contains("No solution found (limit reached)."));
}

#[test]
fn test_solve_rejects_deal_zero() {
    let output = run_freecell(&["solve", "0"]);
    assert!(!output.status.success());
}

#[test]
fn test_batch_writes_csv() {
    let csv = temp_csv("batch");
    let output = run_freecell(&[
        "batch",
        "--from",
        "1",
        "--to",
        "3",
        "--exclude",
        "2",
        "-j",
        "2",
        "--output",
        csv.to_str().unwrap(),
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("2: excluded"));

    let contents = fs::read_to_string(&csv).unwrap();
    let _ = fs::remove_file(&csv);
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);

    let first: Vec<u64> = lines[0].split(',').map(|f| f.parse().unwrap()).collect();
    assert_eq!(first.len(), 4);
    assert_eq!(first[0], 1);
    assert!(first[1] > 0, "deal 1 should be solved");
    assert!(first[2] > 0);

    assert_eq!(lines[1], "2,0,0,0");
    assert!(lines[2].starts_with("3,"));
    assert_eq!(lines[2].split(',').count(), 4);
}

#[test]
fn test_batch_appends() {
    let csv = temp_csv("append");
    for _ in 0..2 {
        let output = run_freecell(&[
            "batch",
            "--from",
            "5",
            "--to",
            "5",
            "--exclude",
            "5",
            "--output",
            csv.to_str().unwrap(),
        ]);
        stdout_of(&output);
    }

    let contents = fs::read_to_string(&csv).unwrap();
    let _ = fs::remove_file(&csv);
    assert_eq!(contents, "5,0,0,0\n5,0,0,0\n");
}

#[test]
fn test_batch_rejects_empty_range() {
    let output = run_freecell(&["batch", "--from", "5", "--to", "3", "--output", "unused.csv"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error during batch run: Empty deal range"));
}

#[test]
fn test_no_arguments_prints_help() {
    let output = run_freecell(&[]);
    assert!(!output.status.success());
}

// Non-interactive subcommands of the compiled binary.

use assert_cmd::Command;
use laptrack::storage::{self, FileStore};
use laptrack::{Lap, Session};

fn saved_run(dir: &std::path::Path) {
    let mut session = Session::new(200.0);
    session.laps = vec![Lap::new(1, 60_000, 200.0), Lap::new(2, 65_000, 200.0)];
    session.elapsed_time = 125_000;
    session.start_time = Some(0);
    storage::save_session(&FileStore::with_dir(dir), &session).unwrap();
}

#[test]
fn summary_without_session() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::cargo_bin("laptrack")
        .unwrap()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("summary")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "No laps recorded.\n");
}

#[test]
fn summary_prints_saved_run() {
    let dir = tempfile::tempdir().unwrap();
    saved_run(dir.path());

    let output = Command::cargo_bin("laptrack")
        .unwrap()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("summary")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Laps:         2"));
    assert!(stdout.contains("Avg pace:     5:12/km"));
    assert!(stdout.contains("Split:        positive"));
    assert!(!stdout.contains("Calories:"));
}

#[test]
fn reset_clears_saved_run() {
    let dir = tempfile::tempdir().unwrap();
    saved_run(dir.path());

    Command::cargo_bin("laptrack")
        .unwrap()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("reset")
        .assert()
        .success();

    assert!(storage::load_session(&FileStore::with_dir(dir.path())).is_none());
}

#[test]
fn tui_requires_a_tty() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("laptrack")
        .unwrap()
        .arg("--data-dir")
        .arg(dir.path())
        .write_stdin("")
        .assert()
        .failure();
}

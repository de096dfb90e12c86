// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

const REFERENCE: &str = "The quick brown fox jumps over the lazy black dogs.";

fn quickfox_cmd(dir: &tempfile::TempDir) -> String {
    // Resolve path to compiled binary (debug build during tests)
    let bin = assert_cmd::cargo::cargo_bin("quickfox");
    format!(
        "{} --config {} --log-file {}",
        bin.display(),
        dir.path().join("config.json").display(),
        dir.path().join("quickfox.log").display()
    )
}

#[test]
#[ignore]
fn typing_the_sentence_prints_results() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut p = spawn(quickfox_cmd(&dir))?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    p.send(REFERENCE)?;

    // The session ends on its own once the sentence is complete
    p.expect("Accuracy: 100.00%")?;
    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn escape_exits_without_results() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut p = spawn(quickfox_cmd(&dir))?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    p.send("The qu")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("\x1b")?; // ESC

    // Wait for the program to terminate cleanly
    p.expect(Eof)?;
    Ok(())
}

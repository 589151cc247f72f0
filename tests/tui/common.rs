//! Common helpers for headless UI tests.

use std::process::Command;

/// Runs the built binary in headless mode against the mock database.
///
/// Returns the exit code, stdout and stderr.
pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_medrec-dash"))
        .args(["--headless", "--mock-db"])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

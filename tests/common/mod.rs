//! Common test utilities for driving the `nkhost` binary.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

/// Write `contents` to a temporary `.toml` options file.
#[allow(dead_code)]
pub fn options_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".toml").expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write options file");
    file
}

/// Run the `nkhost` binary with `args`, logging silenced.
pub fn nkhost(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nkhost"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute nkhost")
}

/// Run `nkhost` and return its stdout, failing the test on a non-zero exit.
#[allow(dead_code)]
pub fn nkhost_ok(args: &[&str]) -> String {
    let output = nkhost(args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("nkhost {args:?} failed: {stderr}");
    }
    String::from_utf8(output.stdout).expect("stdout is not UTF-8")
}

/// Run `nkhost` expecting failure and return its stderr.
#[allow(dead_code)]
pub fn nkhost_err(args: &[&str]) -> String {
    let output = nkhost(args);
    assert!(!output.status.success(), "nkhost {args:?} unexpectedly succeeded");
    String::from_utf8_lossy(&output.stderr).into_owned()
}

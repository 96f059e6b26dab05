#![allow(dead_code)]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

/// The binary pointed at a sqlite database, isolated from the caller's environment.
pub fn ledger(db_path: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("cibil-ledger"));
    cmd.env_remove("LEDGER_BACKEND")
        .env_remove("LEDGER_DB_PATH")
        .env("RUST_LOG", "off")
        .arg("--db-path")
        .arg(db_path);
    cmd
}

pub fn write_script(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Registered project site used across tests.
pub const SITE_LAT: &str = "52.0907";
pub const SITE_LON: &str = "5.1214";

/// ~920 m north of the site: outside any radius the tests configure.
pub const FAR_LAT: &str = "52.0990";

pub fn gcl() -> Command {
    cargo_bin_cmd!("geoclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_geoclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB schema and register the standard test project
/// ("Kade West" at the site coordinates, 100 m radius).
pub fn init_db_with_project(db_path: &str) {
    gcl()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    gcl()
        .args([
            "--db",
            db_path,
            "--test",
            "project",
            "--add",
            "--name",
            "Kade West",
            "--company",
            "The Global",
            "--address",
            "Kadelaan 12, Utrecht",
            "--coord",
            "52.0907,5.1214",
            "--radius",
            "100",
        ])
        .assert()
        .success();
}

/// Clock in on the standard test project from the given position.
pub fn clock_in_at(db_path: &str, lat: &str, lon: &str) {
    gcl()
        .args([
            "--db", db_path, "--test", "in", "Kade West", "--lat", lat, "--lon", lon, "--yes",
        ])
        .assert()
        .success();
}

/// Complete one session (clock in + clock out at the site).
pub fn record_closed_session(db_path: &str) {
    clock_in_at(db_path, SITE_LAT, SITE_LON);

    gcl()
        .args([
            "--db", db_path, "--test", "out", "--lat", SITE_LAT, "--lon", SITE_LON, "--yes",
        ])
        .assert()
        .success();
}

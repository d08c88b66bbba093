use predicates::str::contains;
use std::fs;

mod common;
use common::{gcl, init_db_with_project, record_closed_session, setup_test_db, temp_out};

#[test]
fn test_backup_plain_json_snapshot() {
    let db = setup_test_db("backup_plain");
    init_db_with_project(&db);
    record_closed_session(&db);

    let out = temp_out("backup_plain", "json");

    gcl()
        .args(["--db", &db, "--test", "backup", "--file", &out])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    let content = fs::read_to_string(&out).expect("read snapshot");
    assert!(content.contains("\"projects\""));
    assert!(content.contains("\"entries\""));
    assert!(content.contains("Kade West"));
}

#[test]
fn test_backup_compressed_zip() {
    let db = setup_test_db("backup_zip");
    init_db_with_project(&db);

    let out = temp_out("backup_zip", "json");

    gcl()
        .args([
            "--db", &db, "--test", "backup", "--file", &out, "--compress", "zip",
        ])
        .assert()
        .success()
        .stdout(contains("Compressed"));

    let zip_path = out.replace(".json", ".zip");
    assert!(fs::metadata(&zip_path).expect("zip exists").len() > 0);
    // Plain snapshot is replaced by the archive
    assert!(!std::path::Path::new(&out).exists());
}

#[test]
fn test_backup_compressed_targz() {
    let db = setup_test_db("backup_targz");
    init_db_with_project(&db);

    let out = temp_out("backup_targz", "json");

    gcl()
        .args([
            "--db", &db, "--test", "backup", "--file", &out, "--compress", "targz",
        ])
        .assert()
        .success()
        .stdout(contains("Compressed"));

    let tgz_path = out.replace(".json", ".tar.gz");
    assert!(fs::metadata(&tgz_path).expect("tar.gz exists").len() > 0);
}

#[test]
fn test_restore_into_fresh_database() {
    let db = setup_test_db("restore_src");
    init_db_with_project(&db);
    record_closed_session(&db);

    let out = temp_out("restore_snapshot", "json");
    gcl()
        .args(["--db", &db, "--test", "backup", "--file", &out])
        .assert()
        .success();

    // Import into a brand new database
    let db2 = setup_test_db("restore_dst");
    gcl()
        .args(["--db", &db2, "--test", "init"])
        .assert()
        .success();

    gcl()
        .args(["--db", &db2, "--test", "restore", "--file", &out, "--yes"])
        .assert()
        .success()
        .stdout(contains("Restore completed"));

    gcl()
        .args(["--db", &db2, "--test", "list", "--period", "all"])
        .assert()
        .success()
        .stdout(contains("Kade West"));
}

#[test]
fn test_restore_never_overwrites_existing_rows() {
    let db = setup_test_db("restore_merge");
    init_db_with_project(&db);
    record_closed_session(&db);

    let out = temp_out("restore_merge_snapshot", "json");
    gcl()
        .args(["--db", &db, "--test", "backup", "--file", &out])
        .assert()
        .success();

    // Importing into the same database: everything already exists.
    gcl()
        .args(["--db", &db, "--test", "restore", "--file", &out, "--yes"])
        .assert()
        .success()
        .stdout(contains("0 row(s) imported"));
}

#[test]
fn test_restore_from_zip_archive() {
    let db = setup_test_db("restore_zip_src");
    init_db_with_project(&db);

    let out = temp_out("restore_zip_snapshot", "json");
    gcl()
        .args([
            "--db", &db, "--test", "backup", "--file", &out, "--compress", "zip",
        ])
        .assert()
        .success();

    let zip_path = out.replace(".json", ".zip");

    let db2 = setup_test_db("restore_zip_dst");
    gcl()
        .args(["--db", &db2, "--test", "init"])
        .assert()
        .success();

    gcl()
        .args([
            "--db", &db2, "--test", "restore", "--file", &zip_path, "--yes",
        ])
        .assert()
        .success()
        .stdout(contains("Restore completed"));

    gcl()
        .args(["--db", &db2, "--test", "project", "--list"])
        .assert()
        .success()
        .stdout(contains("Kade West"));
}

#[test]
fn test_restore_missing_file() {
    let db = setup_test_db("restore_missing");
    init_db_with_project(&db);

    gcl()
        .args([
            "--db",
            &db,
            "--test",
            "restore",
            "--file",
            "/nonexistent/backup.json",
            "--yes",
        ])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

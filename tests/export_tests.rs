use predicates::str::contains;
use std::fs;

mod common;
use common::{gcl, init_db_with_project, record_closed_session, setup_test_db, temp_out};

#[test]
fn test_export_csv_contains_session() {
    let db = setup_test_db("export_csv");
    init_db_with_project(&db);
    record_closed_session(&db);

    let out = temp_out("export_csv", "csv");

    gcl()
        .args([
            "--db", &db, "--test", "export", "--format", "csv", "--file", &out, "--force",
        ])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read csv");
    assert!(content.contains("id,date,company,project"));
    assert!(content.contains("Kade West"));
    assert!(content.contains("within"));
}

#[test]
fn test_export_json_contains_verdict() {
    let db = setup_test_db("export_json");
    init_db_with_project(&db);
    record_closed_session(&db);

    let out = temp_out("export_json", "json");

    gcl()
        .args([
            "--db", &db, "--test", "export", "--format", "json", "--file", &out, "--force",
        ])
        .assert()
        .success()
        .stdout(contains("JSON export completed"));

    let content = fs::read_to_string(&out).expect("read json");
    assert!(content.contains("\"project\": \"Kade West\""));
    assert!(content.contains("\"verdict\": \"within\""));
}

#[test]
fn test_export_xlsx_creates_file() {
    let db = setup_test_db("export_xlsx");
    init_db_with_project(&db);
    record_closed_session(&db);

    let out = temp_out("export_xlsx", "xlsx");

    gcl()
        .args([
            "--db", &db, "--test", "export", "--format", "xlsx", "--file", &out, "--force",
        ])
        .assert()
        .success()
        .stdout(contains("XLSX export completed"));

    let meta = fs::metadata(&out).expect("xlsx file exists");
    assert!(meta.len() > 0);
}

#[test]
fn test_export_pdf_creates_file() {
    let db = setup_test_db("export_pdf");
    init_db_with_project(&db);
    record_closed_session(&db);

    let out = temp_out("export_pdf", "pdf");

    gcl()
        .args([
            "--db", &db, "--test", "export", "--format", "pdf", "--file", &out, "--force",
        ])
        .assert()
        .success()
        .stdout(contains("PDF export completed"));

    let content = fs::read(&out).expect("read pdf");
    assert!(content.starts_with(b"%PDF"));
}

#[test]
fn test_export_requires_absolute_path() {
    let db = setup_test_db("export_relative");
    init_db_with_project(&db);

    gcl()
        .args([
            "--db",
            &db,
            "--test",
            "export",
            "--format",
            "csv",
            "--file",
            "relative.csv",
            "--force",
        ])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_export_empty_range_warns() {
    let db = setup_test_db("export_empty_range");
    init_db_with_project(&db);
    record_closed_session(&db);

    let out = temp_out("export_empty_range", "csv");

    gcl()
        .args([
            "--db", &db, "--test", "export", "--format", "csv", "--file", &out, "--range",
            "1999", "--force",
        ])
        .assert()
        .success()
        .stdout(contains("No entries found"));

    assert!(!std::path::Path::new(&out).exists());
}

#[test]
fn test_export_range_filters_sessions() {
    let db = setup_test_db("export_range_filter");
    init_db_with_project(&db);
    record_closed_session(&db);

    let out = temp_out("export_range_filter", "csv");
    let this_year = chrono::Local::now().format("%Y").to_string();

    gcl()
        .args([
            "--db", &db, "--test", "export", "--format", "csv", "--file", &out, "--range",
            &this_year, "--force",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read csv");
    assert!(content.contains("Kade West"));
}

#[test]
fn test_export_invalid_range_rejected() {
    let db = setup_test_db("export_bad_range");
    init_db_with_project(&db);
    record_closed_session(&db);

    let out = temp_out("export_bad_range", "csv");

    gcl()
        .args([
            "--db", &db, "--test", "export", "--format", "csv", "--file", &out, "--range",
            "soon", "--force",
        ])
        .assert()
        .failure();
}

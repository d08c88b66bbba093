use predicates::str::contains;

mod common;
use common::{SITE_LAT, SITE_LON, clock_in_at, gcl, init_db_with_project, setup_test_db};

#[test]
fn test_track_once_records_a_sample() {
    let db = setup_test_db("track_once");
    init_db_with_project(&db);
    clock_in_at(&db, SITE_LAT, SITE_LON);

    gcl()
        .args([
            "--db", &db, "--test", "track", "--once", "--lat", SITE_LAT, "--lon", SITE_LON,
        ])
        .assert()
        .success()
        .stdout(contains("Position logged"));

    gcl()
        .args(["--db", &db, "--test", "list", "--period", "all", "--gps"])
        .assert()
        .success()
        .stdout(contains("Background position log"))
        .stdout(contains("52.0907, 5.1214"))
        .stdout(contains("within radius"));
}

#[test]
fn test_track_requires_open_session() {
    let db = setup_test_db("track_no_session");
    init_db_with_project(&db);

    gcl()
        .args([
            "--db", &db, "--test", "track", "--once", "--lat", SITE_LAT, "--lon", SITE_LON,
        ])
        .assert()
        .failure()
        .stderr(contains("not clocked in"));
}

#[test]
fn test_track_sample_outside_radius_is_recorded() {
    let db = setup_test_db("track_outside");
    init_db_with_project(&db);
    clock_in_at(&db, SITE_LAT, SITE_LON);

    // A wandering sample is logged with its verdict, not refused.
    gcl()
        .args([
            "--db",
            &db,
            "--test",
            "track",
            "--once",
            "--lat",
            common::FAR_LAT,
            "--lon",
            SITE_LON,
        ])
        .assert()
        .success()
        .stdout(contains("outside"));

    gcl()
        .args(["--db", &db, "--test", "list", "--period", "all", "--gps"])
        .assert()
        .success()
        .stdout(contains("OUTSIDE RADIUS"));
}

#[test]
fn test_gps_listing_for_specific_entry() {
    let db = setup_test_db("track_entry_filter");
    init_db_with_project(&db);
    clock_in_at(&db, SITE_LAT, SITE_LON);

    gcl()
        .args([
            "--db", &db, "--test", "track", "--once", "--lat", SITE_LAT, "--lon", SITE_LON,
        ])
        .assert()
        .success();

    gcl()
        .args([
            "--db", &db, "--test", "list", "--period", "all", "--gps", "--entry", "1",
        ])
        .assert()
        .success()
        .stdout(contains("#1"));

    gcl()
        .args([
            "--db", &db, "--test", "list", "--period", "all", "--gps", "--entry", "99",
        ])
        .assert()
        .success()
        .stdout(contains("No matching sessions"));
}

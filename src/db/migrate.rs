use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check whether a migration has already been recorded in the log table.
fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_migration(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the core tables with the current schema.
fn create_core_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            company     TEXT NOT NULL,
            address     TEXT NOT NULL DEFAULT '',
            latitude    REAL,
            longitude   REAL,
            radius_m    REAL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS entries (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id          INTEGER NOT NULL,
            status              TEXT NOT NULL CHECK(status IN ('open','closed')),
            note                TEXT NOT NULL DEFAULT '',
            date                TEXT NOT NULL,
            clock_in_at         TEXT NOT NULL,
            clock_in_lat        REAL NOT NULL,
            clock_in_lon        REAL NOT NULL,
            clock_in_accuracy   REAL,
            clock_in_distance_m REAL,
            clock_in_verdict    TEXT NOT NULL
                CHECK(clock_in_verdict IN ('within','outside','indeterminate')),
            clock_out_at        TEXT,
            clock_out_lat       REAL,
            clock_out_lon       REAL,
            clock_out_accuracy  REAL,
            clock_out_distance_m REAL,
            clock_out_verdict   TEXT
                CHECK(clock_out_verdict IN ('within','outside','indeterminate')),
            total_minutes       INTEGER,
            created_at          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS gps_log (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id    INTEGER NOT NULL,
            logged_at   TEXT NOT NULL,
            latitude    REAL NOT NULL,
            longitude   REAL NOT NULL,
            accuracy    REAL,
            distance_m  REAL,
            verdict     TEXT NOT NULL
                CHECK(verdict IN ('within','outside','indeterminate'))
        );

        CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
        CREATE INDEX IF NOT EXISTS idx_entries_status ON entries(status);
        CREATE INDEX IF NOT EXISTS idx_gps_log_entry ON gps_log(entry_id);
        "#,
    )?;
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table (also the migration marker store)
    ensure_log_table(conn)?;

    // 2) Base schema
    let version = "20250612_0001_core_schema";
    if !table_exists(conn, "entries")? {
        create_core_tables(conn)?;
        mark_migration(conn, version, "Created projects/entries/gps_log tables")?;
        success("Created core tables (current schema).");
    } else {
        // Keep indexes in shape on already-initialized databases
        conn.execute_batch(
            r#"
            CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
            CREATE INDEX IF NOT EXISTS idx_entries_status ON entries(status);
            CREATE INDEX IF NOT EXISTS idx_gps_log_entry ON gps_log(entry_id);
            "#,
        )?;

        if !migration_applied(conn, version)? {
            mark_migration(conn, version, "Adopted existing core tables")?;
        }
    }

    Ok(())
}

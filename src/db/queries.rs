use crate::db::models::GpsSample;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::Coordinate;
use crate::models::entry::{ClockEntry, EntryStatus};
use crate::models::project::Project;
use crate::models::verdict::ComplianceVerdict;
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{Connection, Result, Row, params};

// ---------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------

fn conversion_err(e: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

fn parse_local_ts(s: &str) -> rusqlite::Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| conversion_err(AppError::InvalidDate(s.to_string())))
}

fn coordinate_from_cols(
    lat: Option<f64>,
    lon: Option<f64>,
    accuracy: Option<f64>,
) -> rusqlite::Result<Option<Coordinate>> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Coordinate::with_accuracy(lat, lon, accuracy)
            .map(Some)
            .map_err(conversion_err),
        _ => Ok(None),
    }
}

fn verdict_from_col(s: &str) -> rusqlite::Result<ComplianceVerdict> {
    ComplianceVerdict::from_db_str(s)
        .ok_or_else(|| conversion_err(AppError::Other(format!("invalid verdict: {}", s))))
}

pub fn map_project_row(row: &Row) -> Result<Project> {
    let coordinate = coordinate_from_cols(
        row.get("latitude")?,
        row.get("longitude")?,
        None,
    )?;

    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        company: row.get("company")?,
        address: row.get("address")?,
        coordinate,
        radius_m: row.get("radius_m")?,
        created_at: row.get("created_at")?,
    })
}

pub fn map_entry_row(row: &Row) -> Result<ClockEntry> {
    let status_str: String = row.get("status")?;
    let status = EntryStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_err(AppError::Other(format!("invalid status: {}", status_str))))?;

    let clock_in_at_str: String = row.get("clock_in_at")?;
    let clock_in_at = parse_local_ts(&clock_in_at_str)?;

    let clock_in = coordinate_from_cols(
        row.get("clock_in_lat")?,
        row.get("clock_in_lon")?,
        row.get("clock_in_accuracy")?,
    )?
    .ok_or_else(|| conversion_err(AppError::Other("entry without clock-in position".into())))?;

    let in_verdict_str: String = row.get("clock_in_verdict")?;
    let clock_in_verdict = verdict_from_col(&in_verdict_str)?;

    let clock_out_at = match row.get::<_, Option<String>>("clock_out_at")? {
        Some(s) => Some(parse_local_ts(&s)?),
        None => None,
    };

    let clock_out = coordinate_from_cols(
        row.get("clock_out_lat")?,
        row.get("clock_out_lon")?,
        row.get("clock_out_accuracy")?,
    )?;

    let clock_out_verdict = match row.get::<_, Option<String>>("clock_out_verdict")? {
        Some(s) => Some(verdict_from_col(&s)?),
        None => None,
    };

    Ok(ClockEntry {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        status,
        note: row.get("note")?,
        clock_in_at,
        clock_in,
        clock_in_distance_m: row.get("clock_in_distance_m")?,
        clock_in_verdict,
        clock_out_at,
        clock_out,
        clock_out_distance_m: row.get("clock_out_distance_m")?,
        clock_out_verdict,
        total_minutes: row.get("total_minutes")?,
        created_at: row.get("created_at")?,
    })
}

fn map_sample_row(row: &Row) -> Result<GpsSample> {
    let logged_at_str: String = row.get("logged_at")?;
    let logged_at = parse_local_ts(&logged_at_str)?;

    let position = coordinate_from_cols(
        Some(row.get("latitude")?),
        Some(row.get("longitude")?),
        row.get("accuracy")?,
    )?
    .ok_or_else(|| conversion_err(AppError::Other("sample without position".into())))?;

    let verdict_str: String = row.get("verdict")?;

    Ok(GpsSample {
        id: row.get("id")?,
        entry_id: row.get("entry_id")?,
        logged_at,
        position,
        distance_m: row.get("distance_m")?,
        verdict: verdict_from_col(&verdict_str)?,
    })
}

// ---------------------------------------------------------------
// Projects
// ---------------------------------------------------------------

pub fn insert_project(
    conn: &Connection,
    name: &str,
    company: &str,
    address: &str,
    coordinate: Option<Coordinate>,
    radius_m: Option<f64>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO projects (name, company, address, latitude, longitude, radius_m, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            name,
            company,
            address,
            coordinate.map(|c| c.latitude),
            coordinate.map(|c| c.longitude),
            radius_m,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_project(conn: &Connection, project: &Project) -> AppResult<()> {
    conn.execute(
        "UPDATE projects
         SET name = ?1, company = ?2, address = ?3,
             latitude = ?4, longitude = ?5, radius_m = ?6
         WHERE id = ?7",
        params![
            project.name,
            project.company,
            project.address,
            project.coordinate.map(|c| c.latitude),
            project.coordinate.map(|c| c.longitude),
            project.radius_m,
            project.id,
        ],
    )?;
    Ok(())
}

pub fn delete_project(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM projects WHERE id = ?", [id])?;
    Ok(())
}

pub fn load_projects(pool: &mut DbPool) -> AppResult<Vec<Project>> {
    let mut stmt = pool
        .conn
        .prepare("SELECT * FROM projects ORDER BY company ASC, name ASC")?;

    let rows = stmt.query_map([], map_project_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_project_by_id(conn: &Connection, id: i64) -> AppResult<Project> {
    let mut stmt = conn.prepare("SELECT * FROM projects WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], map_project_row)?;

    match rows.next() {
        Some(p) => Ok(p?),
        None => Err(AppError::ProjectNotFound(format!("#{}", id))),
    }
}

/// Resolve a CLI project reference: a numeric id, or an exact
/// (case-insensitive) project name.
pub fn find_project(conn: &Connection, reference: &str) -> AppResult<Project> {
    if let Ok(id) = reference.parse::<i64>() {
        return load_project_by_id(conn, id);
    }

    let mut stmt =
        conn.prepare("SELECT * FROM projects WHERE name = ?1 COLLATE NOCASE LIMIT 1")?;
    let mut rows = stmt.query_map([reference], map_project_row)?;

    match rows.next() {
        Some(p) => Ok(p?),
        None => Err(AppError::ProjectNotFound(reference.to_string())),
    }
}

pub fn project_entry_count(conn: &Connection, project_id: i64) -> AppResult<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM entries WHERE project_id = ?1",
        [project_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ---------------------------------------------------------------
// Clock entries
// ---------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub fn insert_entry(
    conn: &Connection,
    project_id: i64,
    note: &str,
    at: DateTime<Local>,
    position: &Coordinate,
    distance_m: Option<f64>,
    verdict: ComplianceVerdict,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO entries (project_id, status, note, date, clock_in_at,
                              clock_in_lat, clock_in_lon, clock_in_accuracy,
                              clock_in_distance_m, clock_in_verdict, created_at)
         VALUES (?1, 'open', ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            project_id,
            note,
            at.format("%Y-%m-%d").to_string(),
            at.to_rfc3339(),
            position.latitude,
            position.longitude,
            position.accuracy,
            distance_m,
            verdict.to_db_str(),
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The single open entry, if any. The clock-in path refuses to create a
/// second one, so "the most recent open" and "the only open" coincide.
pub fn open_entry(pool: &mut DbPool) -> AppResult<Option<ClockEntry>> {
    let mut stmt = pool.conn.prepare(
        "SELECT * FROM entries
         WHERE status = 'open'
         ORDER BY clock_in_at DESC
         LIMIT 1",
    )?;

    let mut rows = stmt.query_map([], map_entry_row)?;
    match rows.next() {
        Some(e) => Ok(Some(e?)),
        None => Ok(None),
    }
}

pub fn load_entry_by_id(conn: &Connection, id: i64) -> AppResult<ClockEntry> {
    let mut stmt = conn.prepare("SELECT * FROM entries WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], map_entry_row)?;

    match rows.next() {
        Some(e) => Ok(e?),
        None => Err(AppError::EntryClosed(id)),
    }
}

pub fn entry_status(conn: &Connection, id: i64) -> AppResult<Option<EntryStatus>> {
    use rusqlite::OptionalExtension;

    let status: Option<String> = conn
        .query_row("SELECT status FROM entries WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()?;

    Ok(status.and_then(|s| EntryStatus::from_db_str(&s)))
}

/// Close an open entry with the captured clock-out fix. The status guard in
/// the WHERE clause makes the mutation a no-op when the entry was closed in
/// the meantime; that case surfaces as an error instead of silently
/// re-closing.
#[allow(clippy::too_many_arguments)]
pub fn close_entry(
    conn: &Connection,
    id: i64,
    at: DateTime<Local>,
    position: &Coordinate,
    distance_m: Option<f64>,
    verdict: ComplianceVerdict,
    total_minutes: i64,
) -> AppResult<()> {
    let updated = conn.execute(
        "UPDATE entries
         SET status = 'closed',
             clock_out_at = ?1,
             clock_out_lat = ?2, clock_out_lon = ?3, clock_out_accuracy = ?4,
             clock_out_distance_m = ?5, clock_out_verdict = ?6,
             total_minutes = ?7
         WHERE id = ?8 AND status = 'open'",
        params![
            at.to_rfc3339(),
            position.latitude,
            position.longitude,
            position.accuracy,
            distance_m,
            verdict.to_db_str(),
            total_minutes,
            id,
        ],
    )?;

    if updated == 0 {
        return Err(AppError::EntryClosed(id));
    }
    Ok(())
}

pub fn load_entries(
    pool: &mut DbPool,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<ClockEntry>> {
    let conn = &mut pool.conn;
    let mut entries = Vec::new();

    match bounds {
        None => {
            let mut stmt = conn.prepare(
                "SELECT * FROM entries
                 ORDER BY clock_in_at ASC",
            )?;

            let rows = stmt.query_map([], map_entry_row)?;
            for r in rows {
                entries.push(r?);
            }
        }
        Some((start, end)) => {
            let start_str = start.format("%Y-%m-%d").to_string();
            let end_str = end.format("%Y-%m-%d").to_string();

            let mut stmt = conn.prepare(
                "SELECT * FROM entries
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY clock_in_at ASC",
            )?;

            let rows = stmt.query_map(params![start_str, end_str], map_entry_row)?;
            for r in rows {
                entries.push(r?);
            }
        }
    }

    Ok(entries)
}

// ---------------------------------------------------------------
// Background GPS samples
// ---------------------------------------------------------------

pub fn insert_gps_sample(
    conn: &Connection,
    entry_id: i64,
    at: DateTime<Local>,
    position: &Coordinate,
    distance_m: Option<f64>,
    verdict: ComplianceVerdict,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO gps_log (entry_id, logged_at, latitude, longitude, accuracy, distance_m, verdict)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry_id,
            at.to_rfc3339(),
            position.latitude,
            position.longitude,
            position.accuracy,
            distance_m,
            verdict.to_db_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_gps_samples(pool: &mut DbPool, entry_id: i64) -> AppResult<Vec<GpsSample>> {
    let mut stmt = pool.conn.prepare(
        "SELECT * FROM gps_log
         WHERE entry_id = ?1
         ORDER BY logged_at ASC",
    )?;

    let rows = stmt.query_map([entry_id], map_sample_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn gps_sample_count(conn: &Connection, entry_id: i64) -> AppResult<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM gps_log WHERE entry_id = ?1",
        [entry_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

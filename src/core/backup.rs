//! Full-data backup and restore.
//!
//! A backup is a JSON snapshot of every table (projects, entries, position
//! samples), optionally wrapped in a zip or tar.gz archive. Restore merges
//! a snapshot into the current database: rows whose id already exists are
//! skipped, never overwritten.

use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::ui::prompt::confirm;
use chrono::Local;
use clap::ValueEnum;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

#[derive(Clone, Debug, ValueEnum)]
pub enum ArchiveFormat {
    Zip,
    Targz,
}

// ---------------------------------------------------------------
// Snapshot layout (raw table rows, schema-stable on purpose)
// ---------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_m: Option<f64>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: i64,
    pub project_id: i64,
    pub status: String,
    pub note: String,
    pub date: String,
    pub clock_in_at: String,
    pub clock_in_lat: f64,
    pub clock_in_lon: f64,
    pub clock_in_accuracy: Option<f64>,
    pub clock_in_distance_m: Option<f64>,
    pub clock_in_verdict: String,
    pub clock_out_at: Option<String>,
    pub clock_out_lat: Option<f64>,
    pub clock_out_lon: Option<f64>,
    pub clock_out_accuracy: Option<f64>,
    pub clock_out_distance_m: Option<f64>,
    pub clock_out_verdict: Option<String>,
    pub total_minutes: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SampleRecord {
    pub id: i64,
    pub entry_id: i64,
    pub logged_at: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub distance_m: Option<f64>,
    pub verdict: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub exported_at: String,
    pub projects: Vec<ProjectRecord>,
    pub entries: Vec<EntryRecord>,
    pub gps_log: Vec<SampleRecord>,
}

const SNAPSHOT_VERSION: u32 = 1;

pub struct BackupLogic;

impl BackupLogic {
    pub fn backup(
        pool: &mut DbPool,
        _cfg: &Config,
        dest_file: &str,
        compress: Option<ArchiveFormat>,
    ) -> AppResult<()> {
        let dest = Path::new(dest_file);

        // Ensure destination folder exists
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // If destination file exists → ask confirmation
        if dest.exists() {
            warning(format!("The file '{}' already exists.", dest.display()));
            if !confirm("Overwrite?")? {
                info("Backup cancelled by user.");
                return Ok(());
            }
        }

        let snapshot = load_snapshot(&pool.conn)?;
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| AppError::Backup(format!("serialization failed: {}", e)))?;

        fs::write(dest, json.as_bytes())?;
        success(format!(
            "Backup created: {} ({} projects, {} entries, {} samples)",
            dest.display(),
            snapshot.projects.len(),
            snapshot.entries.len(),
            snapshot.gps_log.len()
        ));

        // Optional compression
        let final_path = match &compress {
            Some(format) => {
                let compressed = compress_backup(dest, format)?;

                if compressed != dest.to_path_buf() {
                    // remove uncompressed copy
                    if let Err(e) = fs::remove_file(dest) {
                        warning(format!("Failed to remove uncompressed backup: {}", e));
                    }
                }

                compressed
            }
            None => dest.to_path_buf(),
        };

        ttlog(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress.is_some() {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        )?;

        Ok(())
    }

    pub fn restore(pool: &mut DbPool, src_file: &str, assume_yes: bool) -> AppResult<()> {
        let src = Path::new(src_file);
        if !src.exists() {
            return Err(AppError::Restore(format!(
                "backup file not found: {}",
                src.display()
            )));
        }

        let snapshot = read_snapshot(src)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(AppError::Restore(format!(
                "snapshot version {} is newer than this tool supports",
                snapshot.version
            )));
        }

        info(format!(
            "Snapshot from {}: {} projects, {} entries, {} samples.",
            snapshot.exported_at,
            snapshot.projects.len(),
            snapshot.entries.len(),
            snapshot.gps_log.len()
        ));

        if !assume_yes {
            warning("Existing rows are kept; only missing rows are imported.");
            if !confirm("Import this snapshot?")? {
                info("Restore cancelled by user.");
                return Ok(());
            }
        }

        let (inserted, skipped) = merge_snapshot(&pool.conn, &snapshot)?;

        ttlog(
            &pool.conn,
            "restore",
            &src.to_string_lossy(),
            &format!("Imported {} row(s), skipped {} existing", inserted, skipped),
        )?;

        success(format!(
            "Restore completed: {} row(s) imported, {} already present.",
            inserted, skipped
        ));
        Ok(())
    }
}

// ---------------------------------------------------------------
// Snapshot I/O
// ---------------------------------------------------------------

fn load_snapshot(conn: &Connection) -> AppResult<Snapshot> {
    let mut projects = Vec::new();
    let mut stmt = conn.prepare("SELECT * FROM projects ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(ProjectRecord {
            id: row.get("id")?,
            name: row.get("name")?,
            company: row.get("company")?,
            address: row.get("address")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            radius_m: row.get("radius_m")?,
            created_at: row.get("created_at")?,
        })
    })?;
    for r in rows {
        projects.push(r?);
    }

    let mut entries = Vec::new();
    let mut stmt = conn.prepare("SELECT * FROM entries ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(EntryRecord {
            id: row.get("id")?,
            project_id: row.get("project_id")?,
            status: row.get("status")?,
            note: row.get("note")?,
            date: row.get("date")?,
            clock_in_at: row.get("clock_in_at")?,
            clock_in_lat: row.get("clock_in_lat")?,
            clock_in_lon: row.get("clock_in_lon")?,
            clock_in_accuracy: row.get("clock_in_accuracy")?,
            clock_in_distance_m: row.get("clock_in_distance_m")?,
            clock_in_verdict: row.get("clock_in_verdict")?,
            clock_out_at: row.get("clock_out_at")?,
            clock_out_lat: row.get("clock_out_lat")?,
            clock_out_lon: row.get("clock_out_lon")?,
            clock_out_accuracy: row.get("clock_out_accuracy")?,
            clock_out_distance_m: row.get("clock_out_distance_m")?,
            clock_out_verdict: row.get("clock_out_verdict")?,
            total_minutes: row.get("total_minutes")?,
            created_at: row.get("created_at")?,
        })
    })?;
    for r in rows {
        entries.push(r?);
    }

    let mut gps_log = Vec::new();
    let mut stmt = conn.prepare("SELECT * FROM gps_log ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(SampleRecord {
            id: row.get("id")?,
            entry_id: row.get("entry_id")?,
            logged_at: row.get("logged_at")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            accuracy: row.get("accuracy")?,
            distance_m: row.get("distance_m")?,
            verdict: row.get("verdict")?,
        })
    })?;
    for r in rows {
        gps_log.push(r?);
    }

    Ok(Snapshot {
        version: SNAPSHOT_VERSION,
        exported_at: Local::now().to_rfc3339(),
        projects,
        entries,
        gps_log,
    })
}

fn read_snapshot(src: &Path) -> AppResult<Snapshot> {
    let name = src.to_string_lossy().to_ascii_lowercase();

    let json = if name.ends_with(".zip") {
        let file = fs::File::open(src)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| AppError::Restore(format!("cannot open zip archive: {}", e)))?;
        let mut inner = archive
            .by_index(0)
            .map_err(|e| AppError::Restore(format!("empty or unreadable archive: {}", e)))?;
        let mut buf = String::new();
        inner.read_to_string(&mut buf)?;
        buf
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        let file = fs::File::open(src)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let mut buf = String::new();

        let mut found = false;
        for entry in archive
            .entries()
            .map_err(|e| AppError::Restore(format!("cannot read tar archive: {}", e)))?
        {
            let mut entry =
                entry.map_err(|e| AppError::Restore(format!("corrupt tar entry: {}", e)))?;
            let is_json = entry
                .path()
                .map(|p| p.extension().is_some_and(|e| e == "json"))
                .unwrap_or(false);
            if is_json {
                entry.read_to_string(&mut buf)?;
                found = true;
                break;
            }
        }
        if !found {
            return Err(AppError::Restore("no snapshot found in archive".into()));
        }
        buf
    } else {
        fs::read_to_string(src)?
    };

    serde_json::from_str(&json).map_err(|e| AppError::Restore(format!("invalid snapshot: {}", e)))
}

/// Compress a backup into the requested archive format.
fn compress_backup(path: &Path, format: &ArchiveFormat) -> AppResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::Backup("invalid backup path".into()))?
        .to_string_lossy()
        .to_string();

    match format {
        ArchiveFormat::Zip => {
            let zip_path = path.with_extension("zip");
            let file = fs::File::create(&zip_path)?;
            let mut zip = ZipWriter::new(file);

            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            let mut f = fs::File::open(path)?;
            zip.start_file(&file_name, options)
                .map_err(std::io::Error::other)?;
            std::io::copy(&mut f, &mut zip)?;
            zip.finish().map_err(std::io::Error::other)?;

            info(format!("Compressed: {}", zip_path.display()));
            Ok(zip_path)
        }
        ArchiveFormat::Targz => {
            let tgz_path = path.with_extension("tar.gz");
            let file = fs::File::create(&tgz_path)?;
            let enc = GzEncoder::new(file, Compression::default());
            let mut tarball = tar::Builder::new(enc);

            tarball.append_path_with_name(path, &file_name)?;
            tarball
                .into_inner()
                .and_then(|enc| enc.finish())
                .map_err(|e| AppError::Backup(format!("tar.gz write failed: {}", e)))?;

            info(format!("Compressed: {}", tgz_path.display()));
            Ok(tgz_path)
        }
    }
}

// ---------------------------------------------------------------
// Merge
// ---------------------------------------------------------------

fn row_exists(conn: &Connection, table: &str, id: i64) -> AppResult<bool> {
    let sql = format!("SELECT 1 FROM {} WHERE id = ?1 LIMIT 1", table);
    let found: Option<i64> = conn.query_row(&sql, [id], |row| row.get(0)).optional()?;
    Ok(found.is_some())
}

fn merge_snapshot(conn: &Connection, snapshot: &Snapshot) -> AppResult<(usize, usize)> {
    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for p in &snapshot.projects {
        if row_exists(conn, "projects", p.id)? {
            skipped += 1;
            continue;
        }
        conn.execute(
            "INSERT INTO projects (id, name, company, address, latitude, longitude, radius_m, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                p.id, p.name, p.company, p.address, p.latitude, p.longitude, p.radius_m,
                p.created_at
            ],
        )?;
        inserted += 1;
    }

    for e in &snapshot.entries {
        if row_exists(conn, "entries", e.id)? {
            skipped += 1;
            continue;
        }
        conn.execute(
            "INSERT INTO entries (id, project_id, status, note, date, clock_in_at,
                                  clock_in_lat, clock_in_lon, clock_in_accuracy,
                                  clock_in_distance_m, clock_in_verdict,
                                  clock_out_at, clock_out_lat, clock_out_lon,
                                  clock_out_accuracy, clock_out_distance_m,
                                  clock_out_verdict, total_minutes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                     ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            params![
                e.id,
                e.project_id,
                e.status,
                e.note,
                e.date,
                e.clock_in_at,
                e.clock_in_lat,
                e.clock_in_lon,
                e.clock_in_accuracy,
                e.clock_in_distance_m,
                e.clock_in_verdict,
                e.clock_out_at,
                e.clock_out_lat,
                e.clock_out_lon,
                e.clock_out_accuracy,
                e.clock_out_distance_m,
                e.clock_out_verdict,
                e.total_minutes,
                e.created_at,
            ],
        )?;
        inserted += 1;
    }

    for s in &snapshot.gps_log {
        if row_exists(conn, "gps_log", s.id)? {
            skipped += 1;
            continue;
        }
        conn.execute(
            "INSERT INTO gps_log (id, entry_id, logged_at, latitude, longitude, accuracy, distance_m, verdict)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                s.id,
                s.entry_id,
                s.logged_at,
                s.latitude,
                s.longitude,
                s.accuracy,
                s.distance_m,
                s.verdict,
            ],
        )?;
        inserted += 1;
    }

    Ok((inserted, skipped))
}

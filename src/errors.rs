//! Unified application error type.
//! All modules (db, core, cli, geo) return AppError to keep the error
//! handling consistent and easy to manage.

use crate::geo::provider::GeoError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Geolocation
    // ---------------------------
    #[error("{0}")]
    Geo(#[from] GeoError),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    // ---------------------------
    // Clock logic errors
    // ---------------------------
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Already clocked in (open entry #{0}); clock out first")]
    AlreadyClockedIn(i64),

    #[error("No open entry: you are not clocked in")]
    NoOpenEntry,

    #[error("Entry #{0} not found or already closed")]
    EntryClosed(i64),

    #[error("Outside the allowed radius: {distance_m:.0} m from the project location (allowed {radius_m:.0} m)")]
    OutsideRadius { distance_m: f64, radius_m: f64 },

    #[error("Invalid clock-out transition: cannot {event} while {from}")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export / backup errors
    // ---------------------------
    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Restore error: {0}")]
    Restore(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

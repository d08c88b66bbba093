//! Database row models that have no richer domain counterpart.
//! These are thin wrappers around SQLite rows.

use crate::models::coordinate::Coordinate;
use crate::models::verdict::ComplianceVerdict;
use chrono::{DateTime, Local};
use serde::Serialize;

/// One periodic background position sample taken while clocked in.
#[derive(Debug, Clone, Serialize)]
pub struct GpsSample {
    pub id: i64,
    pub entry_id: i64,
    pub logged_at: DateTime<Local>,
    pub position: Coordinate,
    pub distance_m: Option<f64>,
    pub verdict: ComplianceVerdict,
}

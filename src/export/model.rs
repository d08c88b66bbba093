// src/export/model.rs

use crate::models::entry::ClockEntry;
use crate::models::project::Project;
use crate::utils::formatting::{fmt_distance, fmt_hours};
use serde::Serialize;
use std::collections::BTreeMap;

/// Flat per-session row for all export formats.
#[derive(Serialize, Clone, Debug)]
pub struct EntryExport {
    pub id: i64,
    pub date: String,
    pub company: String,
    pub project: String,
    pub clock_in: String,
    pub clock_out: String,
    pub hours: Option<f64>,
    pub distance_m: Option<f64>,
    pub verdict: String,
    pub status: String,
}

/// Header for CSV / JSON / XLSX / PDF
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "id",
        "date",
        "company",
        "project",
        "clock_in",
        "clock_out",
        "hours",
        "distance_m",
        "verdict",
        "status",
    ]
}

/// Build an export row from a loaded entry; project names are resolved via
/// the id → (company, name) map (deleted projects render as such).
pub(crate) fn entry_export(
    entry: &ClockEntry,
    names: &BTreeMap<i64, (String, String)>,
) -> EntryExport {
    let (company, project) = names
        .get(&entry.project_id)
        .cloned()
        .unwrap_or_else(|| ("(deleted)".to_string(), "(deleted)".to_string()));

    // The clock-out verdict is what the report audits; for a still-open
    // session fall back to the clock-in one.
    let verdict = entry
        .clock_out_verdict
        .unwrap_or(entry.clock_in_verdict)
        .to_db_str()
        .to_string();

    let distance_m = entry.clock_out_distance_m.or(entry.clock_in_distance_m);

    EntryExport {
        id: entry.id,
        date: entry.date_str(),
        company,
        project,
        clock_in: entry.in_time_str(),
        clock_out: entry.out_time_str(),
        hours: entry.hours(),
        distance_m,
        verdict,
        status: entry.status.to_db_str().to_string(),
    }
}

pub(crate) fn name_map(projects: &[Project]) -> BTreeMap<i64, (String, String)> {
    projects
        .iter()
        .map(|p| (p.id, (p.company.clone(), p.name.clone())))
        .collect()
}

/// Convert a row into strings (for PDF / XLSX rendering).
pub(crate) fn entry_to_row(e: &EntryExport) -> Vec<String> {
    vec![
        e.id.to_string(),
        e.date.clone(),
        e.company.clone(),
        e.project.clone(),
        e.clock_in.clone(),
        e.clock_out.clone(),
        fmt_hours(e.hours),
        fmt_distance(e.distance_m),
        e.verdict.clone(),
        e.status.clone(),
    ]
}

pub(crate) fn entries_to_table(entries: &[EntryExport]) -> Vec<Vec<String>> {
    entries.iter().map(entry_to_row).collect()
}

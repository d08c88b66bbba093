// src/export/logic.rs

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{load_entries, load_projects};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::model::{EntryExport, entry_export, name_map};
use crate::export::range::parse_range;
use crate::ui::messages::warning;
use crate::utils::date::month_name;

use crate::export::json_csv::{export_csv, export_json};
use crate::export::pdf_export::export_pdf;
use crate::export::xlsx::export_xlsx;
use chrono::NaiveDate;
use std::io;
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the session report.
    ///
    /// - `format`: csv | json | xlsx | pdf
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"` or expressions like:
    ///   - `YYYY`
    ///   - `YYYY-MM`
    ///   - `YYYY-MM-DD`
    ///   - `YYYY:YYYY`
    ///   - `YYYY-MM:YYYY-MM`
    ///   - `YYYY-MM-DD:YYYY-MM-DD`
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        range: &Option<String>,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::from(io::Error::other(format!(
                "Output file path must be absolute: {file}"
            ))));
        }

        ensure_writable(path, force)?;

        let date_bounds: Option<(NaiveDate, NaiveDate)> = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        let rows = load_export_rows(pool, date_bounds)?;

        if rows.is_empty() {
            warning("No entries found for selected range.");
            return Ok(());
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
            ExportFormat::Xlsx => export_xlsx(&rows, path)?,
            ExportFormat::Pdf => {
                let title = build_pdf_title(range);
                export_pdf(&rows, path, &title)?
            }
        }

        ttlog(
            &pool.conn,
            "export",
            file,
            &format!("Exported {} entr(ies)", rows.len()),
        )?;

        Ok(())
    }
}

/// PDF title derived from the selected period.
fn build_pdf_title(period: &Option<String>) -> String {
    let Some(p) = period.as_ref() else {
        return "Recorded sessions".to_string();
    };

    match p.len() {
        4 => {
            // YYYY
            format!("Recorded sessions for year {}", p)
        }

        7 => {
            // YYYY-MM
            let parts: Vec<&str> = p.split('-').collect();
            if parts.len() == 2 {
                format!("Recorded sessions for {} {}", month_name(parts[1]), parts[0])
            } else {
                "Recorded sessions".to_string()
            }
        }

        10 => {
            // YYYY-MM-DD
            format!("Recorded sessions for date {}", p)
        }

        21 => {
            // YYYY-MM-DD:YYYY-MM-DD
            let parts: Vec<&str> = p.split(':').collect();
            if parts.len() == 2 {
                format!("Recorded sessions from {} to {}", parts[0], parts[1])
            } else {
                "Recorded sessions".to_string()
            }
        }

        _ => "Recorded sessions".to_string(),
    }
}

/// Load entries and flatten them for export, with project names resolved.
fn load_export_rows(
    pool: &mut DbPool,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<EntryExport>> {
    let projects = load_projects(pool)?;
    let names = name_map(&projects);

    let entries = load_entries(pool, bounds)?;

    Ok(entries.iter().map(|e| entry_export(e, &names)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_title_variants() {
        assert_eq!(build_pdf_title(&None), "Recorded sessions");
        assert_eq!(
            build_pdf_title(&Some("2025".into())),
            "Recorded sessions for year 2025"
        );
        assert_eq!(
            build_pdf_title(&Some("2025-09".into())),
            "Recorded sessions for September 2025"
        );
        assert_eq!(
            build_pdf_title(&Some("2025-09-01:2025-09-30".into())),
            "Recorded sessions from 2025-09-01 to 2025-09-30"
        );
    }
}

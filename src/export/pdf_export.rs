// src/export/pdf_export.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{entries_to_table, get_headers};
use crate::export::pdf::PdfManager;
use crate::export::{EntryExport, notify_export_success};
use crate::ui::messages::info;
use chrono::Local;
use std::io;
use std::path::Path;

/// PDF export using PdfManager and the generated table.
pub(crate) fn export_pdf(entries: &[EntryExport], path: &Path, title: &str) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let headers = get_headers();
    let data_vec = entries_to_table(entries);
    let footer = format!("Generated by geoclock on {}", Local::now().format("%Y-%m-%d %H:%M"));

    let mut pdf = PdfManager::new();
    pdf.write_table(title, &footer, &headers, &data_vec);

    pdf.save(path)
        .map_err(|e| AppError::from(io::Error::other(format!("PDF export error: {e}"))))?;

    notify_export_success("PDF", path);
    Ok(())
}

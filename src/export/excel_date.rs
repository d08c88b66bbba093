// src/export/excel_date.rs

use chrono::{NaiveDate, NaiveTime, Timelike};

/// Interpret an exported cell as a date or time-of-day, returning the Excel
/// serial value plus the number format to apply. Only the shapes this
/// exporter emits are recognized: `YYYY-MM-DD` dates and `HH:MM` times.
pub(crate) fn parse_to_excel_date(s: &str) -> Option<(&'static str, f64)> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(("yyyy-mm-dd", date_to_excel_serial(&d)));
    }

    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M") {
        let seconds = t.num_seconds_from_midnight() as f64;
        return Some(("hh:mm", seconds / 86400.0));
    }

    None
}

fn date_to_excel_serial(d: &NaiveDate) -> f64 {
    // Excel's day zero, with the fictitious 1900 leap day accounted for.
    let excel_epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    (*d - excel_epoch).num_days() as f64
}

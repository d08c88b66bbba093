//! Time utilities: duration computations and formatting.

use chrono::{DateTime, Local};

pub fn minutes_between(start: DateTime<Local>, end: DateTime<Local>) -> i64 {
    (end - start).num_minutes()
}

/// `HH:MM` rendering of a minute count (negative values keep the sign).
pub fn format_minutes(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}

/// `HH:MM:SS` rendering of elapsed seconds, for the live status card.
pub fn format_elapsed(seconds: i64) -> String {
    let s = seconds.max(0);
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_formatting() {
        assert_eq!(format_minutes(0), "00:00");
        assert_eq!(format_minutes(450), "07:30");
        assert_eq!(format_minutes(-75), "-01:15");
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(3671), "01:01:11");
        assert_eq!(format_elapsed(-5), "00:00:00");
    }
}

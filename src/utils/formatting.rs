//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn mins2readable(mins: i64, want_sign: bool, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 && want_sign {
        "-"
    } else {
        ""
    };

    if short {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// `"132 m"` for a known distance, `"-"` when it could not be computed.
pub fn fmt_distance(distance_m: Option<f64>) -> String {
    match distance_m {
        Some(d) => format!("{:.0} m", d.round()),
        None => "-".to_string(),
    }
}

/// `"7.50"` for a closed entry, `"-"` for an open one.
pub fn fmt_hours(hours: Option<f64>) -> String {
    match hours {
        Some(h) => format!("{:.2}", h),
        None => "-".to_string(),
    }
}

/// Returns a textual label and an ANSI color for a verdict DB code.
/// Used in list outputs and tests.
pub fn describe_verdict(code: &str) -> (String, &'static str) {
    match code {
        "within" => ("within radius".into(), "\x1b[32m"),
        "outside" => ("OUTSIDE RADIUS".into(), "\x1b[31m"),
        "indeterminate" => ("no geofence".into(), "\x1b[90m"),
        other => (other.to_string(), "\x1b[0m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_minutes() {
        assert_eq!(mins2readable(450, false, false), "07h 30m");
        assert_eq!(mins2readable(450, true, true), "+07:30");
        assert_eq!(mins2readable(-30, true, false), "-00h 30m");
    }

    #[test]
    fn distance_rendering() {
        assert_eq!(fmt_distance(Some(131.7)), "132 m");
        assert_eq!(fmt_distance(None), "-");
    }

    #[test]
    fn verdict_labels() {
        assert_eq!(describe_verdict("within").0, "within radius");
        assert_eq!(describe_verdict("outside").1, "\x1b[31m");
        assert_eq!(describe_verdict("indeterminate").0, "no geofence");
    }
}

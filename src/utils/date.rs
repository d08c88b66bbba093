use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}

/// Bounds of a single period expression: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
fn single_period_bounds(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    match p.len() {
        4 => {
            let y: i32 = p.parse().map_err(|_| format!("Invalid year: {}", p))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or(format!("Invalid year: {}", p))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or(format!("Invalid year: {}", p))?;
            Ok((d1, d2))
        }
        7 => {
            let y: i32 = p[0..4].parse().map_err(|_| format!("Invalid period: {}", p))?;
            let m: u32 = p[5..7].parse().map_err(|_| format!("Invalid period: {}", p))?;
            let last = month_last_day(y, m).ok_or(format!("Invalid month: {}", p))?;

            let d1 = NaiveDate::from_ymd_opt(y, m, 1).ok_or(format!("Invalid period: {}", p))?;
            let d2 = NaiveDate::from_ymd_opt(y, m, last).ok_or(format!("Invalid period: {}", p))?;
            Ok((d1, d2))
        }
        10 => {
            let d = parse_date(p).ok_or(format!("Invalid date: {}", p))?;
            Ok((d, d))
        }
        _ => Err(format!("Invalid period: {}", p)),
    }
}

/// Bounds of a `--period` expression: a single period, or two joined with
/// `:` (start comes from the first, end from the second).
pub fn period_bounds(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    if let Some((start_raw, end_raw)) = p.split_once(':') {
        let (start, _) = single_period_bounds(start_raw.trim())?;
        let (_, end) = single_period_bounds(end_raw.trim())?;
        return Ok((start, end));
    }
    single_period_bounds(p)
}

/// Bounds of the current month (the default listing period).
pub fn current_month_bounds() -> (NaiveDate, NaiveDate) {
    let t = today();
    let last = month_last_day(t.year(), t.month()).unwrap_or(28);
    (
        NaiveDate::from_ymd_opt(t.year(), t.month(), 1).unwrap_or(t),
        NaiveDate::from_ymd_opt(t.year(), t.month(), last).unwrap_or(t),
    )
}

/// English month name from a `"MM"` string (used in report titles).
pub fn month_name(mm: &str) -> &'static str {
    match mm {
        "01" => "January",
        "02" => "February",
        "03" => "March",
        "04" => "April",
        "05" => "May",
        "06" => "June",
        "07" => "July",
        "08" => "August",
        "09" => "September",
        "10" => "October",
        "11" => "November",
        "12" => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_bounds() {
        let (s, e) = period_bounds("2025").unwrap();
        assert_eq!(s, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(e, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn month_bounds_respect_leap_years() {
        let (_, e) = period_bounds("2024-02").unwrap();
        assert_eq!(e, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, e) = period_bounds("2025-02").unwrap();
        assert_eq!(e, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn interval_bounds() {
        let (s, e) = period_bounds("2024-09:2025-09").unwrap();
        assert_eq!(s, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(e, NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
    }

    #[test]
    fn invalid_period_rejected() {
        assert!(period_bounds("2025-9").is_err());
        assert!(period_bounds("last week").is_err());
    }
}

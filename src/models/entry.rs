use crate::models::coordinate::Coordinate;
use crate::models::verdict::ComplianceVerdict;
use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryStatus {
    Open,
    Closed,
}

impl EntryStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EntryStatus::Open => "open",
            EntryStatus::Closed => "closed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(EntryStatus::Open),
            "closed" => Some(EntryStatus::Closed),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, EntryStatus::Open)
    }
}

/// One work session: created open at clock-in, mutated exactly once at
/// clock-out (total duration computed then), immutable afterwards.
///
/// Both verdicts are derived purely from the recorded coordinate and the
/// project's geofence at the moment of recording.
#[derive(Debug, Clone, Serialize)]
pub struct ClockEntry {
    pub id: i64,
    pub project_id: i64,
    pub status: EntryStatus,
    pub note: String,

    pub clock_in_at: DateTime<Local>,
    pub clock_in: Coordinate,
    pub clock_in_distance_m: Option<f64>,
    pub clock_in_verdict: ComplianceVerdict,

    pub clock_out_at: Option<DateTime<Local>>,
    pub clock_out: Option<Coordinate>,
    pub clock_out_distance_m: Option<f64>,
    pub clock_out_verdict: Option<ComplianceVerdict>,

    pub total_minutes: Option<i64>,
    pub created_at: String,
}

impl ClockEntry {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    pub fn date_str(&self) -> String {
        self.clock_in_at.format("%Y-%m-%d").to_string()
    }

    pub fn in_time_str(&self) -> String {
        self.clock_in_at.format("%H:%M").to_string()
    }

    pub fn out_time_str(&self) -> String {
        match self.clock_out_at {
            Some(t) => t.format("%H:%M").to_string(),
            None => "-".to_string(),
        }
    }

    /// Minutes elapsed since clock-in, for the open-entry status card.
    pub fn elapsed_minutes(&self, now: DateTime<Local>) -> i64 {
        (now - self.clock_in_at).num_minutes().max(0)
    }

    /// Worked hours of a closed entry, e.g. `7.50`.
    pub fn hours(&self) -> Option<f64> {
        self.total_minutes.map(|m| m as f64 / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(total_minutes: Option<i64>) -> ClockEntry {
        ClockEntry {
            id: 1,
            project_id: 1,
            status: if total_minutes.is_some() {
                EntryStatus::Closed
            } else {
                EntryStatus::Open
            },
            note: String::new(),
            clock_in_at: Local.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap(),
            clock_in: Coordinate::new(52.0, 5.0).unwrap(),
            clock_in_distance_m: Some(10.0),
            clock_in_verdict: ComplianceVerdict::WithinRadius,
            clock_out_at: None,
            clock_out: None,
            clock_out_distance_m: None,
            clock_out_verdict: None,
            total_minutes,
            created_at: String::new(),
        }
    }

    #[test]
    fn status_roundtrip() {
        assert_eq!(EntryStatus::from_db_str("open"), Some(EntryStatus::Open));
        assert_eq!(
            EntryStatus::from_db_str("closed"),
            Some(EntryStatus::Closed)
        );
        assert_eq!(EntryStatus::from_db_str("paused"), None);
    }

    #[test]
    fn hours_from_minutes() {
        assert_eq!(entry(Some(450)).hours(), Some(7.5));
        assert_eq!(entry(None).hours(), None);
    }

    #[test]
    fn elapsed_never_negative() {
        let e = entry(None);
        let before = Local.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
        assert_eq!(e.elapsed_minutes(before), 0);

        let after = Local.with_ymd_and_hms(2025, 9, 1, 10, 30, 0).unwrap();
        assert_eq!(e.elapsed_minutes(after), 90);
    }
}

//! Aggregation of completed sessions for the summary listing.

use crate::models::entry::ClockEntry;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
pub struct ProjectTotal {
    pub company: String,
    pub project: String,
    pub completed_sessions: usize,
    pub total_minutes: i64,
}

#[derive(Debug, Default)]
pub struct Totals {
    pub per_project: Vec<ProjectTotal>,
    pub completed_sessions: usize,
    pub open_sessions: usize,
    pub total_minutes: i64,
}

impl Totals {
    pub fn total_hours(&self) -> f64 {
        self.total_minutes as f64 / 60.0
    }
}

/// Sum closed entries per project (open ones are counted but contribute no
/// time). `names` maps project ids to (company, name); entries whose
/// project is gone are grouped under "(deleted)".
pub fn build_totals(entries: &[ClockEntry], names: &BTreeMap<i64, (String, String)>) -> Totals {
    let mut grouped: BTreeMap<i64, ProjectTotal> = BTreeMap::new();
    let mut totals = Totals::default();

    for entry in entries {
        if entry.is_open() {
            totals.open_sessions += 1;
            continue;
        }

        let minutes = entry.total_minutes.unwrap_or(0);
        totals.completed_sessions += 1;
        totals.total_minutes += minutes;

        let slot = grouped.entry(entry.project_id).or_insert_with(|| {
            let (company, project) = names
                .get(&entry.project_id)
                .cloned()
                .unwrap_or_else(|| ("(deleted)".to_string(), "(deleted)".to_string()));
            ProjectTotal {
                company,
                project,
                completed_sessions: 0,
                total_minutes: 0,
            }
        });

        slot.completed_sessions += 1;
        slot.total_minutes += minutes;
    }

    totals.per_project = grouped.into_values().collect();
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::coordinate::Coordinate;
    use crate::models::entry::EntryStatus;
    use crate::models::verdict::ComplianceVerdict;
    use chrono::{Local, TimeZone};

    fn entry(project_id: i64, total_minutes: Option<i64>) -> ClockEntry {
        ClockEntry {
            id: 0,
            project_id,
            status: if total_minutes.is_some() {
                EntryStatus::Closed
            } else {
                EntryStatus::Open
            },
            note: String::new(),
            clock_in_at: Local.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap(),
            clock_in: Coordinate::new(52.0, 5.0).unwrap(),
            clock_in_distance_m: None,
            clock_in_verdict: ComplianceVerdict::Indeterminate,
            clock_out_at: None,
            clock_out: None,
            clock_out_distance_m: None,
            clock_out_verdict: None,
            total_minutes,
            created_at: String::new(),
        }
    }

    fn names() -> BTreeMap<i64, (String, String)> {
        let mut m = BTreeMap::new();
        m.insert(1, ("The Global".to_string(), "Kade West".to_string()));
        m.insert(2, ("The Global".to_string(), "Kantoor Noord".to_string()));
        m
    }

    #[test]
    fn sums_closed_entries_per_project() {
        let entries = vec![
            entry(1, Some(480)),
            entry(1, Some(240)),
            entry(2, Some(60)),
            entry(1, None), // open, no time contribution
        ];

        let totals = build_totals(&entries, &names());

        assert_eq!(totals.completed_sessions, 3);
        assert_eq!(totals.open_sessions, 1);
        assert_eq!(totals.total_minutes, 780);
        assert_eq!(totals.total_hours(), 13.0);

        let kade = totals
            .per_project
            .iter()
            .find(|p| p.project == "Kade West")
            .unwrap();
        assert_eq!(kade.completed_sessions, 2);
        assert_eq!(kade.total_minutes, 720);
    }

    #[test]
    fn unknown_project_grouped_as_deleted() {
        let totals = build_totals(&[entry(99, Some(30))], &names());
        assert_eq!(totals.per_project[0].project, "(deleted)");
        assert_eq!(totals.total_minutes, 30);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let totals = build_totals(&[], &names());
        assert_eq!(totals.completed_sessions, 0);
        assert_eq!(totals.total_minutes, 0);
        assert!(totals.per_project.is_empty());
    }
}

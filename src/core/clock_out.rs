//! Clock-out confirmation flow.
//!
//! Closing a session is gated behind an explicit confirmation step: first
//! acquire a fix, then show the user the computed distance and geofence
//! verdict, and only submit after they confirm. The coordinate that was
//! shown is the coordinate that gets stored; there is no second sampling
//! between confirmation and submission, so the recorded verdict always
//! matches what the user saw. Cancelling before confirmation leaves the
//! entry untouched.

use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{close_entry, load_project_by_id, open_entry};
use crate::errors::{AppError, AppResult};
use crate::geo::provider::{GeoError, GeoRequest, LocationProvider};
use crate::models::coordinate::Coordinate;
use crate::models::entry::ClockEntry;
use crate::models::project::Project;
use crate::models::verdict::ComplianceVerdict;
use crate::ui::messages::{info, success, warning};
use crate::ui::prompt::confirm;
use crate::utils::colors::{GREEN, RED, RESET};
use crate::utils::formatting::fmt_distance;
use crate::utils::mins2readable;
use crate::utils::time::minutes_between;
use chrono::Local;

/// The captured fix plus its evaluation, frozen at acquisition time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingClockOut {
    pub coordinate: Coordinate,
    pub distance_m: Option<f64>,
    pub verdict: ComplianceVerdict,
}

#[derive(Debug)]
pub enum FlowState {
    Idle,
    Locating,
    AwaitingConfirmation(PendingClockOut),
    Submitting(PendingClockOut),
    Completed,
    Failed(String),
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::Locating => "locating",
            FlowState::AwaitingConfirmation(_) => "awaiting-confirmation",
            FlowState::Submitting(_) => "submitting",
            FlowState::Completed => "completed",
            FlowState::Failed(_) => "failed",
        }
    }
}

/// State machine for one clock-out attempt:
/// `idle → locating → awaiting-confirmation → submitting → completed|failed`.
pub struct ClockOutFlow {
    state: FlowState,
}

impl Default for ClockOutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockOutFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    fn invalid(&self, event: &'static str) -> AppError {
        AppError::InvalidTransition {
            from: self.state.name(),
            event,
        }
    }

    /// `idle → locating`: the user asked to clock out.
    pub fn begin(&mut self) -> AppResult<()> {
        match self.state {
            FlowState::Idle => {
                self.state = FlowState::Locating;
                Ok(())
            }
            _ => Err(self.invalid("begin")),
        }
    }

    /// `locating → awaiting-confirmation`: a fix arrived. Evaluates it
    /// against the entry's project and freezes the result for display and
    /// eventual submission.
    pub fn fix_acquired(
        &mut self,
        fix: Coordinate,
        project: &Project,
        default_radius_m: f64,
    ) -> AppResult<&PendingClockOut> {
        match self.state {
            FlowState::Locating => {
                let (distance_m, verdict) = project.check_position(&fix, default_radius_m);
                self.state = FlowState::AwaitingConfirmation(PendingClockOut {
                    coordinate: fix,
                    distance_m,
                    verdict,
                });
                match &self.state {
                    FlowState::AwaitingConfirmation(p) => Ok(p),
                    _ => unreachable!(),
                }
            }
            _ => Err(self.invalid("fix_acquired")),
        }
    }

    /// `locating → failed`: the position request failed. The user may retry,
    /// which starts over from idle.
    pub fn location_failed(&mut self, err: &GeoError) -> AppResult<()> {
        match self.state {
            FlowState::Locating => {
                self.state = FlowState::Failed(err.to_string());
                Ok(())
            }
            _ => Err(self.invalid("location_failed")),
        }
    }

    /// `awaiting-confirmation → submitting`: the user confirmed. Returns the
    /// frozen fix so the caller submits exactly what was displayed.
    pub fn confirm(&mut self) -> AppResult<PendingClockOut> {
        match &self.state {
            FlowState::AwaitingConfirmation(pending) => {
                let pending = pending.clone();
                self.state = FlowState::Submitting(pending.clone());
                Ok(pending)
            }
            _ => Err(self.invalid("confirm")),
        }
    }

    /// `awaiting-confirmation → idle`: the user backed out. No mutation has
    /// happened yet, so this is side-effect free.
    pub fn cancel(&mut self) -> AppResult<()> {
        match self.state {
            FlowState::AwaitingConfirmation(_) => {
                self.state = FlowState::Idle;
                Ok(())
            }
            _ => Err(self.invalid("cancel")),
        }
    }

    /// `submitting → completed`: storage accepted the mutation.
    pub fn submitted(&mut self) -> AppResult<()> {
        match self.state {
            FlowState::Submitting(_) => {
                self.state = FlowState::Completed;
                Ok(())
            }
            _ => Err(self.invalid("submitted")),
        }
    }

    /// `submitting → failed`: storage rejected the mutation (for example the
    /// entry was already closed). The entry must not be marked closed
    /// anywhere else; the message is surfaced as-is.
    pub fn submit_failed(&mut self, message: impl Into<String>) -> AppResult<()> {
        match self.state {
            FlowState::Submitting(_) => {
                self.state = FlowState::Failed(message.into());
                Ok(())
            }
            _ => Err(self.invalid("submit_failed")),
        }
    }

    /// `failed → idle`: explicit user retry.
    pub fn retry(&mut self) -> AppResult<()> {
        match self.state {
            FlowState::Failed(_) => {
                self.state = FlowState::Idle;
                Ok(())
            }
            _ => Err(self.invalid("retry")),
        }
    }
}

/// High-level business logic for the `out` command.
pub struct ClockOutLogic;

impl ClockOutLogic {
    pub fn apply(
        pool: &mut DbPool,
        cfg: &Config,
        provider: &dyn LocationProvider,
        assume_yes: bool,
    ) -> AppResult<()> {
        let entry = open_entry(pool)?.ok_or(AppError::NoOpenEntry)?;
        let project = load_project_by_id(&pool.conn, entry.project_id)?;

        let mut flow = ClockOutFlow::new();
        flow.begin()?;

        info("Acquiring position fix…");
        let fix = match provider.current_position(&GeoRequest::default()) {
            Ok(fix) => fix,
            Err(e) => {
                flow.location_failed(&e)?;
                return Err(e.into());
            }
        };

        let pending = flow
            .fix_acquired(fix, &project, cfg.default_radius_m)?
            .clone();

        print_recap(&entry, &project, &pending, cfg.default_radius_m);

        let confirmed = assume_yes || confirm("Clock out now?")?;
        if !confirmed {
            flow.cancel()?;
            info("Clock-out cancelled. The session stays open.");
            return Ok(());
        }

        let pending = flow.confirm()?;
        let now = Local::now();
        let total_minutes = minutes_between(entry.clock_in_at, now).max(0);

        match close_entry(
            &pool.conn,
            entry.id,
            now,
            &pending.coordinate,
            pending.distance_m,
            pending.verdict,
            total_minutes,
        ) {
            Ok(()) => {
                flow.submitted()?;
            }
            Err(e) => {
                // A failed submission must leave the entry as it was.
                flow.submit_failed(e.to_string())?;
                return Err(e);
            }
        }

        ttlog(
            &pool.conn,
            "clock_out",
            &project.name,
            &format!(
                "Closed entry #{} after {} ({})",
                entry.id,
                mins2readable(total_minutes, false, false),
                pending.verdict.to_db_str()
            ),
        )?;

        success(format!(
            "Clocked out of '{}' after {}.",
            project.name,
            mins2readable(total_minutes, false, false)
        ));

        Ok(())
    }
}

fn print_recap(
    entry: &ClockEntry,
    project: &Project,
    pending: &PendingClockOut,
    default_radius_m: f64,
) {
    println!();
    println!("  Project:  {} ({})", project.name, project.company);
    println!("  Since:    {}", entry.clock_in_at.format("%Y-%m-%d %H:%M"));
    println!(
        "  Position: {} (accuracy {})",
        pending.coordinate.display_short(),
        fmt_distance(pending.coordinate.accuracy)
    );

    match pending.verdict {
        ComplianceVerdict::WithinRadius => {
            println!(
                "  Distance: {}{}{} — within the {:.0} m radius",
                GREEN,
                fmt_distance(pending.distance_m),
                RESET,
                project.effective_radius_m(default_radius_m)
            );
        }
        ComplianceVerdict::OutsideRadius => {
            println!(
                "  Distance: {}{}{} — OUTSIDE the {:.0} m radius",
                RED,
                fmt_distance(pending.distance_m),
                RESET,
                project.effective_radius_m(default_radius_m)
            );
            warning("Your position does not match the project location. This will be recorded.");
        }
        ComplianceVerdict::Indeterminate => {
            println!("  Distance: - (project has no registered location)");
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Coordinate {
        Coordinate::new(52.0907, 5.1214).unwrap()
    }

    fn project_at(coordinate: Option<Coordinate>, radius_m: Option<f64>) -> Project {
        Project {
            id: 7,
            name: "Kade West".into(),
            company: "The Global".into(),
            address: String::new(),
            coordinate,
            radius_m,
            created_at: String::new(),
        }
    }

    #[test]
    fn happy_path_reaches_completed() {
        let mut flow = ClockOutFlow::new();
        flow.begin().unwrap();
        flow.fix_acquired(site(), &project_at(Some(site()), Some(50.0)), 50.0)
            .unwrap();
        let pending = flow.confirm().unwrap();
        assert!(pending.verdict.is_within());
        flow.submitted().unwrap();
        assert!(matches!(flow.state(), FlowState::Completed));
    }

    #[test]
    fn confirm_returns_the_displayed_coordinate() {
        // The submitted fix must be the one that produced the verdict the
        // user saw; no re-sampling after confirmation.
        let here = Coordinate::with_accuracy(52.0912, 5.1220, Some(9.0)).unwrap();

        let mut flow = ClockOutFlow::new();
        flow.begin().unwrap();
        let shown = flow
            .fix_acquired(here, &project_at(Some(site()), Some(100.0)), 50.0)
            .unwrap()
            .clone();
        let submitted = flow.confirm().unwrap();

        assert_eq!(submitted.coordinate, here);
        assert_eq!(submitted, shown);
    }

    #[test]
    fn cancel_returns_to_idle_and_blocks_submission() {
        let mut flow = ClockOutFlow::new();
        flow.begin().unwrap();
        flow.fix_acquired(site(), &project_at(Some(site()), None), 50.0)
            .unwrap();
        flow.cancel().unwrap();

        assert!(matches!(flow.state(), FlowState::Idle));
        // After a cancel nothing may be submitted.
        assert!(flow.confirm().is_err());
        assert!(flow.submitted().is_err());
    }

    #[test]
    fn boundary_distance_is_compliant() {
        // A radius exactly equal to the computed distance: the verdict the
        // user is shown must use the inclusive comparison.
        let near = Coordinate::new(52.0916, 5.1214).unwrap();
        let exact = crate::geo::distance::haversine_m(&site(), &near);
        let project = project_at(Some(site()), Some(exact));

        let mut flow = ClockOutFlow::new();
        flow.begin().unwrap();
        let pending = flow.fix_acquired(near, &project, 50.0).unwrap();
        assert_eq!(pending.distance_m, Some(exact));
        assert!(pending.verdict.is_within());
    }

    #[test]
    fn missing_project_location_is_indeterminate() {
        let mut flow = ClockOutFlow::new();
        flow.begin().unwrap();
        let pending = flow
            .fix_acquired(site(), &project_at(None, Some(50.0)), 50.0)
            .unwrap();
        assert_eq!(pending.distance_m, None);
        assert_eq!(pending.verdict, ComplianceVerdict::Indeterminate);
    }

    #[test]
    fn location_failure_then_retry() {
        let mut flow = ClockOutFlow::new();
        flow.begin().unwrap();
        flow.location_failed(&GeoError::Timeout(10)).unwrap();
        assert!(matches!(flow.state(), FlowState::Failed(_)));

        flow.retry().unwrap();
        assert!(matches!(flow.state(), FlowState::Idle));
        flow.begin().unwrap();
    }

    #[test]
    fn submit_failure_keeps_message() {
        let mut flow = ClockOutFlow::new();
        flow.begin().unwrap();
        flow.fix_acquired(site(), &project_at(Some(site()), None), 50.0)
            .unwrap();
        flow.confirm().unwrap();
        flow.submit_failed("Entry #3 not found or already closed")
            .unwrap();

        match flow.state() {
            FlowState::Failed(msg) => assert!(msg.contains("already closed")),
            other => panic!("expected Failed, got {}", other.name()),
        }
    }

    #[test]
    fn out_of_order_events_are_rejected() {
        let mut flow = ClockOutFlow::new();

        assert!(flow.confirm().is_err());
        assert!(flow.cancel().is_err());
        assert!(flow.submitted().is_err());

        flow.begin().unwrap();
        assert!(flow.begin().is_err());
        assert!(flow.cancel().is_err());

        match flow.confirm() {
            Err(AppError::InvalidTransition { from, event }) => {
                assert_eq!(from, "locating");
                assert_eq!(event, "confirm");
            }
            _ => panic!("expected InvalidTransition"),
        }
    }
}

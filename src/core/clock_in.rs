//! Clock-in flow: recap → confirm → locate → geofence gate → insert.
//!
//! The geofence is a hard gate here: an open entry is only created when the
//! captured position is inside the project's allowed radius (or when the
//! project has no registered location, which records an indeterminate
//! verdict). Clock-out, by contrast, records an out-of-range position after
//! confirmation instead of refusing it.

use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{find_project, insert_entry, open_entry};
use crate::errors::{AppError, AppResult};
use crate::geo::provider::{GeoRequest, LocationProvider};
use crate::models::project::Project;
use crate::models::verdict::ComplianceVerdict;
use crate::ui::messages::{error, info, success};
use crate::ui::prompt::confirm;
use chrono::Local;

/// High-level business logic for the `in` command.
pub struct ClockInLogic;

impl ClockInLogic {
    pub fn apply(
        pool: &mut DbPool,
        cfg: &Config,
        provider: &dyn LocationProvider,
        project_ref: &str,
        note: &str,
        assume_yes: bool,
    ) -> AppResult<()> {
        // ------------------------------------------------
        // 1️⃣ Refuse a second open session
        // ------------------------------------------------
        if let Some(open) = open_entry(pool)? {
            return Err(AppError::AlreadyClockedIn(open.id));
        }

        let project = find_project(&pool.conn, project_ref)?;

        // ------------------------------------------------
        // 2️⃣ Recap + confirmation (before any positioning)
        // ------------------------------------------------
        print_recap(&project, note);

        let confirmed = assume_yes || confirm("Clock in now?")?;
        if !confirmed {
            info("Clock-in cancelled.");
            return Ok(());
        }

        // ------------------------------------------------
        // 3️⃣ Acquire the fix
        // ------------------------------------------------
        info("Acquiring position fix…");
        let fix = provider.current_position(&GeoRequest::default())?;

        // ------------------------------------------------
        // 4️⃣ Geofence gate
        // ------------------------------------------------
        let radius_m = project.effective_radius_m(cfg.default_radius_m);
        let (distance_m, verdict) = project.check_position(&fix, cfg.default_radius_m);

        if verdict.is_outside() {
            let distance = distance_m.unwrap_or(0.0);
            explain_refusal(&project, distance, radius_m);
            return Err(AppError::OutsideRadius {
                distance_m: distance,
                radius_m,
            });
        }

        if verdict == ComplianceVerdict::Indeterminate {
            info(format!(
                "Project '{}' has no registered location; no geofence check possible.",
                project.name
            ));
        }

        // ------------------------------------------------
        // 5️⃣ Create the open entry
        // ------------------------------------------------
        let now = Local::now();
        let entry_id = insert_entry(&pool.conn, project.id, note, now, &fix, distance_m, verdict)?;

        ttlog(
            &pool.conn,
            "clock_in",
            &project.name,
            &format!("Opened entry #{} ({})", entry_id, verdict.to_db_str()),
        )?;

        success(format!(
            "Clocked in on '{}' at {}.",
            project.name,
            now.format("%H:%M")
        ));
        info(format!(
            "Background position logging: run 'geoclock track' (every {} min).",
            cfg.track_interval_min
        ));

        Ok(())
    }
}

fn print_recap(project: &Project, note: &str) {
    println!();
    println!("  Project:  {} ({})", project.name, project.company);
    if !project.address.is_empty() {
        println!("  Location: {}", project.address);
    }
    println!("  Time:     {}", Local::now().format("%Y-%m-%d %H:%M"));
    if !note.is_empty() {
        println!("  Note:     {}", note);
    }
    println!();
    println!(
        "{}",
        textwrap::fill(
            "Your position is captured and stored when you clock in. \
             Make sure this terminal's location source is available.",
            72
        )
    );
    println!();
}

/// The most common operator-facing failure gets a full explanation instead
/// of a one-line error.
fn explain_refusal(project: &Project, distance_m: f64, radius_m: f64) {
    error("Clock-in refused: too far from the project location.");
    println!();
    println!(
        "{}",
        textwrap::fill(
            &format!(
                "You are {:.0} m from '{}', outside the allowed {:.0} m radius. \
                 You must be within {:.0} m of the project location to clock in.",
                distance_m, project.name, radius_m, radius_m
            ),
            72
        )
    );
    println!();
    println!("Check:");
    println!("  • are you at the right location?");
    println!("  • is your position source turned on?");
    println!("  • does it have permission to report your location?");
    println!();
}

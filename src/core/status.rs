use crate::db::pool::DbPool;
use crate::db::queries::{gps_sample_count, load_project_by_id, open_entry};
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{CYAN, GREEN, RESET};
use crate::utils::formatting::fmt_distance;
use crate::utils::time::format_elapsed;
use crate::utils::describe_verdict;
use chrono::Local;

pub struct StatusLogic;

impl StatusLogic {
    pub fn show(pool: &mut DbPool) -> AppResult<()> {
        let Some(entry) = open_entry(pool)? else {
            info("Not clocked in.");
            return Ok(());
        };

        let project = load_project_by_id(&pool.conn, entry.project_id)?;
        let elapsed_secs = (Local::now() - entry.clock_in_at).num_seconds();
        let samples = gps_sample_count(&pool.conn, entry.id)?;

        let (label, color) = describe_verdict(entry.clock_in_verdict.to_db_str());

        println!();
        println!(
            "{}⏱  Currently clocked in{} — {}",
            GREEN,
            RESET,
            format_elapsed(elapsed_secs)
        );
        println!();
        println!(
            "{}• Project:{} {} ({})",
            CYAN, RESET, project.name, project.company
        );
        println!(
            "{}• Since:{}   {}",
            CYAN,
            RESET,
            entry.clock_in_at.format("%Y-%m-%d %H:%M")
        );
        println!(
            "{}• Clock-in:{} {} at {} ({}{}{})",
            CYAN,
            RESET,
            fmt_distance(entry.clock_in_distance_m),
            entry.clock_in.display_short(),
            color,
            label,
            RESET
        );
        if !entry.note.is_empty() {
            println!("{}• Note:{}    {}", CYAN, RESET, entry.note);
        }
        println!("{}• Samples:{} {} position(s) logged", CYAN, RESET, samples);
        println!();

        Ok(())
    }
}

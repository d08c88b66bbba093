use crate::cli::commands::position_override;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::tracker::{TrackerLogic, stop_channel};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::geo::provider::resolve_provider;
use crate::ui::messages::{info, success};
use std::time::Duration;

/// Periodic background position logging for the open session.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Track {
        interval,
        once,
        lat,
        lon,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        let entry =
            crate::db::queries::open_entry(&mut pool)?.ok_or(AppError::NoOpenEntry)?;

        let override_fix = position_override(*lat, *lon, None)?;
        let provider = resolve_provider(override_fix, cfg)?;

        if *once {
            let verdict = TrackerLogic::sample(&mut pool, cfg, provider.as_ref(), entry.id)?;
            success(format!(
                "Position logged for entry #{} ({}).",
                entry.id,
                verdict.to_db_str()
            ));
            return Ok(());
        }

        let minutes = interval.unwrap_or(cfg.track_interval_min as u64).max(1);
        info(format!(
            "Logging position for entry #{} every {} minute(s). Press Ctrl+C to stop.",
            entry.id, minutes
        ));

        // Ctrl+C is left to the default handler: the loop holds no state
        // that needs unwinding, and the next run re-checks the entry.
        let (_stop, stop_rx) = stop_channel();
        let recorded = TrackerLogic::run(
            &mut pool,
            cfg,
            provider.as_ref(),
            entry.id,
            Duration::from_secs(minutes * 60),
            &stop_rx,
        )?;

        success(format!("Recorded {} position sample(s).", recorded));
    }

    Ok(())
}

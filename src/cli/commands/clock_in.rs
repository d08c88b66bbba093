use crate::cli::commands::position_override;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock_in::ClockInLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::geo::provider::resolve_provider;

/// Clock in on a project.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::In {
        project,
        note,
        lat,
        lon,
        accuracy,
        yes,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        let override_fix = position_override(*lat, *lon, *accuracy)?;
        let provider = resolve_provider(override_fix, cfg)?;

        ClockInLogic::apply(
            &mut pool,
            cfg,
            provider.as_ref(),
            project,
            note.as_deref().unwrap_or(""),
            *yes,
        )?;
    }

    Ok(())
}

use crate::cli::commands::position_override;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock_out::ClockOutLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::geo::provider::resolve_provider;

/// Clock out of the open session.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Out {
        lat,
        lon,
        accuracy,
        yes,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        let override_fix = position_override(*lat, *lon, *accuracy)?;
        let provider = resolve_provider(override_fix, cfg)?;

        ClockOutLogic::apply(&mut pool, cfg, provider.as_ref(), *yes)?;
    }

    Ok(())
}

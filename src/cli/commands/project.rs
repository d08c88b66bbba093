use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::project::{ProjectChanges, ProjectLogic};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::Coordinate;

/// Manage projects: add, list, edit, delete.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Project {
        add,
        list,
        edit,
        del,
        name,
        company,
        address,
        coord,
        radius,
        yes,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        let coordinate = match coord {
            Some(raw) => Some(Coordinate::parse(raw)?),
            None => None,
        };

        //
        // 1. ADD
        //
        if *add {
            let name = name
                .as_deref()
                .ok_or_else(|| AppError::Other("--add requires --name".into()))?;
            let company = company
                .as_deref()
                .ok_or_else(|| AppError::Other("--add requires --company".into()))?;

            ProjectLogic::add(
                &mut pool,
                name,
                company,
                address.as_deref().unwrap_or(""),
                coordinate,
                *radius,
            )?;
            return Ok(());
        }

        //
        // 2. EDIT
        //
        if let Some(id) = edit {
            let changes = ProjectChanges {
                name: name.clone(),
                company: company.clone(),
                address: address.clone(),
                coordinate,
                radius_m: *radius,
            };

            ProjectLogic::edit(&mut pool, *id, changes)?;
            return Ok(());
        }

        //
        // 3. DELETE
        //
        if let Some(id) = del {
            ProjectLogic::del(&mut pool, *id, *yes)?;
            return Ok(());
        }

        //
        // 4. LIST (default)
        //
        if *list || (!*add && edit.is_none() && del.is_none()) {
            ProjectLogic::list(&mut pool, cfg.default_radius_m)?;
        }
    }

    Ok(())
}

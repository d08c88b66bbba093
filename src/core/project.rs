//! Project administration: the geofenced sites sessions are booked on.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    delete_project, insert_project, load_project_by_id, load_projects, project_entry_count,
    update_project,
};
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::Coordinate;
use crate::ui::messages::{info, success, warning};
use crate::ui::prompt::confirm;
use crate::utils::table::{Column, Table};

pub struct ProjectLogic;

/// Optional field updates for `project --edit`.
#[derive(Debug, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub coordinate: Option<Coordinate>,
    pub radius_m: Option<f64>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.company.is_none()
            && self.address.is_none()
            && self.coordinate.is_none()
            && self.radius_m.is_none()
    }
}

impl ProjectLogic {
    pub fn add(
        pool: &mut DbPool,
        name: &str,
        company: &str,
        address: &str,
        coordinate: Option<Coordinate>,
        radius_m: Option<f64>,
    ) -> AppResult<()> {
        if let Some(r) = radius_m
            && (!r.is_finite() || r <= 0.0)
        {
            return Err(AppError::InvalidRadius(format!("{} (must be > 0)", r)));
        }

        let id = insert_project(&pool.conn, name, company, address, coordinate, radius_m)?;

        ttlog(
            &pool.conn,
            "project_add",
            name,
            &format!("Registered project #{} for {}", id, company),
        )?;

        if coordinate.is_none() {
            warning("Project has no coordinates: clock-in/out verdicts will be indeterminate.");
        }
        success(format!("Project '{}' registered with id {}.", name, id));
        Ok(())
    }

    pub fn list(pool: &mut DbPool, default_radius_m: f64) -> AppResult<()> {
        let projects = load_projects(pool)?;

        if projects.is_empty() {
            info("No projects registered yet. Add one with 'project --add'.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ID", 4),
            Column::new("Company", 10),
            Column::new("Name", 10),
            Column::new("Address", 10),
            Column::new("Coordinates", 12),
            Column::new("Radius", 8),
        ]);

        for p in &projects {
            table.add_row(vec![
                p.id.to_string(),
                p.company.clone(),
                p.name.clone(),
                p.address.clone(),
                p.coordinate
                    .map(|c| c.display_short())
                    .unwrap_or_else(|| "-".to_string()),
                match p.radius_m {
                    Some(r) => format!("{:.0} m", r),
                    None => format!("{:.0} m (default)", default_radius_m),
                },
            ]);
        }

        table.autosize();
        println!("\n📍 Registered projects:\n");
        print!("{}", table.render());
        Ok(())
    }

    pub fn edit(pool: &mut DbPool, id: i64, changes: ProjectChanges) -> AppResult<()> {
        if changes.is_empty() {
            return Err(AppError::Other(
                "Nothing to do: specify at least one field to change.".into(),
            ));
        }

        if let Some(r) = changes.radius_m
            && (!r.is_finite() || r <= 0.0)
        {
            return Err(AppError::InvalidRadius(format!("{} (must be > 0)", r)));
        }

        let mut project = load_project_by_id(&pool.conn, id)?;

        if let Some(name) = changes.name {
            project.name = name;
        }
        if let Some(company) = changes.company {
            project.company = company;
        }
        if let Some(address) = changes.address {
            project.address = address;
        }
        if let Some(coordinate) = changes.coordinate {
            project.coordinate = Some(coordinate);
        }
        if let Some(radius) = changes.radius_m {
            project.radius_m = Some(radius);
        }

        update_project(&pool.conn, &project)?;

        ttlog(
            &pool.conn,
            "project_edit",
            &project.name,
            &format!("Updated project #{}", id),
        )?;

        success(format!("Project #{} updated.", id));
        Ok(())
    }

    pub fn del(pool: &mut DbPool, id: i64, assume_yes: bool) -> AppResult<()> {
        let project = load_project_by_id(&pool.conn, id)?;

        // Recorded sessions keep referencing the project id; refuse instead
        // of leaving them dangling.
        let entries = project_entry_count(&pool.conn, id)?;
        if entries > 0 {
            return Err(AppError::Other(format!(
                "Project '{}' has {} recorded session(s); it cannot be deleted.",
                project.name, entries
            )));
        }

        if !assume_yes {
            warning(format!(
                "This permanently removes project '{}' ({}).",
                project.name, project.company
            ));
            if !confirm("Delete?")? {
                info("Deletion cancelled.");
                return Ok(());
            }
        }

        delete_project(&pool.conn, id)?;

        ttlog(
            &pool.conn,
            "project_del",
            &project.name,
            &format!("Deleted project #{}", id),
        )?;

        success(format!("Project '{}' deleted.", project.name));
        Ok(())
    }
}

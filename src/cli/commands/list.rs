use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::summary::build_totals;
use crate::db::models::GpsSample;
use crate::db::pool::DbPool;
use crate::db::queries::{load_entries, load_gps_samples, load_projects, open_entry};
use crate::errors::{AppError, AppResult};
use crate::models::entry::ClockEntry;
use crate::ui::messages::info;
use crate::utils::colors::RESET;
use crate::utils::date::{current_month_bounds, period_bounds};
use crate::utils::describe_verdict;
use crate::utils::formatting::{fmt_distance, fmt_hours};
use crate::utils::mins2readable;
use crate::utils::table::{Column, Table};
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        period,
        summary,
        gps,
        entry,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        let bounds = resolve_period(period)?;
        let entries = load_entries(&mut pool, Some(bounds))?;

        let projects = load_projects(&mut pool)?;
        let names: BTreeMap<i64, (String, String)> = projects
            .iter()
            .map(|p| (p.id, (p.company.clone(), p.name.clone())))
            .collect();

        if *gps {
            print_gps(&mut pool, &entries, *entry)?;
            return Ok(());
        }

        if entries.is_empty() {
            info(format!(
                "No sessions between {} and {}.",
                bounds.0, bounds.1
            ));
            return Ok(());
        }

        print_entries(&entries, &names);

        if *summary {
            print_summary(&entries, &names);
        } else if let Some(open) = open_entry(&mut pool)? {
            info(format!("Session #{} is still open.", open.id));
        }
    }
    Ok(())
}

fn resolve_period(period: &Option<String>) -> AppResult<(NaiveDate, NaiveDate)> {
    match period {
        Some(p) if p == "all" => {
            // Entire recorded history
            Ok((
                NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(9999, 12, 31).unwrap(),
            ))
        }
        Some(p) => period_bounds(p).map_err(AppError::InvalidDate),
        None => Ok(current_month_bounds()),
    }
}

fn print_entries(entries: &[ClockEntry], names: &BTreeMap<i64, (String, String)>) {
    let mut table = Table::new(vec![
        Column::new("Date", 10),
        Column::new("Company", 8),
        Column::new("Project", 8),
        Column::new("In", 5),
        Column::new("Out", 5),
        Column::new("Hours", 5),
        Column::new("Distance", 8),
        Column::new("Match", 8),
        Column::new("Status", 6),
    ]);

    let mut verdict_colors = Vec::new();

    for e in entries {
        let (company, project) = names
            .get(&e.project_id)
            .cloned()
            .unwrap_or_else(|| ("(deleted)".to_string(), "(deleted)".to_string()));

        let verdict = e.clock_out_verdict.unwrap_or(e.clock_in_verdict);
        let (label, color) = describe_verdict(verdict.to_db_str());
        verdict_colors.push(color);

        table.add_row(vec![
            e.date_str(),
            company,
            project,
            e.in_time_str(),
            e.out_time_str(),
            fmt_hours(e.hours()),
            fmt_distance(e.clock_out_distance_m.or(e.clock_in_distance_m)),
            label,
            e.status.to_db_str().to_string(),
        ]);
    }

    table.autosize();

    println!("\n🕑 Recorded sessions:\n");
    let rendered = table.render();
    for (i, line) in rendered.lines().enumerate() {
        // Rows start after header + separator; color the verdict label.
        if i >= 2 {
            if let Some(color) = verdict_colors.get(i - 2) {
                let (prefix, rest) = split_at_match_column(line);
                match rest {
                    Some((label, tail)) => {
                        println!("{}{}{}{}{}", prefix, color, label, RESET, tail)
                    }
                    None => println!("{}", line),
                }
                continue;
            }
        }
        println!("{}", line);
    }
}

/// Locate the verdict label inside a rendered row so only it gets colored.
fn split_at_match_column(line: &str) -> (&str, Option<(&str, &str)>) {
    for label in ["within radius", "OUTSIDE RADIUS", "no geofence"] {
        if let Some(pos) = line.find(label) {
            let (prefix, rest) = line.split_at(pos);
            let (found, tail) = rest.split_at(label.len());
            return (prefix, Some((found, tail)));
        }
    }
    (line, None)
}

fn print_summary(entries: &[ClockEntry], names: &BTreeMap<i64, (String, String)>) {
    let totals = build_totals(entries, names);

    println!("\n📊 Totals:\n");

    let mut table = Table::new(vec![
        Column::new("Company", 8),
        Column::new("Project", 8),
        Column::new("Sessions", 8),
        Column::new("Time", 6),
        Column::new("Hours", 6),
    ]);

    for p in &totals.per_project {
        table.add_row(vec![
            p.company.clone(),
            p.project.clone(),
            p.completed_sessions.to_string(),
            mins2readable(p.total_minutes, false, false),
            fmt_hours(Some(p.total_minutes as f64 / 60.0)),
        ]);
    }

    table.autosize();
    print!("{}", table.render());

    println!(
        "\nTotal: {} over {} completed session(s){}",
        mins2readable(totals.total_minutes, false, false),
        totals.completed_sessions,
        if totals.open_sessions > 0 {
            format!(" ({} still open)", totals.open_sessions)
        } else {
            String::new()
        }
    );
}

fn print_gps(pool: &mut DbPool, entries: &[ClockEntry], only: Option<i64>) -> AppResult<()> {
    let selected: Vec<&ClockEntry> = match only {
        Some(id) => entries.iter().filter(|e| e.id == id).collect(),
        None => entries.iter().collect(),
    };

    if selected.is_empty() {
        info("No matching sessions.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::new("Entry", 5),
        Column::new("Logged at", 16),
        Column::new("Position", 18),
        Column::new("Accuracy", 8),
        Column::new("Distance", 8),
        Column::new("Match", 8),
    ]);

    let mut total = 0usize;
    for e in &selected {
        let samples: Vec<GpsSample> = load_gps_samples(pool, e.id)?;
        total += samples.len();

        for s in &samples {
            let (label, _) = describe_verdict(s.verdict.to_db_str());
            table.add_row(vec![
                format!("#{}", s.entry_id),
                s.logged_at.format("%Y-%m-%d %H:%M").to_string(),
                s.position.display_short(),
                fmt_distance(s.position.accuracy),
                fmt_distance(s.distance_m),
                label,
            ]);
        }
    }

    if total == 0 {
        info("No position samples recorded for the selected sessions.");
        return Ok(());
    }

    table.autosize();
    println!("\n🛰  Background position log:\n");
    print!("{}", table.render());
    Ok(())
}

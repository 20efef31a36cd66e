use anyhow::{Context, Result};
use chrono::Local;
use hausdir_core::task::{Task, parse_calendar_time};
use owo_colors::OwoColorize;

use super::print_json;
use crate::App;
use crate::render::Render;

pub fn run(app: &App, file: &str) -> Result<()> {
    let task = app
        .tasks
        .task(file)
        .with_context(|| format!("Failed to read task '{file}'"))?;

    if app.json {
        return print_json(&task);
    }

    print_task(app, &task)
}

/// Full view of a task: header, dates, numbered subtasks and its unit.
pub fn print_task(app: &App, task: &Task) -> Result<()> {
    println!("{}", task.render());

    for (label, value) in [
        ("due", task.due.as_deref()),
        ("status", task.status.as_deref()),
        ("modified", task.last_modified.as_deref()),
    ] {
        if let Some(value) = value {
            let shown = parse_calendar_time(value)
                .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| value.to_string());
            println!("   {}{}", format!("{:<9}", format!("{label}:")).dimmed(), shown);
        }
    }

    if task.subtasks.is_empty() {
        println!("   {}", "No subtasks".dimmed());
    }

    for (i, subtask) in task.subtasks.iter().enumerate() {
        println!("   {:>2}. {}", i + 1, subtask.render());
    }

    if let Some(label) = task.area_label(&app.config.area_field) {
        println!();
        let resolved = match app.optional_dataset() {
            Some(cache) => match cache.area_by_label(label)? {
                Some(area) => Some(cache.resolve_area(&area)?),
                None => None,
            },
            None => None,
        };

        match resolved {
            Some(area) => println!("{}", area.render()),
            None => println!("{} {}", "Unknown unit:".dimmed(), label),
        }
    }

    Ok(())
}

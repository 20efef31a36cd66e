use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::print_json;
use crate::App;
use crate::render::Render;

pub fn run(app: &App, open_only: bool) -> Result<()> {
    let tasks = app.tasks.tasks().with_context(|| {
        format!("Failed to read tasks from {}", app.tasks.path().display())
    })?;

    let tasks: Vec<_> = tasks
        .into_iter()
        .filter(|task| {
            let (done, total) = task.subtask_progress();
            !open_only || (!task.is_completed() && (total == 0 || done < total))
        })
        .collect();

    if app.json {
        return print_json(&tasks);
    }

    if tasks.is_empty() {
        println!("{}", "No tasks found".dimmed());
        return Ok(());
    }

    let dataset = app.optional_dataset();

    for task in &tasks {
        println!("{}", task.render());

        let Some(label) = task.area_label(&app.config.area_field) else {
            continue;
        };

        let area = match &dataset {
            Some(cache) => cache.area_by_label(label)?,
            None => None,
        };

        match area {
            Some(area) => println!("      {} {}", "→".dimmed(), area.key().dimmed()),
            None => println!("      {} {}", "→".dimmed(), label.dimmed()),
        }
    }

    Ok(())
}

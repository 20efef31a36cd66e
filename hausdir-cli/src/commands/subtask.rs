use anyhow::{Context, Result};
use hausdir_core::task::SubtaskPatch;

use super::{print_json, show::print_task, subtask_index};
use crate::App;

pub fn done(app: &App, file: &str, number: usize, done: bool) -> Result<()> {
    apply(app, file, number, &SubtaskPatch::done(done))
}

pub fn hint(app: &App, file: &str, number: usize, text: &str) -> Result<()> {
    apply(app, file, number, &SubtaskPatch::hint(text))
}

pub fn patch(app: &App, file: &str, number: usize, json: &str) -> Result<()> {
    let patch = SubtaskPatch::from_json(json)?;
    apply(app, file, number, &patch)
}

fn apply(app: &App, file: &str, number: usize, patch: &SubtaskPatch) -> Result<()> {
    let index = subtask_index(number)?;

    let task = app
        .tasks
        .update_subtask(file, index, patch)
        .with_context(|| format!("Failed to update subtask {number} of '{file}'"))?;

    if app.json {
        return print_json(&task);
    }

    print_task(app, &task)
}

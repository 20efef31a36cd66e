//! Read-modify-write of a task's subtask list.
//!
//! There is no locking: two writers updating the same file at once race and
//! the later write silently drops the earlier one's change.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{SubtaskInput, Task, encode_description, normalize_hint, read_task_file};
use crate::config::Modifier;
use crate::error::{HausdirError, HausdirResult};
use crate::ics::{format_utc_stamp, rewrite_todo};

/// A change to a single subtask, as sent by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubtaskPatch {
    #[serde(default)]
    pub done: Option<bool>,
    /// New hint; an empty hint (after normalization) clears it
    #[serde(default)]
    pub hint: Option<String>,
}

impl SubtaskPatch {
    pub fn done(done: bool) -> Self {
        SubtaskPatch {
            done: Some(done),
            hint: None,
        }
    }

    pub fn hint(hint: impl Into<String>) -> Self {
        SubtaskPatch {
            done: None,
            hint: Some(hint.into()),
        }
    }

    /// Parse and check a JSON patch body.
    pub fn from_json(body: &str) -> HausdirResult<Self> {
        let patch: SubtaskPatch = serde_json::from_str(body)
            .map_err(|e| HausdirError::Validation(format!("malformed subtask patch: {e}")))?;
        patch.validate()?;
        Ok(patch)
    }

    pub fn validate(&self) -> HausdirResult<()> {
        if self.done.is_none() && self.hint.is_none() {
            return Err(HausdirError::Validation(
                "subtask patch changes nothing (expected `done` and/or `hint`)".into(),
            ));
        }
        Ok(())
    }

    fn apply(&self, subtask: &mut SubtaskInput, modifier: &Modifier) {
        if let Some(done) = self.done {
            subtask.done = done;
        }
        if let Some(hint) = &self.hint {
            subtask.hint = Some(normalize_hint(hint, modifier)).filter(|h| !h.is_empty());
        }
    }
}

/// Change one subtask of the task stored at `path` and write the file back.
pub fn update_subtask_in_file(
    path: &Path,
    index: usize,
    patch: &SubtaskPatch,
    modifier: &Modifier,
) -> HausdirResult<Task> {
    patch.validate()?;

    let task = Task::from_file(path, modifier)?;
    let mut subtasks: Vec<SubtaskInput> = task.subtasks.iter().map(SubtaskInput::from).collect();

    let len = subtasks.len();
    let subtask = subtasks.get_mut(index).ok_or_else(|| {
        HausdirError::Validation(format!(
            "subtask index {index} out of range for {} ({len} subtasks)",
            path.display()
        ))
    })?;
    patch.apply(subtask, modifier);

    write_subtasks_to_file(path, &subtasks, modifier)
}

pub fn update_subtask_status(
    path: &Path,
    index: usize,
    done: bool,
    modifier: &Modifier,
) -> HausdirResult<Task> {
    update_subtask_in_file(path, index, &SubtaskPatch::done(done), modifier)
}

pub fn update_subtask_hint(
    path: &Path,
    index: usize,
    hint: &str,
    modifier: &Modifier,
) -> HausdirResult<Task> {
    update_subtask_in_file(path, index, &SubtaskPatch::hint(hint), modifier)
}

/// Replace the whole subtask list of the task at `path`.
///
/// DESCRIPTION, DTSTAMP and LAST-MODIFIED are set; all other content of the
/// file is kept. Returns the task as re-read from the written content.
pub fn write_subtasks_to_file(
    path: &Path,
    subtasks: &[SubtaskInput],
    modifier: &Modifier,
) -> HausdirResult<Task> {
    write_subtasks_at(path, subtasks, modifier, Utc::now())
}

fn write_subtasks_at(
    path: &Path,
    subtasks: &[SubtaskInput],
    modifier: &Modifier,
    now: DateTime<Utc>,
) -> HausdirResult<Task> {
    let content = read_task_file(path)?;
    let stamp = format_utc_stamp(now);
    let description = encode_description(subtasks, modifier);

    let updated = rewrite_todo(
        &content,
        &[
            ("DESCRIPTION", description),
            ("DTSTAMP", stamp.clone()),
            ("LAST-MODIFIED", stamp),
        ],
    )
    .ok_or_else(|| HausdirError::Structure {
        path: path.display().to_string(),
        reason: "no BEGIN:VTODO ... END:VTODO block".into(),
    })?;

    std::fs::write(path, &updated)?;
    tracing::debug!(path = %path.display(), subtasks = subtasks.len(), "wrote task file");

    Ok(Task::parse(path, &updated, modifier))
}

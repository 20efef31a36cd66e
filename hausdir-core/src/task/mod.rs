//! Task files: one VTODO per .ics file, with a checklist in DESCRIPTION.

mod subtask;
mod update;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::config::Modifier;
use crate::error::{HausdirError, HausdirResult};
use crate::ics::{Properties, read_properties};

pub use subtask::{
    HINT_MAX_CHARS, Subtask, SubtaskInput, SubtaskStatus, decode_description,
    encode_description, normalize_hint,
};
pub use update::{
    SubtaskPatch, update_subtask_hint, update_subtask_in_file, update_subtask_status,
    write_subtasks_to_file,
};

/// File extension of task files (matched case-insensitively).
pub const TASK_EXTENSION: &str = "ics";

/// Task files larger than this are refused.
pub const MAX_TASK_FILE_BYTES: u64 = 1024 * 1024;

/// SUMMARY split into its parts and mapped onto the configured field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub raw: String,
    pub parts: Vec<String>,
    pub fields: BTreeMap<String, String>,
}

impl Summary {
    pub fn parse(raw: &str, modifier: &Modifier) -> Self {
        let parts: Vec<String> = raw
            .split(modifier.summary_delimiter.as_str())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();

        let fields = modifier
            .summary_fields
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), parts.get(i).cloned().unwrap_or_default()))
            .collect();

        Summary {
            raw: raw.to_string(),
            parts,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A task read from disk.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub path: PathBuf,
    pub uid: Option<String>,
    pub created: Option<String>,
    pub stamp: Option<String>,
    pub due: Option<String>,
    pub start: Option<String>,
    pub status: Option<String>,
    pub last_modified: Option<String>,
    pub summary: Summary,
    pub description: String,
    pub subtasks: Vec<Subtask>,
    /// Every property of the VTODO, including the ones above
    pub properties: Properties,
}

impl Task {
    /// Build a task from file content. Never fails: a file without a VTODO
    /// simply has no properties.
    pub fn parse(path: impl Into<PathBuf>, content: &str, modifier: &Modifier) -> Self {
        let properties = read_properties(content);
        let prop = |name: &str| properties.get(name).cloned();

        let description = prop("DESCRIPTION").unwrap_or_default();
        let summary = Summary::parse(&prop("SUMMARY").unwrap_or_default(), modifier);

        Task {
            path: path.into(),
            uid: prop("UID"),
            created: prop("CREATED"),
            stamp: prop("DTSTAMP"),
            due: prop("DUE"),
            start: prop("DTSTART"),
            status: prop("STATUS"),
            last_modified: prop("LAST-MODIFIED"),
            summary,
            subtasks: decode_description(&description, modifier),
            description,
            properties,
        }
    }

    pub fn from_file(path: &Path, modifier: &Modifier) -> HausdirResult<Self> {
        let content = read_task_file(path)?;
        Ok(Task::parse(path, &content, modifier))
    }

    /// `(done, total)` over all subtasks.
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.done).count();
        (done, self.subtasks.len())
    }

    pub fn is_completed(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("COMPLETED"))
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due.as_deref().and_then(parse_calendar_time)
    }

    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified.as_deref().and_then(parse_calendar_time)
    }

    /// Free-text label of the unit this task belongs to: the given summary
    /// field, or the LOCATION property when that field is empty.
    pub fn area_label(&self, field: &str) -> Option<&str> {
        self.summary
            .field(field)
            .filter(|v| !v.is_empty())
            .or_else(|| self.properties.get("LOCATION").map(String::as_str))
            .filter(|v| !v.trim().is_empty())
    }
}

/// Parse `YYYYMMDDThhmmssZ`, floating `YYYYMMDDThhmmss` (read as UTC) or
/// an all-day `YYYYMMDD` (midnight UTC).
pub fn parse_calendar_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Some(utc) = value.strip_suffix('Z') {
        return NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S")
            .ok()
            .map(|dt| dt.and_utc());
    }

    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .map(|dt| dt.and_utc())
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y%m%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

/// Read one task.
pub fn read_task(path: &Path, modifier: &Modifier) -> HausdirResult<Task> {
    Task::from_file(path, modifier)
}

/// Read every task file in `dir`, ordered by file name.
pub fn read_all_tasks(dir: &Path, modifier: &Modifier) -> HausdirResult<Vec<Task>> {
    let mut paths = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, _>>()?;
    paths.retain(|path| path.is_file() && is_task_file(path));

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    paths
        .iter()
        .map(|path| Task::from_file(path, modifier))
        .collect()
}

fn is_task_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| {
            name.to_lowercase()
                .ends_with(&format!(".{TASK_EXTENSION}"))
        })
}

/// Read a task file, refusing anything over [`MAX_TASK_FILE_BYTES`].
pub(crate) fn read_task_file(path: &Path) -> HausdirResult<String> {
    let size = std::fs::metadata(path)?.len();

    if size > MAX_TASK_FILE_BYTES {
        return Err(HausdirError::Validation(format!(
            "{} is {} bytes, task files are limited to {}",
            path.display(),
            size,
            MAX_TASK_FILE_BYTES
        )));
    }

    Ok(std::fs::read_to_string(path)?)
}

/// A directory of task files plus the conventions used to read them.
#[derive(Debug, Clone)]
pub struct TaskDir {
    path: PathBuf,
    modifier: Modifier,
}

impl TaskDir {
    pub fn new(path: impl Into<PathBuf>, modifier: Modifier) -> Self {
        TaskDir {
            path: path.into(),
            modifier,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn modifier(&self) -> &Modifier {
        &self.modifier
    }

    pub fn tasks(&self) -> HausdirResult<Vec<Task>> {
        read_all_tasks(&self.path, &self.modifier)
    }

    /// Path of a task file inside this directory. Only bare file names are
    /// accepted.
    pub fn file_path(&self, file_name: &str) -> HausdirResult<PathBuf> {
        let name = Path::new(file_name);

        if name.components().count() != 1 || name.file_name().is_none() {
            return Err(HausdirError::Validation(format!(
                "'{file_name}' is not a plain task file name"
            )));
        }

        Ok(self.path.join(name))
    }

    pub fn task(&self, file_name: &str) -> HausdirResult<Task> {
        read_task(&self.file_path(file_name)?, &self.modifier)
    }

    pub fn update_subtask(
        &self,
        file_name: &str,
        index: usize,
        patch: &SubtaskPatch,
    ) -> HausdirResult<Task> {
        update_subtask_in_file(&self.file_path(file_name)?, index, patch, &self.modifier)
    }
}
